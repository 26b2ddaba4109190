//! Subsystem registries and dispatch.
//!
//! A [`Subsystem`] is a named, versioned extension point owning an ordered
//! registry of [`Module`]s and an optional **active** selection. Subsystems
//! are fixed at compile time - [`Subsystem::new`] is `const` so each one is a
//! plain `static` living for the process lifetime.
//!
//! Two dispatch shapes are exposed per subsystem:
//!
//! - **routed** ([`Subsystem::route`]): forwarded to the active module only;
//!   an absent active module or absent hook is a defined no-op, not an error.
//! - **broadcast** ([`Subsystem::broadcast`]): forwarded to every registered
//!   module in registration order, skipping modules without the hook.

use std::sync::{ RwLock, RwLockReadGuard, RwLockWriteGuard, PoisonError };

use libloading::Library ;
use thiserror::Error ;

use crate::module::{ Module, ModuleHandle };
use crate::slot_list::SlotList ;



/// Errors returned by registration and staging.
///
/// All of these are local and recoverable: callers skip the module and
/// continue.
#[derive( Error, Debug, PartialEq, Eq )]
pub enum RegistryError {
    /// The handle does not refer to a module declared on this subsystem.
    #[error( "Invalid Argument" )] InvalidArgument,
    /// The module is already linked into the registry. Logged and rejected,
    /// never silently ignored.
    #[error( "Already Registered: {0}" )] AlreadyRegistered( String ),
    /// The loader session already holds an unresolved staged registration.
    #[error( "Session Unavailable" )] SessionUnavailable,
}

/// Module list plus active selection, guarded by the subsystem's lock.
struct Registry<Api> {
    modules: SlotList<Module<Api>>,
    active: Option<ModuleHandle>,
}

impl<Api> Registry<Api> {

    /// Shared sanity checks for direct registration and loader staging.
    fn check_registrable( &self, handle: ModuleHandle ) -> Result<(), RegistryError> {
        if !self.modules.contains( handle.0 ) {
            return Err( RegistryError::InvalidArgument );
        }
        if !self.modules.is_detached( handle.0 ) {
            let name = self.modules.get( handle.0 ).map_or_else( String::new, | module | module.name().to_string() );
            log::warn!( "module {name} was already registered" );
            return Err( RegistryError::AlreadyRegistered( name ));
        }
        Ok(())
    }

}

/// A named, versioned extension point with a registry of modules.
///
/// # Type Parameters
/// - `Api`: the subsystem's capability table type shared by all its modules.
pub struct Subsystem<Api> {
    name: &'static str,
    description: &'static str,
    version: u32,
    registry: RwLock<Registry<Api>>,
}

impl<Api> Subsystem<Api> {

    /// Declares a subsystem: its lock, empty module list, and absent active
    /// reference. `const`, so subsystems are `static` records.
    #[must_use]
    pub const fn new( name: &'static str, description: &'static str, version: u32 ) -> Self {
        Self {
            name,
            description,
            version,
            registry: RwLock::new( Registry { modules: SlotList::new(), active: None }),
        }
    }

    /// Subsystem name.
    #[inline] #[must_use] pub fn name( &self ) -> &str { self.name }

    /// Human-readable description.
    #[inline] #[must_use] pub fn description( &self ) -> &str { self.description }

    /// Subsystem contract version.
    #[inline] #[must_use] pub fn version( &self ) -> u32 { self.version }

    // Write sections either fully link a node or leave the registry
    // untouched, so a lock poisoned by a panicking visitor still guards
    // consistent state and can be recovered.
    fn read_registry( &self ) -> RwLockReadGuard<'_, Registry<Api>> {
        self.registry.read().unwrap_or_else( PoisonError::into_inner )
    }

    fn write_registry( &self ) -> RwLockWriteGuard<'_, Registry<Api>> {
        self.registry.write().unwrap_or_else( PoisonError::into_inner )
    }

    /// Adds a module record to the registry arena in the detached state.
    ///
    /// Declaration does not register: pass the returned handle to
    /// [`Registrar::register`]( crate::Registrar::register ).
    pub fn declare( &self, module: Module<Api> ) -> ModuleHandle {
        ModuleHandle( self.write_registry().modules.alloc( module ))
    }

    /// Direct-link registration, used when no loader session is open (e.g.
    /// build-time linked modules registering at startup).
    ///
    /// Appends the module at the tail of the registry and leaves the active
    /// reference untouched.
    ///
    /// # Errors
    /// [`RegistryError::InvalidArgument`] for a stale or foreign handle;
    /// [`RegistryError::AlreadyRegistered`] if the module is already linked.
    pub fn register( &self, handle: ModuleHandle ) -> Result<(), RegistryError> {
        let mut registry = self.write_registry();
        registry.check_registrable( handle )?;
        registry.modules.push_back( handle.0 );
        Ok(())
    }

    /// Sanity checks for the loader-mediated top half - identical to the
    /// checks [`Subsystem::register`] performs, without linking anything.
    pub(crate) fn check_registrable( &self, handle: ModuleHandle ) -> Result<(), RegistryError> {
        self.read_registry().check_registrable( handle )
    }

    /// Name of a declared (not necessarily registered) module, for
    /// diagnostics.
    pub(crate) fn declared_name( &self, handle: ModuleHandle ) -> Option<String> {
        self.read_registry().modules.get( handle.0 ).map(| module | module.name().to_string() )
    }

    /// Loader bottom half: links a previously staged module.
    ///
    /// Stores the shared-object keep-alive into the module, appends it at the
    /// tail and, when `make_active` is requested, elects it the active
    /// implementation (last writer wins). The registration sanity checks run
    /// again under the write lock: a module that was linked through the
    /// direct path while its stage was pending is rejected here rather than
    /// linked a second time.
    pub(crate) fn commit_staged(
        &self,
        handle: ModuleHandle,
        library: Option<Library>,
        make_active: bool,
    ) -> Result<(), RegistryError> {
        let mut registry = self.write_registry();
        registry.check_registrable( handle )?;
        let module = registry.modules.get_mut( handle.0 ).ok_or( RegistryError::InvalidArgument )?;
        module.attach_library( library );
        registry.modules.push_back( handle.0 );
        if make_active {
            registry.active = Some( handle );
        }
        Ok(())
    }

    /// Calls `f` with the active module, or returns `None` when no module
    /// has been elected.
    pub fn with_active<R>( &self, f: impl FnOnce( &Module<Api> ) -> R ) -> Option<R> {
        let registry = self.read_registry();
        let active = registry.active?;
        registry.modules.get( active.0 ).map( f )
    }

    /// Name of the active module, if one has been elected.
    #[must_use]
    pub fn active_name( &self ) -> Option<String> {
        self.with_active(| module | module.name().to_string() )
    }

    /// Visits every registered module in registration order.
    pub fn for_each( &self, mut visitor: impl FnMut( &Module<Api> )) {
        let registry = self.read_registry();
        for ( _, module ) in registry.modules.iter() {
            visitor( module );
        }
    }

    /// Routed dispatch: forwards to the active module only.
    ///
    /// `call` returns `None` when the module does not implement the hook;
    /// that and an absent active module both yield the no-op `None`.
    pub fn route<R>( &self, call: impl FnOnce( &Module<Api> ) -> Option<R> ) -> Option<R> {
        let registry = self.read_registry();
        let active = registry.active?;
        let module = registry.modules.get( active.0 )?;
        call( module )
    }

    /// Broadcast dispatch: forwards to every registered module in
    /// registration order, skipping modules whose `call` returns `None`.
    ///
    /// Results are not aggregated; the last invoked module's result is
    /// returned.
    pub fn broadcast<R>( &self, mut call: impl FnMut( &Module<Api> ) -> Option<R> ) -> Option<R> {
        let registry = self.read_registry();
        let mut last = None ;
        for ( _, module ) in registry.modules.iter() {
            if let Some( result ) = call( module ) {
                last = Some( result );
            }
        }
        last
    }

    /// Broadcasts every registered module's `init` hook, in registration
    /// order. Modules without one are skipped.
    pub fn initialize( &self ) {
        let registry = self.read_registry();
        for ( _, module ) in registry.modules.iter() {
            if let Some( hook ) = module.init_hook() {
                hook();
            }
        }
    }

    /// Broadcasts every registered module's `term` hook, in registration
    /// order. Modules without one are skipped.
    pub fn terminate( &self ) {
        let registry = self.read_registry();
        for ( _, module ) in registry.modules.iter() {
            if let Some( hook ) = module.term_hook() {
                hook();
            }
        }
    }

    /// Number of registered (linked) modules.
    #[must_use]
    pub fn len( &self ) -> usize {
        self.read_registry().modules.len()
    }

    /// Whether no module has registered yet.
    #[must_use]
    pub fn is_empty( &self ) -> bool {
        self.read_registry().modules.is_empty()
    }

    /// Registered module names, in registration order.
    #[must_use]
    pub fn module_names( &self ) -> Vec<String> {
        let registry = self.read_registry();
        registry.modules.iter().map(|( _, module )| module.name().to_string() ).collect()
    }

}

impl<Api> std::fmt::Debug for Subsystem<Api> {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        f.debug_struct( "Subsystem" )
            .field( "name", &self.name )
            .field( "description", &self.description )
            .field( "version", &self.version )
            .finish_non_exhaustive()
    }
}
