//! Two-phase registration sessions.
//!
//! A module's own registration code does not know whether the load driving it
//! succeeded as a whole; the loader does not know which subsystem a module
//! will join. The [`Session`] decouples the two: while a session is open,
//! registration is split into a **top half** (the module stages a
//! (subsystem, module) pair through [`Registrar::register`]) and a **bottom
//! half** (the loader resolves the stage with [`Session::commit`] or
//! [`Session::abandon`] once it knows the load's verdict).
//!
//! At most one staged pair exists at a time; a second top-half call before
//! the first is resolved fails fast with
//! [`RegistryError::SessionUnavailable`] instead of blocking against the
//! driver. Only the loader holds a live `Session`, which preserves the
//! single-active-session invariant through ownership; a process-wide flag
//! backs the best-effort "previous session did not complete" diagnostics.

use std::sync::atomic::{ AtomicBool, Ordering };

use libloading::Library ;

use crate::module::ModuleHandle ;
use crate::subsystem::{ RegistryError, Subsystem };



/// Diagnostic flag: a loader session is open somewhere in the process.
static SESSION_OPEN: AtomicBool = AtomicBool::new( false );

/// A staged (subsystem, module) pair with the subsystem type erased.
trait StagedModule: Send {
    fn commit( self: Box<Self>, library: Option<Library>, make_active: bool ) -> Result<(), RegistryError> ;
    fn name( &self ) -> String ;
}

struct StagedPair<Api: 'static> {
    subsystem: &'static Subsystem<Api>,
    handle: ModuleHandle,
}

impl<Api: Send + Sync> StagedModule for StagedPair<Api> {

    fn commit( self: Box<Self>, library: Option<Library>, make_active: bool ) -> Result<(), RegistryError> {
        self.subsystem.commit_staged( self.handle, library, make_active )
    }

    fn name( &self ) -> String {
        let module = self.subsystem.declared_name( self.handle ).unwrap_or_else(|| "<unknown>".to_string() );
        format!( "'{}' on subsystem '{}'", module, self.subsystem.name() )
    }

}

/// An open registration session, scoping one loader batch.
///
/// Dropping a session with an unresolved stage logs a warning, clears the
/// stage, and closes the session; it never blocks progress.
pub struct Session {
    staged: Option<Box<dyn StagedModule>>,
    /// Whether this session claimed the process-wide open flag. A nested
    /// session never clears the flag on behalf of the one that set it.
    owns_flag: bool,
}

impl Session {

    /// Opens a session. Warns (and proceeds with fresh state) if a previous
    /// session never completed.
    #[must_use]
    pub fn begin() -> Self {
        let owns_flag = !SESSION_OPEN.swap( true, Ordering::AcqRel );
        if !owns_flag {
            log::warn!( "session begin: a previous registration session did not complete yet" );
        }
        Self { staged: None, owns_flag }
    }

    /// Nonblocking claim of the single staged slot.
    fn stage( &mut self, staged: Box<dyn StagedModule> ) -> Result<(), RegistryError> {
        if self.staged.is_some() {
            return Err( RegistryError::SessionUnavailable );
        }
        self.staged = Some( staged );
        Ok(())
    }

    /// Bottom half: links the staged module into its subsystem, attaching
    /// the shared-object keep-alive and optionally electing it active.
    ///
    /// A commit with nothing staged is a successful no-op - the module chose
    /// not to self-register, or its registration was rejected.
    ///
    /// # Errors
    /// Propagates [`RegistryError`] from the subsystem commit.
    pub fn commit( &mut self, library: Option<Library>, make_active: bool ) -> Result<(), RegistryError> {
        match self.staged.take() {
            Some( staged ) => staged.commit( library, make_active ),
            None => Ok(()),
        }
    }

    /// Bottom half: drops any staged pair without registering it. Used when
    /// the load itself failed or must be rolled back.
    pub fn abandon( &mut self ) {
        if let Some( staged ) = self.staged.take() {
            log::debug!( "abandoned staged registration of {}", staged.name() );
        }
    }

    /// Description of the currently staged module, if any.
    #[must_use]
    pub fn staged_module( &self ) -> Option<String> {
        self.staged.as_ref().map(| staged | staged.name() )
    }

    /// Closes the session. Equivalent to dropping it; named for symmetry
    /// with [`Session::begin`].
    pub fn end( self ) {}

}

impl Drop for Session {
    fn drop( &mut self ) {
        if let Some( staged ) = self.staged.take() {
            log::warn!( "session end: staged registration of {} was never resolved", staged.name() );
        }
        if self.owns_flag {
            SESSION_OPEN.store( false, Ordering::Release );
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        f.debug_struct( "Session" )
            .field( "staged", &self.staged_module() )
            .finish()
    }
}

/// The registration top half: the strategy a module's self-registration call
/// goes through.
///
/// Modules written against this type work unchanged whether they are linked
/// into the binary (registered with [`Registrar::Direct`] at startup) or
/// built as shared objects (handed a [`Registrar::Loader`] by the batch
/// driver).
#[derive( Debug )]
pub enum Registrar<'s> {
    /// Single-phase registration, used whenever no loader session is open.
    Direct,
    /// Two-phase registration staged into an open loader session.
    Loader( &'s mut Session ),
}

impl Registrar<'_> {

    /// Registers a declared module with its subsystem.
    ///
    /// Under [`Registrar::Direct`] this immediately appends the module to the
    /// registry. Under [`Registrar::Loader`] it performs the same sanity
    /// checks, then records the pair as the session's staged registration for
    /// the loader's bottom half to resolve.
    ///
    /// # Errors
    /// [`RegistryError::InvalidArgument`] or
    /// [`RegistryError::AlreadyRegistered`] from the sanity checks, and
    /// [`RegistryError::SessionUnavailable`] when an unresolved stage
    /// already occupies the session.
    pub fn register<Api: Send + Sync>(
        &mut self,
        subsystem: &'static Subsystem<Api>,
        handle: ModuleHandle,
    ) -> Result<(), RegistryError> {
        match self {
            Self::Direct => subsystem.register( handle ),
            Self::Loader( session ) => {
                subsystem.check_registrable( handle )?;
                session.stage( Box::new( StagedPair { subsystem, handle }))
            }
        }
    }

}
