//! Module records and handles.
//!
//! A module is one implementation of a subsystem's contract: a name, optional
//! `init`/`term` lifecycle hooks, and a subsystem-specific capability table of
//! optional API entry points. Dynamically loaded modules additionally keep
//! their [`Library`] handle alive for the process lifetime.

use libloading::Library ;

use crate::slot_list::NodeIndex ;



/// Boxed lifecycle hook. Hooks that can fail log their own failure; no
/// fan-in contract exists for lifecycle results.
pub type LifecycleHook = Box<dyn Fn() + Send + Sync> ;

/// Handle to a module declared into a [`Subsystem`]( crate::Subsystem ).
///
/// Only meaningful for the subsystem that issued it.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub struct ModuleHandle( pub(crate) NodeIndex );

/// One implementation of a subsystem's contract.
///
/// # Type Parameters
/// - `Api`: the subsystem's capability table - a struct of optional entry
///   points. An absent entry means "not implemented by this module" and is
///   skipped by dispatch rather than invoked.
pub struct Module<Api> {
    name: String,
    init: Option<LifecycleHook>,
    term: Option<LifecycleHook>,
    api: Api,
    /// Keep-alive handle of the shared object this module came from.
    /// `None` for direct-linked modules.
    library: Option<Library>,
}

impl<Api> Module<Api> {

    /// Creates a module record with no lifecycle hooks.
    pub fn new( name: impl Into<String>, api: Api ) -> Self {
        Self {
            name: name.into(),
            init: None,
            term: None,
            api,
            library: None,
        }
    }

    /// Sets the hook run by the owning subsystem's `initialize()` broadcast.
    pub fn with_init( mut self, hook: impl Fn() + Send + Sync + 'static ) -> Self {
        self.init = Some( Box::new( hook ));
        self
    }

    /// Sets the hook run by the owning subsystem's `terminate()` broadcast.
    pub fn with_term( mut self, hook: impl Fn() + Send + Sync + 'static ) -> Self {
        self.term = Some( Box::new( hook ));
        self
    }

    /// Human-readable module name.
    #[inline] #[must_use] pub fn name( &self ) -> &str { &self.name }

    /// The capability table this module registered with.
    #[inline] pub fn api( &self ) -> &Api { &self.api }

    /// Whether this module was committed from a dynamically loaded unit.
    #[inline] #[must_use] pub fn is_dynamic( &self ) -> bool { self.library.is_some() }

    #[inline] pub(crate) fn init_hook( &self ) -> Option<&LifecycleHook> { self.init.as_ref() }

    #[inline] pub(crate) fn term_hook( &self ) -> Option<&LifecycleHook> { self.term.as_ref() }

    pub(crate) fn attach_library( &mut self, library: Option<Library> ) {
        self.library = library ;
    }

}

impl<Api> std::fmt::Debug for Module<Api> {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        f.debug_struct( "Module" )
            .field( "name", &self.name )
            .field( "init", &self.init.as_ref().map(| _ | "<hook>" ))
            .field( "term", &self.term.as_ref().map(| _ | "<hook>" ))
            .field( "dynamic", &self.library.is_some() )
            .finish_non_exhaustive()
    }
}
