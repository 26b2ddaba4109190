//! Loadable units and the production shared-object implementation.

use std::path::{ Path, PathBuf };

use libloading::{ Library, Symbol };

use crate::session::Registrar ;
use super::load_batch::LoadError ;



/// Symbol every loadable module exports as its registration entry point.
pub const REGISTRATION_HOOK: &[u8] = b"dso_link_module_register\0" ;

/// Signature of the exported registration entry point.
///
/// The hook declares the module and registers it through the handed-in
/// [`Registrar`], which stages the registration into the open session. A
/// hook that declines to register is fine - the loader's commit becomes a
/// no-op.
pub type RegistrationHook = fn( &mut Registrar<'_> );

/// One openable unit in a loader batch.
///
/// The production implementation is [`SharedObject`]; tests substitute
/// in-process doubles, since the loader treats unit resolution as a black
/// box that either yields a unit or fails.
pub trait LoadableUnit: Sized {

    /// Opens the unit at `path`, resolving eagerly.
    ///
    /// # Errors
    /// [`LoadError::LoadFailed`] with an opaque cause.
    fn open( path: &Path ) -> Result<Self, LoadError> ;

    /// Runs the unit's registration entry point against the open session.
    ///
    /// # Errors
    /// [`LoadError::MissingRegistrationHook`] if the unit exports none.
    fn register( &self, registrar: &mut Registrar<'_> ) -> Result<(), LoadError> ;

    /// Surrenders the keep-alive handle stored into the committed module.
    fn into_library( self ) -> Option<Library> ;

}

/// A shared object opened through the host dynamic loader.
pub struct SharedObject {
    path: PathBuf,
    library: Library,
}

impl LoadableUnit for SharedObject {

    fn open( path: &Path ) -> Result<Self, LoadError> {
        let library = unsafe { Library::new( path ) }
            .map_err(| err | LoadError::LoadFailed( path.to_path_buf(), err.to_string() ))?;
        Ok( Self { path: path.to_path_buf(), library })
    }

    fn register( &self, registrar: &mut Registrar<'_> ) -> Result<(), LoadError> {
        let hook: Symbol<'_, RegistrationHook> = unsafe { self.library.get( REGISTRATION_HOOK ) }
            .map_err(| err | LoadError::MissingRegistrationHook( self.path.clone(), err.to_string() ))?;
        hook( registrar );
        Ok(())
    }

    fn into_library( self ) -> Option<Library> {
        Some( self.library )
    }

}

impl std::fmt::Debug for SharedObject {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        f.debug_struct( "SharedObject" )
            .field( "path", &self.path )
            .finish_non_exhaustive()
    }
}
