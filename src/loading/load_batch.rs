use std::path::{ Path, PathBuf };

use thiserror::Error ;

use crate::session::{ Registrar, Session };
use crate::subsystem::RegistryError ;
use crate::utils::PartialSuccess ;
use super::unit::{ LoadableUnit, SharedObject };



/// Errors that can occur while loading a batch of modules.
///
/// Loading proceeds gracefully: per-path failures are collected and the rest
/// of the batch continues. These errors come back in the `Vec` side of the
/// [`PartialSuccess`] returned by [`load_batch`].
///
/// [`PartialSuccess`]: crate::PartialSuccess
#[derive( Error, Debug )]
pub enum LoadError {

    /// Opening a loadable unit failed. The cause is opaque to the loader,
    /// not further classified, and never retried.
    #[error( "Failed to load '{0}': {1}" )]
    LoadFailed( PathBuf, String ),

    /// The unit opened but exports no registration entry point.
    #[error( "No registration hook in '{0}': {1}" )]
    MissingRegistrationHook( PathBuf, String ),

    /// The staged registration could not be committed.
    #[error( "Registration failed: {0}" )]
    Registration( #[from] RegistryError ),

}

/// Loads a batch of shared objects, registering the module each one carries.
///
/// Opens one [`Session`] around the whole batch. Each successfully opened
/// unit runs its registration hook and is committed without activation
/// (`make_active = false`); election of an active implementation is a
/// follow-up commit concern of the embedding program. Units that fail to
/// open are abandoned and the batch continues.
///
/// Returns how many units were loaded plus the handled per-path failures.
pub fn load_batch<P: AsRef<Path>>( paths: impl IntoIterator<Item = P> ) -> PartialSuccess<usize, LoadError> {
    load_units::<SharedObject, P>( paths )
}

/// [`load_batch`] over any [`LoadableUnit`] implementation.
pub fn load_units<U: LoadableUnit, P: AsRef<Path>>(
    paths: impl IntoIterator<Item = P>,
) -> PartialSuccess<usize, LoadError> {

    let mut session = Session::begin();
    let mut loaded = 0 ;
    let mut errors = Vec::new();

    for path in paths {
        let path = path.as_ref();
        match U::open( path ) {
            Ok( unit ) => {
                if let Err( err ) = unit.register( &mut Registrar::Loader( &mut session )) {
                    log::debug!( "{err}" );
                    errors.push( err );
                    session.abandon();
                    continue ;
                }
                match session.commit( unit.into_library(), false ) {
                    Ok(()) => loaded += 1,
                    Err( err ) => errors.push( LoadError::Registration( err )),
                }
            }
            Err( err ) => {
                log::debug!( "{err}" );
                errors.push( err );
                session.abandon();
            }
        }
    }

    session.end();
    ( loaded, errors )

}
