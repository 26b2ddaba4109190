//! A loadable module built as a real shared object, exercising the
//! production loading path end to end.

use dso_link::{ Module, Registrar, Subsystem };

#[derive( Default )]
struct FixtureApi {
    ping: Option<Box<dyn Fn() -> i32 + Send + Sync>>,
}

static FIXTURE: Subsystem<FixtureApi> = Subsystem::new( "fixture", "loading fixture APIs", 1 );

/// The registration entry point the batch loader resolves and invokes.
#[no_mangle]
pub fn dso_link_module_register( registrar: &mut Registrar<'_> ) {
    let handle = FIXTURE.declare(
        Module::new( "shared object fixture", FixtureApi { ping: Some( Box::new(|| 42 )) }),
    );
    if let Err( err ) = registrar.register( &FIXTURE, handle ) {
        eprintln!( "fixture registration rejected: {err}" );
    }
}

/// Reports (registered modules, modules holding a library keep-alive) from
/// this object's own registry.
#[no_mangle]
pub fn fixture_registered_modules() -> ( usize, usize ) {
    let mut dynamic = 0 ;
    FIXTURE.for_each(| module | {
        if module.is_dynamic() {
            dynamic += 1 ;
        }
    });
    ( FIXTURE.len(), dynamic )
}
