use dso_link::Session ;

use crate::log_capture ;

#[test]
fn session_open_diagnostic_survives_a_nested_session() {

    log_capture::install();

    let outer = Session::begin();

    // nested begin while the outer session is open: flagged
    let inner = Session::begin();
    drop( inner );

    // the outer session still never completed, so a further begin must be
    // flagged too - the nested session's end does not clear the diagnostic
    let nested_again = Session::begin();
    drop( nested_again );

    drop( outer );

    // everything resolved: a fresh session is quiet
    let calm = Session::begin();
    drop( calm );

    assert_eq!( log_capture::messages_containing( "did not complete" ).len(), 2 );

}
