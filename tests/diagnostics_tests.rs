include!( "test_utils/log_capture.rs" );

#[path = "diagnostics"] mod diagnostics {
    mod nested_session_warning ;
}
