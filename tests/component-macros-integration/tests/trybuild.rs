//! 标记宏的编译期检查

#[test]
fn ui_component_macros() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/pass_marked_application.rs");
    t.compile_fail("tests/trybuild/fail_unknown_argument.rs");
    t.compile_fail("tests/trybuild/fail_factory_plain_parameter.rs");
    t.compile_fail("tests/trybuild/fail_configuration_primary.rs");
}
