mod common;

use kodegen_bundler_serverless::bundler::Error;
use kodegen_bundler_serverless::bundler::entries::{
    entry_for_handler, resolve_entries, select_functions,
};

#[test]
fn javascript_handler_gets_extension_agnostic_entry() {
    assert_eq!(entry_for_handler("src/handler.js"), "src/handler.[jt]s");
}

#[test]
fn export_suffix_is_replaced_like_an_extension() {
    assert_eq!(entry_for_handler("handler.hello"), "handler.[jt]s");
    assert_eq!(
        entry_for_handler("functions/users/create.main"),
        "functions/users/create.[jt]s"
    );
}

#[test]
fn directory_depth_and_dots_in_directories_are_preserved() {
    assert_eq!(
        entry_for_handler("packages/api.v2/src/deep/handler.ts"),
        "packages/api.v2/src/deep/handler.[jt]s"
    );
    assert_eq!(entry_for_handler("./src/handler.js"), "./src/handler.[jt]s");
}

#[test]
fn handler_without_extension_gets_pattern_appended() {
    assert_eq!(entry_for_handler("src/handler"), "src/handler.[jt]s");
    assert_eq!(entry_for_handler(".hidden"), ".hidden.[jt]s");
}

#[test]
fn only_last_extension_is_replaced() {
    assert_eq!(entry_for_handler("src/app.module.js"), "src/app.module.[jt]s");
}

#[test]
fn entries_follow_declaration_order() {
    let service = common::service(
        "/svc",
        &[
            ("zeta", "src/zeta.handler"),
            ("alpha", "src/alpha.handler"),
            ("mid", "lib/mid.handler"),
        ],
    );

    assert_eq!(
        resolve_entries(&service.functions),
        vec!["src/zeta.[jt]s", "src/alpha.[jt]s", "lib/mid.[jt]s"]
    );
}

#[test]
fn target_function_restricts_selection() {
    let service = common::service(
        "/svc",
        &[("one", "src/one.handler"), ("two", "src/two.handler")],
    );

    let selected = select_functions(&service, Some("two")).unwrap();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].name, "two");

    let all = select_functions(&service, None).unwrap();
    assert_eq!(all.len(), 2);
}

#[test]
fn unknown_target_function_is_an_error() {
    let service = common::service("/svc", &[("one", "src/one.handler")]);

    let err = select_functions(&service, Some("missing")).unwrap_err();
    assert!(matches!(err, Error::UnknownFunction(name) if name == "missing"));
}
