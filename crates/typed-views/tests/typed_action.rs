//! Integration tests for method-style typed actions.

use http::{Method, StatusCode};
use serde_json::json;
use std::sync::Arc;
use typed_views::prelude::*;

struct UserSet {
    prefix: String,
}

fn set_password() -> TypedAction<UserSet, String> {
    let signature = Signature::new("set_password")
        .param(Parameter::receiver())
        .param(Parameter::new("pk", TypeSpec::Int))
        .param(
            Parameter::new("password", TypeSpec::Str)
                .bind(ParamSettings::body().source("password").min_length(8).build().unwrap()),
        );
    TypedViews::default()
        .action(
            ActionOptions::new(true).methods([Method::POST]),
            signature,
            |set: &UserSet, args: Args| {
                format!(
                    "{}{}:{}",
                    set.prefix,
                    args.arg::<i64>(0).unwrap(),
                    args.arg::<String>(1).unwrap().len()
                )
            },
        )
        .unwrap()
}

fn post(data: serde_json::Value) -> Arc<Request> {
    Arc::new(
        Request::builder()
            .method(Method::POST)
            .uri("/users/4/set_password")
            .json(data)
            .build(),
    )
}

#[test]
fn test_action_receives_receiver_and_args() {
    let set = UserSet {
        prefix: "user-".to_string(),
    };
    let captures = PathCaptures::new().with("pk", "4");

    let out = set_password()
        .call(&set, &post(json!({"password": "correct horse"})), &captures)
        .unwrap();
    assert_eq!(out, "user-4:13");
}

#[test]
fn test_action_validation_error() {
    let set = UserSet {
        prefix: String::new(),
    };
    let captures = PathCaptures::new().with("pk", "four");

    let err = set_password()
        .call(&set, &post(json!({"password": "short"})), &captures)
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        err.to_body(),
        json!({
            "pk": ["A valid integer is required."],
            "password": ["Ensure this field has at least 8 characters."]
        })
    );
}

#[test]
fn test_action_method_not_allowed() {
    let set = UserSet {
        prefix: String::new(),
    };
    let request = Arc::new(Request::builder().uri("/users/4/set_password").build());
    let err = set_password()
        .call(&set, &request, &PathCaptures::new().with("pk", "4"))
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(err.to_body(), json!({"detail": "Method \"GET\" not allowed."}));
}

#[test]
fn test_action_routing_names() {
    let action = set_password();
    assert_eq!(action.name(), "set_password");
    assert_eq!(action.url_path(), "set_password");
    assert_eq!(action.url_name(), "set-password");
    assert!(action.options().is_detail());

    let renamed = TypedViews::default()
        .action(
            ActionOptions::new(false)
                .url_path("password")
                .url_name("change-password"),
            Signature::new("set_password").param(Parameter::receiver()),
            |_: &UserSet, args: Args| args.len(),
        )
        .unwrap();
    assert_eq!(renamed.url_path(), "password");
    assert_eq!(renamed.url_name(), "change-password");
}

#[test]
fn test_action_rejects_bad_receivers() {
    let views = TypedViews::default();

    let missing = Signature::new("refresh").param(Parameter::new("force", TypeSpec::Bool));
    let err = views
        .action(ActionOptions::new(true), missing, |_: &UserSet, args: Args| args.len())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "refresh: for typed methods, 'self' must be passed as the first arg with no annotation"
    );

    let annotated = Signature::new("refresh")
        .param(Parameter::new("self", TypeSpec::Str).with_kind(ParamKind::Receiver));
    assert!(matches!(
        views.action(ActionOptions::new(true), annotated, |_: &UserSet, args: Args| args.len()),
        Err(WrapError::InvalidReceiver { .. })
    ));
}

#[test]
fn test_action_requires_methods() {
    let result = TypedViews::default().action(
        ActionOptions::new(true).methods(Vec::new()),
        Signature::new("refresh").param(Parameter::receiver()),
        |_: &UserSet, args: Args| args.len(),
    );
    assert!(matches!(result, Err(WrapError::NoMethods { .. })));
}

struct Borrowed<'a> {
    prefix: &'a str,
}

#[test]
fn test_action_on_borrowing_receiver() {
    let prefix = String::from("item-");
    let action: TypedAction<Borrowed<'_>, String> = TypedViews::default()
        .action(
            ActionOptions::new(true).methods([Method::GET]),
            Signature::new("label")
                .param(Parameter::receiver())
                .param(Parameter::new("id", TypeSpec::Int)),
            |set: &Borrowed<'_>, args: Args| format!("{}{}", set.prefix, args.arg::<i64>(0).unwrap()),
        )
        .unwrap();

    let receiver = Borrowed { prefix: &prefix };
    let request = Arc::new(Request::builder().uri("/items/label?id=3").build());
    let out = action.call(&receiver, &request, &PathCaptures::new()).unwrap();
    assert_eq!(out, "item-3");
}
