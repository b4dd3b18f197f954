//! Integration tests for parameter sources and implicit resolution.

use http::Method;
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;
use typed_views::prelude::*;

fn endpoint(signature: Signature) -> TypedEndpoint<Args> {
    TypedViews::default()
        .api_view([Method::GET, Method::POST], signature, |args: Args| args)
        .unwrap()
}

fn call(signature: Signature, request: Request) -> Result<Args, TypedViewError> {
    endpoint(signature).call(&Arc::new(request), &PathCaptures::new())
}

#[test]
fn test_body_dotted_paths() {
    let signature = Signature::new("create_order")
        .param(
            Parameter::new("city", TypeSpec::Str)
                .bind(ParamSettings::body().source("shipping.address.city").build().unwrap()),
        )
        .param(
            Parameter::new("first_sku", TypeSpec::Str)
                .bind(ParamSettings::body().source("items.0.sku").build().unwrap()),
        )
        .param(
            Parameter::new("order", TypeSpec::Unannotated)
                .bind(ParamSettings::body().source("*").build().unwrap()),
        );
    let data = json!({
        "shipping": {"address": {"city": "Lisbon"}},
        "items": [{"sku": "A-1"}, {"sku": "B-2"}]
    });
    let request = Request::builder()
        .method(Method::POST)
        .uri("/orders")
        .json(data.clone())
        .build();

    let args = call(signature, request).unwrap();
    assert_eq!(args.arg::<String>(0).unwrap(), "Lisbon");
    assert_eq!(args.arg::<String>(1).unwrap(), "A-1");
    assert_eq!(args.arg::<serde_json::Value>(2).unwrap(), data);
}

#[test]
fn test_body_path_miss_is_required() {
    let signature = Signature::new("create_order").param(
        Parameter::new("city", TypeSpec::Str)
            .bind(ParamSettings::body().source("shipping.address.city").build().unwrap()),
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/orders")
        .json(json!({"shipping": {}}))
        .build();

    let err = call(signature, request).unwrap_err();
    assert_eq!(
        err.to_body(),
        json!({"shipping.address.city": ["This field is required."]})
    );
}

fn homer() -> Principal {
    Principal::user("42", "homer")
        .with_email("homer@springfield.net")
        .with_group("safety")
        .with_attribute("plant", json!({"sector": "7G"}))
}

#[test]
fn test_current_user_paths() {
    let signature = Signature::new("whoami")
        .param(Parameter::new("user", TypeSpec::Principal).bind(ParamSettings::current_user().build().unwrap()))
        .param(
            Parameter::new("email", TypeSpec::Str)
                .bind(ParamSettings::current_user().source("email").build().unwrap()),
        )
        .param(
            Parameter::new("sector", TypeSpec::Str)
                .bind(ParamSettings::current_user().source("plant.sector").build().unwrap()),
        );
    let request = Request::builder().uri("/me").principal(homer()).build();

    let args = call(signature, request).unwrap();
    assert_eq!(args.arg::<Principal>(0).unwrap(), homer());
    assert_eq!(args.arg::<String>(1).unwrap(), "homer@springfield.net");
    assert_eq!(args.arg::<String>(2).unwrap(), "7G");
}

#[test]
fn test_current_user_membership() {
    let signature = Signature::new("inspect")
        .param(
            Parameter::new("inspector", TypeSpec::Principal)
                .bind(ParamSettings::current_user().member_of("safety").build().unwrap()),
        )
        .param(
            Parameter::new("manager", TypeSpec::Principal).bind(
                ParamSettings::current_user()
                    .member_of_any(["owners", "managers"])
                    .build()
                    .unwrap(),
            ),
        );
    let request = Request::builder().uri("/inspect").principal(homer()).build();

    let err = call(signature.clone(), request).unwrap_err();
    assert_eq!(
        err.to_body(),
        json!({
            "manager": ["User must be a member of at least one of these groups: 'owners', 'managers'"]
        })
    );

    let anonymous = Request::builder().uri("/inspect").build();
    let err = call(signature, anonymous).unwrap_err();
    assert_eq!(
        err.to_body(),
        json!({
            "inspector": ["User must be a member of the 'safety' group"],
            "manager": ["User must be a member of at least one of these groups: 'owners', 'managers'"]
        })
    );
}

#[test]
fn test_anonymous_user_is_null() {
    let signature = Signature::new("whoami").param(
        Parameter::new("user", TypeSpec::Unannotated)
            .bind(ParamSettings::current_user().build().unwrap()),
    );
    let args = call(signature, Request::builder().uri("/me").build()).unwrap();
    assert!(args.get(0).is_some_and(Value::is_null));
}

#[test]
fn test_header_sources() {
    let signature = Signature::new("trace")
        .param(Parameter::new("request_id", TypeSpec::Str).bind(ParamSettings::header().build().unwrap()))
        .param(
            Parameter::new("agent", TypeSpec::Str)
                .bind(ParamSettings::header().source("User-Agent").build().unwrap()),
        )
        .param(
            Parameter::new("headers", TypeSpec::Unannotated)
                .bind(ParamSettings::header().source("*").build().unwrap()),
        );
    let request = Request::builder()
        .uri("/trace")
        .header("Request-Id", "abc")
        .header("User-Agent", "curl/8")
        .build();

    let args = call(signature, request).unwrap();
    assert_eq!(args.arg::<String>(0).unwrap(), "abc");
    assert_eq!(args.arg::<String>(1).unwrap(), "curl/8");
    assert_eq!(
        args.arg::<serde_json::Value>(2).unwrap(),
        json!({"request-id": "abc", "user-agent": "curl/8"})
    );
}

#[test]
fn test_query_wildcard_and_request_passthrough() {
    let signature = Signature::new("search")
        .param(Parameter::unannotated("request"))
        .param(
            Parameter::new("filters", TypeSpec::Unannotated)
                .bind(ParamSettings::query().source("*").build().unwrap()),
        );
    let request = Arc::new(Request::builder().uri("/search?q=lamp&page=2").build());

    let args = endpoint(signature).call(&request, &PathCaptures::new()).unwrap();
    assert!(Arc::ptr_eq(&args.arg::<Arc<Request>>(0).unwrap(), &request));
    assert_eq!(
        args.arg::<serde_json::Value>(1).unwrap(),
        json!({"q": "lamp", "page": "2"})
    );
}

#[test]
fn test_capture_bound_elsewhere_is_server_error() {
    let signature = Signature::new("get_item").param(
        Parameter::new("id", TypeSpec::Int).bind(ParamSettings::query().build().unwrap()),
    );
    let request = Arc::new(Request::builder().uri("/items/3?id=3").build());
    let err = endpoint(signature)
        .call(&request, &PathCaptures::new().with("id", "3"))
        .unwrap_err();
    assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_knob_only_binding_uses_implicit_source() {
    let signature = Signature::new("get_item").param(
        Parameter::new("id", TypeSpec::Int).bind(ParamSettings::param().min_value(5.0).build().unwrap()),
    );
    let request = Arc::new(Request::builder().uri("/items/3").build());
    let err = endpoint(signature)
        .call(&request, &PathCaptures::new().with("id", "3"))
        .unwrap_err();
    assert_eq!(
        err.to_body(),
        json!({"id": ["Ensure this value is greater than or equal to 5."]})
    );
}

proptest! {
    #[test]
    fn query_lists_keep_every_item(items in prop::collection::vec(0_i64..10_000, 1..8)) {
        let joined = items.iter().map(i64::to_string).collect::<Vec<_>>().join(",");
        let signature = Signature::new("ids")
            .param(Parameter::new("ids", TypeSpec::list(TypeSpec::Int)));
        let request = Request::builder().uri(&format!("/ids?ids={joined}")).build();

        let args = call(signature, request).unwrap();
        prop_assert_eq!(args.arg::<Vec<i64>>(0).unwrap(), items);
    }
}
