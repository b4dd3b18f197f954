//! Integration tests for class-style typed views.

use http::{Method, StatusCode};
use serde_json::json;
use std::sync::Arc;
use typed_views::prelude::*;

struct Products {
    currency: &'static str,
}

impl TypedView for Products {
    type Output = serde_json::Value;

    fn name(&self) -> &str {
        "products"
    }

    fn routes(&self) -> Vec<MethodRoute<Self, serde_json::Value>> {
        let get = Signature::new("get")
            .param(Parameter::receiver())
            .param(Parameter::new("category", TypeSpec::Str))
            .param(
                Parameter::new("max_price", TypeSpec::Decimal)
                    .bind(ParamSettings::query().decimal_places(2).build().unwrap()),
            )
            .param(Parameter::new("in_stock", TypeSpec::Bool).with_default(true));

        let post = Signature::new("post")
            .param(Parameter::receiver())
            .param(
                Parameter::new("name", TypeSpec::Str)
                    .bind(ParamSettings::body().source("name").max_length(10).build().unwrap()),
            )
            .param(
                Parameter::new("price", TypeSpec::Decimal)
                    .bind(ParamSettings::body().source("price").min_value(0.0).build().unwrap()),
            );

        vec![
            MethodRoute::new(Method::GET, get, |view: &Products, args: Args| {
                json!({
                    "category": args.arg::<String>(0).unwrap(),
                    "max_price": args.arg::<String>(1).unwrap(),
                    "in_stock": args.arg::<bool>(2).unwrap(),
                    "currency": view.currency,
                })
            }),
            MethodRoute::new(Method::POST, post, |_: &Products, args: Args| {
                json!({
                    "name": args.arg::<String>(0).unwrap(),
                    "price": args.get(1).map(Value::to_json),
                })
            }),
        ]
    }

    fn view_config(&self) -> ViewConfig {
        ViewConfig::builder()
            .permission_classes(["IsAuthenticated"])
            .build()
    }
}

fn mounted() -> MountedView<Products> {
    TypedViews::default()
        .mount(Products { currency: "EUR" })
        .unwrap()
}

#[test]
fn test_get_handler() {
    let request = Arc::new(
        Request::builder()
            .uri("/products/lamps?max_price=19.99")
            .build(),
    );
    let captures = PathCaptures::new().with("category", "lamps");

    let body = mounted().dispatch(&request, &captures).unwrap();
    assert_eq!(
        body,
        json!({"category": "lamps", "max_price": "19.99", "in_stock": true, "currency": "EUR"})
    );
}

#[test]
fn test_post_handler() {
    let request = Arc::new(
        Request::builder()
            .method(Method::POST)
            .uri("/products")
            .json(json!({"name": "lamp", "price": "12.5"}))
            .build(),
    );
    let body = mounted().dispatch(&request, &PathCaptures::new()).unwrap();
    assert_eq!(body, json!({"name": "lamp", "price": "12.5"}));
}

#[test]
fn test_post_validation_error() {
    let request = Arc::new(
        Request::builder()
            .method(Method::POST)
            .uri("/products")
            .json(json!({"name": "a very long lamp name", "price": -1}))
            .build(),
    );
    let err = mounted().dispatch(&request, &PathCaptures::new()).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        err.to_body(),
        json!({
            "name": ["Ensure this field has no more than 10 characters."],
            "price": ["Ensure this value is greater than or equal to 0."]
        })
    );
}

#[test]
fn test_unrouted_method() {
    let request = Arc::new(
        Request::builder()
            .method(Method::DELETE)
            .uri("/products")
            .build(),
    );
    let err = mounted().dispatch(&request, &PathCaptures::new()).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(err.allow_header().as_deref(), Some("GET, POST"));
}

#[test]
fn test_unmatched_capture_is_server_error() {
    let request = Arc::new(Request::builder().uri("/products/lamps").build());
    let captures = PathCaptures::new()
        .with("category", "lamps")
        .with("shop", "north");
    let err = mounted().dispatch(&request, &captures).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(matches!(err, TypedViewError::Resolution(_)));
}

#[test]
fn test_mounted_view_metadata() {
    let view = mounted();
    assert_eq!(view.allowed_methods(), [Method::GET, Method::POST]);
    assert_eq!(view.view_config().permission_classes(), ["IsAuthenticated"]);
    assert_eq!(view.view().currency, "EUR");
}

struct Twice;

impl TypedView for Twice {
    type Output = usize;

    fn name(&self) -> &str {
        "twice"
    }

    fn routes(&self) -> Vec<MethodRoute<Self, usize>> {
        let sig = || Signature::new("get").param(Parameter::receiver());
        vec![
            MethodRoute::new(Method::GET, sig(), |_: &Twice, args: Args| args.len()),
            MethodRoute::new(Method::GET, sig(), |_: &Twice, args: Args| args.len() + 1),
        ]
    }
}

#[test]
fn test_duplicate_method_rejected() {
    let err = TypedViews::default().mount(Twice).unwrap_err();
    assert!(matches!(err, WrapError::DuplicateMethod { .. }));
}

struct Unbound;

impl TypedView for Unbound {
    type Output = usize;

    fn name(&self) -> &str {
        "unbound"
    }

    fn routes(&self) -> Vec<MethodRoute<Self, usize>> {
        let get = Signature::new("get").param(Parameter::new("limit", TypeSpec::Int));
        vec![MethodRoute::new(Method::GET, get, |_: &Unbound, args: Args| args.len())]
    }
}

#[test]
fn test_route_without_receiver_rejected() {
    let err = TypedViews::default().mount(Unbound).unwrap_err();
    assert!(matches!(err, WrapError::InvalidReceiver { ref endpoint } if endpoint == "get"));
}

#[test]
fn test_dispatch_once() {
    let request = Arc::new(Request::builder().uri("/products/chairs?max_price=5").build());
    let captures = PathCaptures::new().with("category", "chairs");
    let body = TypedViews::default()
        .dispatch(Products { currency: "USD" }, &request, &captures)
        .unwrap();
    assert_eq!(body["max_price"], json!("5.00"));
}
