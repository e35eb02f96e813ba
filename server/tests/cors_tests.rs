mod common;

use actix_web::{
    dev::ServiceResponse,
    http::{header, Method, StatusCode},
    test, App,
};
use std::sync::Arc;

use common::state_with;
use work_atlas::{app, db::InMemoryStore};

const ALLOWED_ORIGIN: &str = "http://localhost:5173";

fn origins() -> Vec<String> {
    vec![
        ALLOWED_ORIGIN.to_string(),
        "http://localhost:5174".to_string(),
    ]
}

fn header_value<'a, B>(resp: &'a ServiceResponse<B>, name: header::HeaderName) -> Option<&'a str> {
    resp.headers().get(name).and_then(|value| value.to_str().ok())
}

#[actix_web::test]
async fn allowed_origin_is_echoed_with_credentials() {
    let state = state_with(Arc::new(InMemoryStore::new()));
    let app = test::init_service(
        App::new()
            .wrap(app::cors(&origins()))
            .configure(|cfg| state.configure(cfg)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/allJobs")
        .insert_header((header::ORIGIN, ALLOWED_ORIGIN))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        header_value(&resp, header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(ALLOWED_ORIGIN)
    );
    assert_eq!(
        header_value(&resp, header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
        Some("true")
    );
}

#[actix_web::test]
async fn unlisted_origin_gets_no_allow_origin_header() {
    let state = state_with(Arc::new(InMemoryStore::new()));
    let app = test::init_service(
        App::new()
            .wrap(app::cors(&origins()))
            .configure(|cfg| state.configure(cfg)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/allJobs")
        .insert_header((header::ORIGIN, "https://evil.example"))
        .to_request();

    match test::try_call_service(&app, req).await {
        Ok(resp) => {
            assert!(resp
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none());
        }
        Err(err) => {
            let resp = err.error_response();
            assert!(resp
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none());
        }
    }
}

#[actix_web::test]
async fn preflight_for_patch_succeeds() {
    let state = state_with(Arc::new(InMemoryStore::new()));
    let app = test::init_service(
        App::new()
            .wrap(app::cors(&origins()))
            .configure(|cfg| state.configure(cfg)),
    )
    .await;

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/applied/0123456789abcdef01234567")
        .insert_header((header::ORIGIN, ALLOWED_ORIGIN))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    assert_eq!(
        header_value(&resp, header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(ALLOWED_ORIGIN)
    );
    assert_eq!(
        header_value(&resp, header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
        Some("true")
    );
    let methods = header_value(&resp, header::ACCESS_CONTROL_ALLOW_METHODS).unwrap_or_default();
    assert!(methods.contains("PATCH"), "{methods}");
}
