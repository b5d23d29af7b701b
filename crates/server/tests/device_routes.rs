use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::Service;

use common::types::{DataResult, PageMeta, RequestResult};
use server::routes::{self, device::DEVICE_ROUTES};
use server::state::ServerState;
use service::auth::token::{issue_token, Claims};
use service::auth::{AuthUser, Role, TokenVerifier};
use service::device::mock::{DeviceCall, RecordingDeviceService};
use service::device::{CreateDeviceRequest, DeviceListQuery, DeviceUserRequest};
use service::errors::ServiceError;

const SECRET: &str = "device-routes-secret";
const IMEI: &str = "356938035643809";

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

fn build_app(devices: Arc<RecordingDeviceService>, environment: &str) -> Router {
    let state = ServerState {
        devices,
        verifier: TokenVerifier::new(SECRET),
        environment: environment.to_string(),
    };
    routes::build_router(state, cors())
}

fn user(role: Role) -> AuthUser {
    AuthUser { id: "17".into(), email: Some("officer@lasdri.gov.ng".into()), role }
}

fn token_for(role: Role) -> String {
    issue_token(SECRET, &user(role), chrono::Duration::minutes(10)).unwrap()
}

/// A concrete request for each route, with a body where the route takes one.
fn concrete(path: &str) -> (String, Option<Value>) {
    let user_body = json!({"imei": IMEI, "userId": "u-1"});
    match path {
        "/device" => (path.into(), Some(json!({"imei": IMEI, "model": "A920"}))),
        "/device/pre-activation" => (path.into(), Some(json!({"imei": IMEI}))),
        "/device/check-activation-status" => (format!("{path}?deviceId=dev-1"), None),
        "/device/toggle-approval" => (path.into(), Some(json!({"imei": IMEI, "approved": true}))),
        "/device/list" => (format!("{path}?page=1"), None),
        "/device/unlink/:imei" => (format!("/device/unlink/{IMEI}"), None),
        "/device/stats" => (path.into(), None),
        "/device/details/:id" => ("/device/details/42".into(), None),
        "/device/deactivate/:imei" => (format!("/device/deactivate/{IMEI}"), None),
        "/device/activate" | "/device/unlink-user" | "/device/link-user" => (path.into(), Some(user_body)),
        other => panic!("no concrete request for {other}"),
    }
}

fn request(method: &str, uri: &str, body: Option<&Value>, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(v).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.clone().call(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn health_is_public() {
    let app = build_app(Arc::new(RecordingDeviceService::new()), "development");
    let (status, body) = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!({"status": "ok"}));
}

#[tokio::test]
async fn guarded_routes_reject_missing_or_bad_credentials() {
    let spy = Arc::new(RecordingDeviceService::new());
    let app = build_app(spy.clone(), "development");
    let foreign = issue_token("someone-else", &user(Role::Admin), chrono::Duration::minutes(10)).unwrap();

    for spec in DEVICE_ROUTES.iter().filter(|r| r.access.requires_credential()) {
        let (uri, body) = concrete(spec.path);
        for bearer in [None, Some("not-a-jwt"), Some(foreign.as_str())] {
            let (status, raw) = send(&app, request(spec.verb.as_str(), &uri, body.as_ref(), bearer)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", spec.verb.as_str(), uri);
            let err: Value = serde_json::from_slice(&raw).unwrap();
            assert_eq!(err["status"], 401);
        }
    }
    assert_eq!(spy.call_count(), 0);
}

#[tokio::test]
async fn every_allowed_role_reaches_the_delegate() {
    let spy = Arc::new(RecordingDeviceService::new());
    let app = build_app(spy.clone(), "development");
    let mut expected = 0;

    for spec in DEVICE_ROUTES.iter().filter(|r| r.access.requires_credential()) {
        let (uri, body) = concrete(spec.path);
        for role in Role::ALL.iter().copied().filter(|r| spec.access.allows(*r)) {
            let token = token_for(role);
            let (status, _) = send(&app, request(spec.verb.as_str(), &uri, body.as_ref(), Some(&token))).await;
            assert_eq!(status, StatusCode::OK, "{} {} as {}", spec.verb.as_str(), uri, role);
            expected += 1;
        }
    }
    assert_eq!(spy.call_count(), expected);
}

#[tokio::test]
async fn admin_is_forbidden_on_stats() {
    let spy = Arc::new(RecordingDeviceService::new());
    let app = build_app(spy.clone(), "development");

    let (status, raw) = send(&app, request("GET", "/device/stats", None, Some(&token_for(Role::Admin)))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let err: Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(err["error"], "Forbidden");
    assert_eq!(spy.call_count(), 0);

    let (status, _) = send(&app, request("GET", "/device/stats", None, Some(&token_for(Role::MvaaAdmin)))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(spy.calls(), vec![DeviceCall::DeviceStats(user(Role::MvaaAdmin))]);
}

fn token_with_role(role: &str) -> String {
    let claims = Claims {
        sub: "99".into(),
        email: None,
        role: role.into(),
        exp: (chrono::Utc::now() + chrono::Duration::minutes(5)).timestamp() as usize,
        iat: None,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

#[tokio::test]
async fn disallowed_roles_are_forbidden_on_every_guarded_route() {
    let spy = Arc::new(RecordingDeviceService::new());
    let app = build_app(spy.clone(), "development");
    let unknown = token_with_role("student");
    let mut checked = 0;

    for spec in DEVICE_ROUTES.iter().filter(|r| r.access.requires_credential()) {
        let (uri, body) = concrete(spec.path);
        let mut tokens = vec![unknown.clone()];
        tokens.extend(Role::ALL.iter().copied().filter(|r| !spec.access.allows(*r)).map(token_for));
        for token in &tokens {
            let (status, raw) = send(&app, request(spec.verb.as_str(), &uri, body.as_ref(), Some(token))).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", spec.verb.as_str(), uri);
            let err: Value = serde_json::from_slice(&raw).unwrap();
            assert_eq!(err["status"], 403);
            checked += 1;
        }
    }
    // ten guarded routes with the unknown role, plus Admin on stats
    assert_eq!(checked, 11);
    assert_eq!(spy.call_count(), 0);
}

#[tokio::test]
async fn public_routes_need_no_credential() {
    let spy = Arc::new(RecordingDeviceService::new());
    let app = build_app(spy.clone(), "development");

    let body = json!({"imei": IMEI, "pin": "0000"});
    let (status, raw) = send(&app, request("POST", "/device/pre-activation", Some(&body), None)).await;
    assert_eq!(status, StatusCode::OK);
    let res: DataResult = serde_json::from_slice(&raw).unwrap();
    assert_eq!(res.data, json!({"method": "pre_activation"}));

    let (status, _) = send(&app, request("GET", "/device/check-activation-status?deviceId=dev-7", None, None)).await;
    assert_eq!(status, StatusCode::OK);

    let calls = spy.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(&calls[0], DeviceCall::PreActivation(r) if r.imei.as_deref() == Some(IMEI) && r.attributes["pin"] == "0000"));
    assert_eq!(calls[1], DeviceCall::CheckActivationStatus(Some("dev-7".into())));
}

#[tokio::test]
async fn unlink_is_a_no_op_in_production() {
    let spy = Arc::new(RecordingDeviceService::new());
    let app = build_app(spy.clone(), "production");

    let uri = format!("/device/unlink/{IMEI}");
    let (status, body) = send(&app, request("GET", &uri, None, Some(&token_for(Role::Admin)))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
    assert_eq!(spy.call_count(), 0);

    // still guarded
    let (status, _) = send(&app, request("GET", &uri, None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unlink_delegates_outside_production() {
    let spy = Arc::new(RecordingDeviceService::new());
    let app = build_app(spy.clone(), "staging");

    let (status, raw) = send(&app, request("GET", &format!("/device/unlink/{IMEI}"), None, Some(&token_for(Role::DvisAdmin)))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<RequestResult>(&raw).unwrap(), RequestResult::ok("unlink_device"));
    assert_eq!(spy.calls(), vec![DeviceCall::UnlinkDevice(IMEI.into())]);
}

#[tokio::test]
async fn create_passes_body_and_caller_through() {
    let spy = Arc::new(RecordingDeviceService::new().with_request_result(RequestResult::ok("Device created")));
    let app = build_app(spy.clone(), "development");
    let body = json!({"imei": IMEI, "model": "A920", "centreId": 14});

    for path in ["/device", "/device/"] {
        let (status, raw) = send(&app, request("POST", path, Some(&body), Some(&token_for(Role::LasdriAdmin)))).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(serde_json::from_slice::<RequestResult>(&raw).unwrap(), RequestResult::ok("Device created"));
    }

    let input: CreateDeviceRequest = serde_json::from_value(body).unwrap();
    let call = DeviceCall::Create { input, caller: user(Role::LasdriAdmin) };
    assert_eq!(spy.calls(), vec![call.clone(), call]);
}

#[tokio::test]
async fn list_forwards_query_and_returns_payload_unchanged() {
    let payload = DataResult::ok("Devices fetched", json!([{"imei": IMEI}]))
        .with_meta(PageMeta { total: 1, page: 2, per_page: 20 });
    let spy = Arc::new(RecordingDeviceService::new().with_data_result(payload.clone()));
    let app = build_app(spy.clone(), "development");

    let uri = "/device/list?page=2&perPage=20&search=A920";
    let (status, raw) = send(&app, request("GET", uri, None, Some(&token_for(Role::Admin)))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<DataResult>(&raw).unwrap(), payload);

    let query = DeviceListQuery { page: Some(2), per_page: Some(20), search: Some("A920".into()), status: None };
    assert_eq!(spy.calls(), vec![DeviceCall::Devices { query, caller: user(Role::Admin) }]);
}

#[tokio::test]
async fn path_and_body_arguments_reach_the_delegate() {
    let spy = Arc::new(RecordingDeviceService::new());
    let app = build_app(spy.clone(), "development");
    let token = token_for(Role::MvaaAdmin);
    let link = json!({"imei": IMEI, "userId": "u-9"});

    send(&app, request("GET", "/device/details/42", None, Some(&token))).await;
    send(&app, request(Method::POST.as_str(), &format!("/device/deactivate/{IMEI}"), None, Some(&token))).await;
    send(&app, request("POST", "/device/link-user", Some(&link), Some(&token))).await;
    send(&app, request("POST", "/device/unlink-user", Some(&link), Some(&token))).await;
    send(&app, request("POST", "/device/activate", Some(&link), Some(&token))).await;

    let input: DeviceUserRequest = serde_json::from_value(link).unwrap();
    assert_eq!(
        spy.calls(),
        vec![
            DeviceCall::DeviceDetails("42".into()),
            DeviceCall::DeactivateDevice(IMEI.into()),
            DeviceCall::LinkUserToDevice(input.clone()),
            DeviceCall::UnlinkUserFromDevice(input.clone()),
            DeviceCall::ActivateDevice { input, caller: user(Role::MvaaAdmin) },
        ]
    );
}

#[tokio::test]
async fn detail_id_reaches_the_delegate_verbatim() {
    let spy = Arc::new(RecordingDeviceService::new());
    let app = build_app(spy.clone(), "development");
    let token = token_for(Role::Admin);
    for id in ["042", "abc"] {
        let (status, _) = send(&app, request("GET", &format!("/device/details/{id}"), None, Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(spy.calls(), vec![DeviceCall::DeviceDetails("042".into()), DeviceCall::DeviceDetails("abc".into())]);
}

#[tokio::test]
async fn bodies_without_identifying_fields_reach_the_delegate() {
    let spy = Arc::new(RecordingDeviceService::new());
    let app = build_app(spy.clone(), "development");
    let token = token_for(Role::LasdriAdmin);
    let empty = json!({});

    for uri in ["/device", "/device/toggle-approval", "/device/activate", "/device/link-user", "/device/unlink-user"] {
        let (status, _) = send(&app, request("POST", uri, Some(&empty), Some(&token))).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }
    let (status, _) = send(&app, request("POST", "/device/pre-activation", Some(&empty), None)).await;
    assert_eq!(status, StatusCode::OK);

    let calls = spy.calls();
    assert_eq!(calls.len(), 6);
    match &calls[0] {
        DeviceCall::Create { input, .. } => {
            assert!(input.imei.is_none());
            assert_eq!(serde_json::to_value(input).unwrap(), empty);
        }
        other => panic!("unexpected call {other:?}"),
    }
    match &calls[2] {
        DeviceCall::ActivateDevice { input, .. } => assert!(input.imei.is_none() && input.user_id.is_none()),
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn activation_status_without_device_id_reaches_the_delegate() {
    let spy = Arc::new(RecordingDeviceService::new());
    let app = build_app(spy.clone(), "development");
    let (status, _) = send(&app, request("GET", "/device/check-activation-status", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(spy.calls(), vec![DeviceCall::CheckActivationStatus(None)]);
}

#[tokio::test]
async fn delegate_errors_propagate_as_http_errors() {
    let spy = Arc::new(RecordingDeviceService::new().failing_with(|| ServiceError::NotFound("Device not found".into())));
    let app = build_app(spy.clone(), "development");

    let (status, raw) = send(&app, request("GET", "/device/details/7", None, Some(&token_for(Role::DvisAdmin)))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let err: Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(err["status"], 404);
    assert_eq!(err["message"], "Device not found");
    assert_eq!(spy.calls(), vec![DeviceCall::DeviceDetails("7".into())]);
}
