//! Device lifecycle routes.
//!
//! Each route is declared once as a [`RouteSpec`] and mounted with its handler;
//! guarded specs get [`crate::guard::enforce`] as a route layer. Handlers are
//! pass-through: one delegate call, result returned as-is.

use axum::{
    extract::{Path, Query, State},
    handler::Handler,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{on, MethodFilter},
    Extension, Json, Router,
};
use common::types::{DataResult, RequestResult};
use service::auth::{AuthUser, Role, TokenVerifier};
use service::device::{
    ActivationStatusQuery, CreateDeviceRequest, DeviceListQuery, DeviceUserRequest,
    PreActivationRequest, ToggleApprovalRequest,
};
use tracing::info;

use crate::errors::ApiError;
use crate::guard::{self, Access, RouteGuard};
use crate::state::ServerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
        }
    }

    fn filter(self) -> MethodFilter {
        match self {
            Verb::Get => MethodFilter::GET,
            Verb::Post => MethodFilter::POST,
        }
    }
}

/// Method, path and authorization of one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteSpec {
    pub verb: Verb,
    pub path: &'static str,
    pub access: Access,
}

const ADMINS: &[Role] = &[Role::Admin, Role::MvaaAdmin, Role::LasdriAdmin, Role::DvisAdmin];
const STATS_ROLES: &[Role] = &[Role::LasdriAdmin, Role::DvisAdmin, Role::MvaaAdmin];
const OFFICERS: &[Role] = &[Role::LasdriAdmin, Role::MvaaAdmin, Role::DvisAdmin, Role::Admin];
const OPERATORS: &[Role] = &[Role::Admin, Role::LasdriAdmin, Role::MvaaAdmin, Role::DvisAdmin];

pub const CREATE: RouteSpec = RouteSpec { verb: Verb::Post, path: "/device", access: Access::Roles(ADMINS) };
pub const PRE_ACTIVATION: RouteSpec = RouteSpec { verb: Verb::Post, path: "/device/pre-activation", access: Access::Public };
pub const CHECK_ACTIVATION_STATUS: RouteSpec = RouteSpec { verb: Verb::Get, path: "/device/check-activation-status", access: Access::Public };
pub const TOGGLE_APPROVAL: RouteSpec = RouteSpec { verb: Verb::Post, path: "/device/toggle-approval", access: Access::Roles(ADMINS) };
pub const LIST: RouteSpec = RouteSpec { verb: Verb::Get, path: "/device/list", access: Access::Roles(ADMINS) };
pub const UNLINK: RouteSpec = RouteSpec { verb: Verb::Get, path: "/device/unlink/:imei", access: Access::Roles(ADMINS) };
pub const STATS: RouteSpec = RouteSpec { verb: Verb::Get, path: "/device/stats", access: Access::Roles(STATS_ROLES) };
pub const DETAILS: RouteSpec = RouteSpec { verb: Verb::Get, path: "/device/details/:id", access: Access::Roles(OFFICERS) };
pub const DEACTIVATE: RouteSpec = RouteSpec { verb: Verb::Post, path: "/device/deactivate/:imei", access: Access::Roles(OPERATORS) };
pub const ACTIVATE: RouteSpec = RouteSpec { verb: Verb::Post, path: "/device/activate", access: Access::Roles(OPERATORS) };
pub const UNLINK_USER: RouteSpec = RouteSpec { verb: Verb::Post, path: "/device/unlink-user", access: Access::Roles(OFFICERS) };
pub const LINK_USER: RouteSpec = RouteSpec { verb: Verb::Post, path: "/device/link-user", access: Access::Roles(OFFICERS) };

/// Every device route, in declaration order.
pub const DEVICE_ROUTES: [RouteSpec; 12] = [
    CREATE,
    PRE_ACTIVATION,
    CHECK_ACTIVATION_STATUS,
    TOGGLE_APPROVAL,
    LIST,
    UNLINK,
    STATS,
    DETAILS,
    DEACTIVATE,
    ACTIVATE,
    UNLINK_USER,
    LINK_USER,
];

fn mount<H, T>(spec: RouteSpec, handler: H, verifier: &TokenVerifier) -> Router<ServerState>
where
    H: Handler<T, ServerState>,
    T: 'static,
{
    let router = Router::new().route(spec.path, on(spec.verb.filter(), handler));
    if !spec.access.requires_credential() {
        return router;
    }
    let route_guard = RouteGuard { verifier: verifier.clone(), access: spec.access };
    router.route_layer(middleware::from_fn_with_state(route_guard, guard::enforce))
}

pub fn router(verifier: &TokenVerifier) -> Router<ServerState> {
    Router::new()
        .merge(mount(CREATE, create, verifier))
        .merge(mount(RouteSpec { path: "/device/", ..CREATE }, create, verifier))
        .merge(mount(PRE_ACTIVATION, pre_activation, verifier))
        .merge(mount(CHECK_ACTIVATION_STATUS, check_activation_status, verifier))
        .merge(mount(TOGGLE_APPROVAL, toggle_approval_status, verifier))
        .merge(mount(LIST, devices, verifier))
        .merge(mount(UNLINK, unlink_device, verifier))
        .merge(mount(STATS, device_stats, verifier))
        .merge(mount(DETAILS, device_details, verifier))
        .merge(mount(DEACTIVATE, deactivate_device, verifier))
        .merge(mount(ACTIVATE, activate_device, verifier))
        .merge(mount(UNLINK_USER, unlink_user_from_device, verifier))
        .merge(mount(LINK_USER, link_user_to_device, verifier))
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(caller): Extension<AuthUser>,
    Json(input): Json<CreateDeviceRequest>,
) -> Result<Json<RequestResult>, ApiError> {
    info!(imei = ?input.imei, caller = %caller.id, "device_create_request");
    Ok(Json(state.devices.create(input, &caller).await?))
}

pub async fn pre_activation(
    State(state): State<ServerState>,
    Json(input): Json<PreActivationRequest>,
) -> Result<Json<DataResult>, ApiError> {
    Ok(Json(state.devices.pre_activation(input).await?))
}

pub async fn check_activation_status(
    State(state): State<ServerState>,
    Query(q): Query<ActivationStatusQuery>,
) -> Result<Json<DataResult>, ApiError> {
    Ok(Json(state.devices.check_activation_status(q.device_id.as_deref()).await?))
}

pub async fn toggle_approval_status(
    State(state): State<ServerState>,
    Extension(caller): Extension<AuthUser>,
    Json(input): Json<ToggleApprovalRequest>,
) -> Result<Json<RequestResult>, ApiError> {
    Ok(Json(state.devices.toggle_approval_status(input, &caller).await?))
}

pub async fn devices(
    State(state): State<ServerState>,
    Extension(caller): Extension<AuthUser>,
    Query(query): Query<DeviceListQuery>,
) -> Result<Json<DataResult>, ApiError> {
    Ok(Json(state.devices.devices(query, &caller).await?))
}

/// Disabled in production: answers 200 with an empty body and never reaches
/// the delegate.
pub async fn unlink_device(
    State(state): State<ServerState>,
    Path(imei): Path<String>,
) -> Result<Response, ApiError> {
    if state.is_production() {
        return Ok(StatusCode::OK.into_response());
    }
    let result = state.devices.unlink_device(&imei).await?;
    Ok(Json(result).into_response())
}

pub async fn device_stats(
    State(state): State<ServerState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<DataResult>, ApiError> {
    Ok(Json(state.devices.device_stats(&caller).await?))
}

pub async fn device_details(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<DataResult>, ApiError> {
    Ok(Json(state.devices.device_details(&id).await?))
}

pub async fn deactivate_device(
    State(state): State<ServerState>,
    Path(imei): Path<String>,
) -> Result<Json<RequestResult>, ApiError> {
    info!(imei = %imei, "device_deactivate_request");
    Ok(Json(state.devices.deactivate_device(&imei).await?))
}

pub async fn activate_device(
    State(state): State<ServerState>,
    Extension(caller): Extension<AuthUser>,
    Json(input): Json<DeviceUserRequest>,
) -> Result<Json<RequestResult>, ApiError> {
    info!(imei = ?input.imei, user_id = ?input.user_id, caller = %caller.id, "device_activate_request");
    Ok(Json(state.devices.activate_device(input, &caller).await?))
}

pub async fn unlink_user_from_device(
    State(state): State<ServerState>,
    Json(input): Json<DeviceUserRequest>,
) -> Result<Json<RequestResult>, ApiError> {
    Ok(Json(state.devices.unlink_user_from_device(input).await?))
}

pub async fn link_user_to_device(
    State(state): State<ServerState>,
    Json(input): Json<DeviceUserRequest>,
) -> Result<Json<RequestResult>, ApiError> {
    Ok(Json(state.devices.link_user_to_device(input).await?))
}
