use async_trait::async_trait;
use common::types::{DataResult, RequestResult};
use tracing::instrument;

use super::domain::{
    CreateDeviceRequest, DeviceListQuery, DeviceUserRequest, PreActivationRequest,
    ToggleApprovalRequest,
};
use super::service::DeviceService;
use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::upstream::{with_caller, Upstream};

/// [`DeviceService`] backed by the device-service upstream.
///
/// Each call is forwarded to the same relative path the public route uses,
/// with the caller identity in `x-caller-*` headers.
pub struct RemoteDeviceService {
    upstream: Upstream,
}

impl RemoteDeviceService {
    pub fn new(upstream: Upstream) -> Self { Self { upstream } }
}

#[async_trait]
impl DeviceService for RemoteDeviceService {
    #[instrument(skip(self, input, caller), fields(imei = ?input.imei, caller = %caller.id))]
    async fn create(&self, input: CreateDeviceRequest, caller: &AuthUser) -> Result<RequestResult, ServiceError> {
        let url = self.upstream.url("/device", &[])?;
        let req = with_caller(self.upstream.client().post(url), caller).json(&input);
        self.upstream.send(req).await
    }

    #[instrument(skip(self, input), fields(imei = ?input.imei))]
    async fn pre_activation(&self, input: PreActivationRequest) -> Result<DataResult, ServiceError> {
        let url = self.upstream.url("/device/pre-activation", &[])?;
        self.upstream.send(self.upstream.client().post(url).json(&input)).await
    }

    async fn check_activation_status(&self, device_id: Option<&str>) -> Result<DataResult, ServiceError> {
        let url = self.upstream.url("/device/check-activation-status", &[])?;
        let mut req = self.upstream.client().get(url);
        if let Some(device_id) = device_id {
            req = req.query(&[("deviceId", device_id)]);
        }
        self.upstream.send(req).await
    }

    #[instrument(skip(self, input, caller), fields(imei = ?input.imei, caller = %caller.id))]
    async fn toggle_approval_status(&self, input: ToggleApprovalRequest, caller: &AuthUser) -> Result<RequestResult, ServiceError> {
        let url = self.upstream.url("/device/toggle-approval", &[])?;
        let req = with_caller(self.upstream.client().post(url), caller).json(&input);
        self.upstream.send(req).await
    }

    async fn devices(&self, query: DeviceListQuery, caller: &AuthUser) -> Result<DataResult, ServiceError> {
        let url = self.upstream.url("/device/list", &[])?;
        let req = with_caller(self.upstream.client().get(url), caller).query(&query);
        self.upstream.send(req).await
    }

    #[instrument(skip(self))]
    async fn unlink_device(&self, imei: &str) -> Result<RequestResult, ServiceError> {
        let url = self.upstream.url("/device/unlink", &[imei])?;
        self.upstream.send(self.upstream.client().get(url)).await
    }

    async fn device_stats(&self, caller: &AuthUser) -> Result<DataResult, ServiceError> {
        let url = self.upstream.url("/device/stats", &[])?;
        self.upstream.send(with_caller(self.upstream.client().get(url), caller)).await
    }

    async fn device_details(&self, id: &str) -> Result<DataResult, ServiceError> {
        let url = self.upstream.url("/device/details", &[id])?;
        self.upstream.send(self.upstream.client().get(url)).await
    }

    #[instrument(skip(self))]
    async fn deactivate_device(&self, imei: &str) -> Result<RequestResult, ServiceError> {
        let url = self.upstream.url("/device/deactivate", &[imei])?;
        self.upstream.send(self.upstream.client().post(url)).await
    }

    #[instrument(skip(self, input, caller), fields(imei = ?input.imei, user_id = ?input.user_id))]
    async fn activate_device(&self, input: DeviceUserRequest, caller: &AuthUser) -> Result<RequestResult, ServiceError> {
        let url = self.upstream.url("/device/activate", &[])?;
        let req = with_caller(self.upstream.client().post(url), caller).json(&input);
        self.upstream.send(req).await
    }

    #[instrument(skip(self, input), fields(imei = ?input.imei, user_id = ?input.user_id))]
    async fn unlink_user_from_device(&self, input: DeviceUserRequest) -> Result<RequestResult, ServiceError> {
        let url = self.upstream.url("/device/unlink-user", &[])?;
        self.upstream.send(self.upstream.client().post(url).json(&input)).await
    }

    #[instrument(skip(self, input), fields(imei = ?input.imei, user_id = ?input.user_id))]
    async fn link_user_to_device(&self, input: DeviceUserRequest) -> Result<RequestResult, ServiceError> {
        let url = self.upstream.url("/device/link-user", &[])?;
        self.upstream.send(self.upstream.client().post(url).json(&input)).await
    }
}
