use async_trait::async_trait;
use common::types::{DataResult, RequestResult};

use super::domain::{
    CreateDeviceRequest, DeviceListQuery, DeviceUserRequest, PreActivationRequest,
    ToggleApprovalRequest,
};
use crate::auth::AuthUser;
use crate::errors::ServiceError;

/// Business operations behind the device routes.
///
/// Handlers call exactly one method per request and return its value as-is;
/// validation and persistence are the implementor's concern.
#[async_trait]
pub trait DeviceService: Send + Sync {
    async fn create(&self, input: CreateDeviceRequest, caller: &AuthUser) -> Result<RequestResult, ServiceError>;
    async fn pre_activation(&self, input: PreActivationRequest) -> Result<DataResult, ServiceError>;
    async fn check_activation_status(&self, device_id: Option<&str>) -> Result<DataResult, ServiceError>;
    async fn toggle_approval_status(&self, input: ToggleApprovalRequest, caller: &AuthUser) -> Result<RequestResult, ServiceError>;
    async fn devices(&self, query: DeviceListQuery, caller: &AuthUser) -> Result<DataResult, ServiceError>;
    async fn unlink_device(&self, imei: &str) -> Result<RequestResult, ServiceError>;
    async fn device_stats(&self, caller: &AuthUser) -> Result<DataResult, ServiceError>;
    async fn device_details(&self, id: &str) -> Result<DataResult, ServiceError>;
    async fn deactivate_device(&self, imei: &str) -> Result<RequestResult, ServiceError>;
    async fn activate_device(&self, input: DeviceUserRequest, caller: &AuthUser) -> Result<RequestResult, ServiceError>;
    async fn unlink_user_from_device(&self, input: DeviceUserRequest) -> Result<RequestResult, ServiceError>;
    async fn link_user_to_device(&self, input: DeviceUserRequest) -> Result<RequestResult, ServiceError>;
}
