//! Recording test double for [`DeviceService`].

use std::sync::Mutex;

use async_trait::async_trait;
use common::types::{DataResult, RequestResult};
use serde_json::json;

use super::domain::{
    CreateDeviceRequest, DeviceListQuery, DeviceUserRequest, PreActivationRequest,
    ToggleApprovalRequest,
};
use super::service::DeviceService;
use crate::auth::AuthUser;
use crate::errors::ServiceError;

/// One recorded delegate invocation, with the exact arguments received.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    Create { input: CreateDeviceRequest, caller: AuthUser },
    PreActivation(PreActivationRequest),
    CheckActivationStatus(Option<String>),
    ToggleApprovalStatus { input: ToggleApprovalRequest, caller: AuthUser },
    Devices { query: DeviceListQuery, caller: AuthUser },
    UnlinkDevice(String),
    DeviceStats(AuthUser),
    DeviceDetails(String),
    DeactivateDevice(String),
    ActivateDevice { input: DeviceUserRequest, caller: AuthUser },
    UnlinkUserFromDevice(DeviceUserRequest),
    LinkUserToDevice(DeviceUserRequest),
}

impl DeviceCall {
    pub fn method(&self) -> &'static str {
        match self {
            DeviceCall::Create { .. } => "create",
            DeviceCall::PreActivation(_) => "pre_activation",
            DeviceCall::CheckActivationStatus(_) => "check_activation_status",
            DeviceCall::ToggleApprovalStatus { .. } => "toggle_approval_status",
            DeviceCall::Devices { .. } => "devices",
            DeviceCall::UnlinkDevice(_) => "unlink_device",
            DeviceCall::DeviceStats(_) => "device_stats",
            DeviceCall::DeviceDetails(_) => "device_details",
            DeviceCall::DeactivateDevice(_) => "deactivate_device",
            DeviceCall::ActivateDevice { .. } => "activate_device",
            DeviceCall::UnlinkUserFromDevice(_) => "unlink_user_from_device",
            DeviceCall::LinkUserToDevice(_) => "link_user_to_device",
        }
    }
}

type Failure = Box<dyn Fn() -> ServiceError + Send + Sync>;

/// Records every call and answers with configured results.
///
/// Without configuration, mutations answer `RequestResult::ok(<method>)` and
/// reads answer `DataResult::ok(<method>, {"method": <method>})`.
#[derive(Default)]
pub struct RecordingDeviceService {
    calls: Mutex<Vec<DeviceCall>>,
    request_result: Option<RequestResult>,
    data_result: Option<DataResult>,
    failure: Option<Failure>,
}

impl RecordingDeviceService {
    pub fn new() -> Self { Self::default() }

    pub fn with_request_result(mut self, result: RequestResult) -> Self {
        self.request_result = Some(result);
        self
    }

    pub fn with_data_result(mut self, result: DataResult) -> Self {
        self.data_result = Some(result);
        self
    }

    pub fn failing_with<F>(mut self, f: F) -> Self
    where
        F: Fn() -> ServiceError + Send + Sync + 'static,
    {
        self.failure = Some(Box::new(f));
        self
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn record(&self, call: DeviceCall) -> Result<&'static str, ServiceError> {
        let method = call.method();
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);
        match &self.failure {
            Some(f) => Err(f()),
            None => Ok(method),
        }
    }

    fn ack(&self, call: DeviceCall) -> Result<RequestResult, ServiceError> {
        let method = self.record(call)?;
        Ok(self.request_result.clone().unwrap_or_else(|| RequestResult::ok(method)))
    }

    fn data(&self, call: DeviceCall) -> Result<DataResult, ServiceError> {
        let method = self.record(call)?;
        Ok(self
            .data_result
            .clone()
            .unwrap_or_else(|| DataResult::ok(method, json!({ "method": method }))))
    }
}

#[async_trait]
impl DeviceService for RecordingDeviceService {
    async fn create(&self, input: CreateDeviceRequest, caller: &AuthUser) -> Result<RequestResult, ServiceError> {
        self.ack(DeviceCall::Create { input, caller: caller.clone() })
    }

    async fn pre_activation(&self, input: PreActivationRequest) -> Result<DataResult, ServiceError> {
        self.data(DeviceCall::PreActivation(input))
    }

    async fn check_activation_status(&self, device_id: Option<&str>) -> Result<DataResult, ServiceError> {
        self.data(DeviceCall::CheckActivationStatus(device_id.map(str::to_string)))
    }

    async fn toggle_approval_status(&self, input: ToggleApprovalRequest, caller: &AuthUser) -> Result<RequestResult, ServiceError> {
        self.ack(DeviceCall::ToggleApprovalStatus { input, caller: caller.clone() })
    }

    async fn devices(&self, query: DeviceListQuery, caller: &AuthUser) -> Result<DataResult, ServiceError> {
        self.data(DeviceCall::Devices { query, caller: caller.clone() })
    }

    async fn unlink_device(&self, imei: &str) -> Result<RequestResult, ServiceError> {
        self.ack(DeviceCall::UnlinkDevice(imei.to_string()))
    }

    async fn device_stats(&self, caller: &AuthUser) -> Result<DataResult, ServiceError> {
        self.data(DeviceCall::DeviceStats(caller.clone()))
    }

    async fn device_details(&self, id: &str) -> Result<DataResult, ServiceError> {
        self.data(DeviceCall::DeviceDetails(id.to_string()))
    }

    async fn deactivate_device(&self, imei: &str) -> Result<RequestResult, ServiceError> {
        self.ack(DeviceCall::DeactivateDevice(imei.to_string()))
    }

    async fn activate_device(&self, input: DeviceUserRequest, caller: &AuthUser) -> Result<RequestResult, ServiceError> {
        self.ack(DeviceCall::ActivateDevice { input, caller: caller.clone() })
    }

    async fn unlink_user_from_device(&self, input: DeviceUserRequest) -> Result<RequestResult, ServiceError> {
        self.ack(DeviceCall::UnlinkUserFromDevice(input))
    }

    async fn link_user_to_device(&self, input: DeviceUserRequest) -> Result<RequestResult, ServiceError> {
        self.ack(DeviceCall::LinkUserToDevice(input))
    }
}
