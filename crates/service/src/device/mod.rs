//! Device lifecycle delegate: DTOs, the [`DeviceService`] contract, a
//! recording test double and the HTTP upstream adapter.

pub mod domain;
pub mod mock;
pub mod remote;
pub mod service;

pub use domain::{
    ActivationStatusQuery, CreateDeviceRequest, DeviceListQuery, DeviceUserRequest,
    PreActivationRequest, ToggleApprovalRequest,
};
pub use service::DeviceService;
