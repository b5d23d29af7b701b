use std::sync::Arc;

use service::auth::TokenVerifier;
use service::device::DeviceService;

#[derive(Clone)]
pub struct ServerState {
    pub devices: Arc<dyn DeviceService>,
    pub verifier: TokenVerifier,
    /// Runtime environment name, e.g. `development` or `production`.
    pub environment: String,
}

impl ServerState {
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
