use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use configs::{AppConfig, UpstreamsConfig};
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use service::auth::TokenVerifier;
use service::device::remote::RemoteDeviceService;
use service::device::DeviceService;
use service::feature::{Feature, FeatureService, RemoteFeature};
use service::license::LicenseModule;
use service::upstream::Upstream;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

/// Everything wired at startup.
pub struct Modules {
    pub devices: Arc<dyn DeviceService>,
    pub license: LicenseModule,
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn load_bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

fn upstream_for(url: &str, timeout: Duration) -> Result<Upstream, StartupError> {
    Ok(Upstream::new(url, timeout)?)
}

/// One remote feature service per configured upstream. Absent upstreams are
/// skipped here and reported by the module builder.
fn remote_imports(upstreams: &UpstreamsConfig) -> Result<Vec<Arc<dyn FeatureService>>, StartupError> {
    let timeout = Duration::from_secs(upstreams.timeout_secs);
    let slots = [
        (Feature::Exam, &upstreams.exam),
        (Feature::DrivingTest, &upstreams.driving_test),
        (Feature::DrivingSchool, &upstreams.driving_school),
        (Feature::Payment, &upstreams.payment),
        (Feature::Users, &upstreams.users),
        (Feature::Auth, &upstreams.auth),
    ];
    let mut imports: Vec<Arc<dyn FeatureService>> = Vec::with_capacity(slots.len());
    for (feature, url) in slots {
        match url {
            Some(url) => {
                let upstream = upstream_for(url, timeout)?;
                info!(feature = %feature, base_url = upstream.base_url(), "feature upstream configured");
                imports.push(Arc::new(RemoteFeature::new(feature, upstream)));
            }
            None => warn!(feature = %feature, "no upstream configured for feature"),
        }
    }
    Ok(imports)
}

/// Wire the device delegate and the license module. Any missing piece is fatal.
pub fn compose(cfg: &AppConfig, db: DatabaseConnection) -> Result<Modules, StartupError> {
    let device_url = cfg
        .upstreams
        .device
        .as_deref()
        .ok_or_else(|| StartupError::InvalidConfig("upstreams.device is not set; set it in config.toml or DEVICE_SERVICE_URL".into()))?;
    let timeout = Duration::from_secs(cfg.upstreams.timeout_secs);
    let devices: Arc<dyn DeviceService> = Arc::new(RemoteDeviceService::new(upstream_for(device_url, timeout)?));

    let license = LicenseModule::builder()
        .persistence(db)
        .import_all(remote_imports(&cfg.upstreams)?)
        .build()?;

    Ok(Modules { devices, license })
}

pub fn build_state(cfg: &AppConfig, modules: &Modules) -> ServerState {
    ServerState {
        devices: Arc::clone(&modules.devices),
        verifier: TokenVerifier::new(&cfg.auth.jwt_secret),
        environment: cfg.server.environment.clone(),
    }
}

/// Resolves on Ctrl+C; pending forever if the handler cannot be installed.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(event = "shutdown_signal", "received Ctrl+C, draining connections"),
        Err(e) => {
            warn!(err = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

/// Serve `app` until `shutdown` resolves, then drain in-flight requests.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("server stopped");
    Ok(())
}

/// Compose modules from a validated configuration and serve HTTP until
/// `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let db = models::db::connect_with_config(&cfg.database).await?;
    let modules = compose(&cfg, db)?;
    let state = build_state(&cfg, &modules);

    let app: Router = routes::build_router(state, build_cors());

    let addr = load_bind_addr(&cfg)?;
    info!(%addr, environment = %cfg.server.environment, "starting licensing admin server");
    let listener = TcpListener::bind(addr).await?;
    serve(listener, app, shutdown).await?;
    Ok(())
}
