use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Application-level constants
pub const APP_NAME: &str = "CareLink Risk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Pipeline artifact looked up next to the running binary's working directory.
pub const DEFAULT_MODEL_PATH: &str = "model_carelink.json";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Where `carelink-synth` writes its dataset unless told otherwise.
pub const DEFAULT_DATASET_PATH: &str = "dataset_carelink_training.csv";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "carelink_risk=info,carelink_synth=info,warn"
}

/// Runtime configuration for the scoring service.
///
/// Every flag can also be supplied through its environment variable,
/// which is how container deployments usually set them.
#[derive(Debug, Clone, Parser)]
#[command(name = "carelink-risk", version, about = "Serve appointment no-show risk scores")]
pub struct ServiceConfig {
    /// Address the HTTP server binds to.
    #[arg(long, env = "CARELINK_BIND", default_value = DEFAULT_BIND_ADDR)]
    pub bind: SocketAddr,

    /// Path of the trained scoring pipeline artifact.
    #[arg(long, env = "CARELINK_MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 5000)),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
        }
    }
}
