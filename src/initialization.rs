use std::env;
use log::info;
use log4rs::Handle;
use crate::config::{load_config, Config};
use crate::logging::setup_logger;
use crate::manager_forecast::ForecastClient;
use crate::storage::Storage;

/// Default configuration file, used when none is given on the command line or in CONFIG_FILE
const DEFAULT_CONFIG: &str = "config.toml";

/// Everything a run needs
pub struct Mgr {
    pub config: Config,
    pub storage: Storage,
    pub client: ForecastClient,
    _log_handle: Handle,
}

/// Loads configuration, starts logging and instantiates storage and forecast client
///
pub fn init() -> anyhow::Result<Mgr> {
    let config_path = env::args()
        .nth(1)
        .or_else(|| env::var("CONFIG_FILE").ok())
        .unwrap_or(DEFAULT_CONFIG.to_string());

    let config = load_config(&config_path)?;
    let log_handle = setup_logger(&config.general)?;

    info!("cityrank version: {}", env!("CARGO_PKG_VERSION"));
    info!("configuration loaded from {}", config_path);

    let storage = Storage::new(&config.files);
    let client = ForecastClient::new(&config.fetch);

    Ok(Mgr { config, storage, client, _log_handle: log_handle })
}
