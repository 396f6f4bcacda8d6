pub mod config;
pub mod output;
pub mod session;
pub mod simulate;
pub mod status;

use std::path::Path;

use barrier_core::{BarrierController, Config};

/// Load config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

pub fn seeded_controller(config: &Config) -> BarrierController {
    BarrierController::with_settings(config.controller_settings())
}

pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
