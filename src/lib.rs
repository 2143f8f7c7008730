//! # stockcomp lib

use std::{env, sync::LazyLock};

use log::warn;
use tokio::sync::RwLock;

use crate::config::AppConfig;

pub mod api;
pub mod chart;
pub mod data;
pub mod error;
pub mod gui;
pub mod query;
pub mod session;
pub mod symbol;
pub mod utils;

pub static VERSION: &str = env!("CARGO_PKG_VERSION");

pub static CHANNEL_BUFFER_DEFAULT: usize = 64;

pub async fn init() {
    env_logger::Builder::new()
        .parse_filters(env::var("LOG").as_deref().unwrap_or("off"))
        .init();

    match config::load() {
        Ok(config) => {
            *CONFIG.write().await = config;
        }
        Err(err) => {
            warn!("Load config error, falling back to defaults: {err}");
        }
    }
}

mod config;
mod ds;

static CONFIG: LazyLock<RwLock<AppConfig>> = LazyLock::new(|| RwLock::new(AppConfig::default()));
