//! Runtime configuration: filesystem layout, static assets, and server binding.
//!
//! Everything is read from the environment (optionally seeded from `.env`),
//! with defaults that mirror the layout the receipt tool has always used:
//! the counter file and the receipts folder live next to each other under a
//! single data root.

use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const COUNTER_FILE_NAME: &str = "invoice_counter.txt";
pub const RECEIPTS_DIR_NAME: &str = "الفواتير";
pub const FONT_FILE_NAME: &str = "amiri.ttf";
pub const LOGO_FILE_NAME: &str = "logo.png";
pub const TEMPLATE_FILE_NAME: &str = "receipt.typ";

/// Errors raised while loading configuration or required static assets.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("font file amiri.ttf not found (searched {0:?})")]
    MissingFont(Vec<PathBuf>),
    #[error("receipt template not found at {0}")]
    MissingTemplate(PathBuf),
    #[error("invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
    #[error("typst binary '{0}' is not usable: {1}")]
    TypstUnavailable(String, String),
}

/// Explicit filesystem locations used by the counter and the composer.
#[derive(Debug, Clone)]
pub struct PathsConfig {
    pub counter_file: PathBuf,
    pub receipts_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub template_file: PathBuf,
    pub logo_file: PathBuf,
}

impl PathsConfig {
    /// Build the conventional layout under a data root and an assets dir.
    pub fn new(data_dir: impl AsRef<Path>, assets_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        let assets_dir = assets_dir.as_ref().to_path_buf();
        Self {
            counter_file: data_dir.join(COUNTER_FILE_NAME),
            receipts_dir: data_dir.join(RECEIPTS_DIR_NAME),
            template_file: assets_dir.join(TEMPLATE_FILE_NAME),
            logo_file: assets_dir.join(LOGO_FILE_NAME),
            assets_dir,
        }
    }

    /// Candidate locations for the Arabic font, in lookup order.
    pub fn font_candidates(&self) -> Vec<PathBuf> {
        vec![
            self.assets_dir.join(FONT_FILE_NAME),
            self.assets_dir.join("fonts").join(FONT_FILE_NAME),
        ]
    }
}

/// Get the bundled static assets directory path.
pub fn get_static_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}

/// Static assets resolved and checked at startup.
#[derive(Debug, Clone)]
pub struct ReceiptAssets {
    /// Directory handed to Typst as `--font-path`.
    pub font_dir: PathBuf,
    pub template: String,
    /// `None` when the logo is missing; receipts are drawn without it.
    pub logo: Option<PathBuf>,
}

impl ReceiptAssets {
    /// Resolve the font, template and logo.
    ///
    /// The font and the template are mandatory. A missing logo only produces
    /// a warning.
    pub fn load(paths: &PathsConfig) -> Result<Self, ConfigError> {
        let candidates = paths.font_candidates();
        let font_file = candidates
            .iter()
            .find(|p| p.is_file())
            .cloned()
            .ok_or_else(|| ConfigError::MissingFont(candidates.clone()))?;
        let font_dir = font_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| paths.assets_dir.clone());

        let template = std::fs::read_to_string(&paths.template_file)
            .map_err(|_| ConfigError::MissingTemplate(paths.template_file.clone()))?;

        let logo = if paths.logo_file.is_file() {
            Some(paths.logo_file.clone())
        } else {
            log::warn!(
                "Logo not found at {}, receipts will be rendered without it",
                paths.logo_file.display()
            );
            None
        };

        log::info!("Using font from {}", font_file.display());

        Ok(Self {
            font_dir,
            template,
            logo,
        })
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub typst_bin: String,
    pub bind_addr: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let data_dir = env::var("WASL_DATA_DIR").unwrap_or_else(|_| ".".to_string());
        let assets_dir = env::var("WASL_ASSETS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| get_static_dir().to_path_buf());
        let typst_bin = env::var("WASL_TYPST_BIN").unwrap_or_else(|_| "typst".to_string());
        let bind_addr = env::var("WASL_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match env::var("WASL_PORT") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidVar {
                name: "WASL_PORT",
                value,
            })?,
            Err(_) => 8080,
        };

        let cors_origins = env::var("WASL_CORS_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:5173".to_string(),
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:8080".to_string(),
                ]
            });

        Ok(Self {
            paths: PathsConfig::new(data_dir, assets_dir),
            typst_bin,
            bind_addr,
            port,
            cors_origins,
        })
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
