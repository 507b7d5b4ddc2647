use actix_cors::Cors;
use actix_web::middleware::{Compress, Logger};
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod receipt;

use crate::config::{AppConfig, ReceiptAssets};
use crate::receipt::{ReceiptService, TypstRenderEngine};

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::receipt::handlers::create_receipt,
        crate::receipt::handlers::download_receipt
    ),
    components(
        schemas(
            receipt::models::ReceiptRequest,
            receipt::models::ReceiptResponse,
            receipt::amount::Currency,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Receipts", description = "Deferred payment receipt endpoints.")
    )
)]
pub struct ApiDoc;

/// Build the receipt service from configuration, checking every startup asset.
pub fn build_service(config: &AppConfig) -> anyhow::Result<ReceiptService> {
    let assets = ReceiptAssets::load(&config.paths)?;

    let engine = TypstRenderEngine::new(&config.typst_bin, assets.font_dir.clone());
    let version = engine.probe()?;
    log::info!("Rendering receipts with {}", version);

    Ok(ReceiptService::from_config(
        &config.paths,
        assets,
        &config.typst_bin,
    ))
}

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;
    let service = match build_service(&config) {
        Ok(service) => web::Data::new(service),
        Err(e) => {
            log::error!("Receipt service cannot start: {:#}", e);
            std::process::exit(1);
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("wasl_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("failed to create Prometheus metrics middleware: {}", e))?;

    log::info!(
        "Starting server at http://{}:{}, receipts in {}",
        config.bind_addr,
        config.port,
        config.paths.receipts_dir.display()
    );

    let origins = config.cors_origins.clone();
    HttpServer::new(move || {
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(Logger::default())
            .wrap(prometheus.clone())
            .wrap(cors)
            .app_data(service.clone())
            .service(web::scope("/api").configure(receipt::handlers::config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
