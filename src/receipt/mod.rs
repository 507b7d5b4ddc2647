//! Receipt module - numbering, formatting and PDF generation for payment receipts.
//!
//! The pipeline is driven by [`ReceiptService`]:
//! - `validation` - field checks with user-facing messages
//! - `sequence` - the persisted receipt counter
//! - `amount` - currency display and the spelled-out amount
//! - `direction` - Arabic shaping and visual reordering
//! - `composer` - Typst page layout and file output
//! - `engine` - the Typst CLI wrapper

pub mod amount;
pub mod common;
pub mod composer;
pub mod direction;
pub mod engine;
pub mod handlers;
pub mod models;
pub mod sequence;
pub mod service;
pub mod traits;
pub mod validation;

pub use amount::{AmountFormatter, Currency, FormattedAmount};
pub use composer::{FormattedReceipt, ReceiptComposer};
pub use direction::TextDirectionFormatter;
pub use engine::TypstRenderEngine;
pub use models::{ReceiptRequest, ReceiptResponse};
pub use sequence::{FileSequenceStore, MemorySequenceStore, SequenceCounter, SequenceStore};
pub use service::ReceiptService;
pub use traits::{PdfEngine, StagedAsset, Validator};
pub use validation::{ValidationError, ValidationErrors};

use chrono::{DateTime, Local};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while composing or writing a receipt.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("failed to stage logo image: {0}")]
    StageLogo(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {0}: {1}")]
    TypstExit(i32, String),
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
    #[error("failed to create receipts directory: {0}")]
    CreateDir(#[source] std::io::Error),
    #[error("failed to write receipt file: {0}")]
    WriteReceipt(#[source] std::io::Error),
    #[error("{0}")]
    Engine(String),
}

/// Failure of a receipt submission.
#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl From<ValidationErrors> for ReceiptError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Result of a successful receipt generation.
#[derive(Debug, Clone)]
pub struct GeneratedReceipt {
    pub sequence_number: String,
    pub file_name: String,
    pub path: PathBuf,
    pub issued_at: DateTime<Local>,
}
