//! Receipt submission pipeline.
//!
//! `submit` runs validation, numbering and rendering in that order. Nothing
//! is touched on disk until validation passes. Once a number has been drawn
//! it is spent, even if rendering fails afterwards.

use chrono::Local;
use std::sync::Arc;

use super::amount::FormattedAmount;
use super::common::receipt_file_name;
use super::composer::ReceiptComposer;
use super::models::ReceiptRequest;
use super::sequence::{FileSequenceStore, SequenceCounter, SequenceStore};
use super::traits::{PdfEngine, Validator};
use super::{GeneratedReceipt, ReceiptError, TypstRenderEngine};
use crate::config::{PathsConfig, ReceiptAssets};

pub struct ReceiptService<S: SequenceStore = FileSequenceStore> {
    counter: SequenceCounter<S>,
    composer: ReceiptComposer,
}

impl ReceiptService<FileSequenceStore> {
    /// Production wiring: file-backed counter and the Typst CLI.
    pub fn from_config(paths: &PathsConfig, assets: ReceiptAssets, typst_bin: &str) -> Self {
        let engine = Arc::new(TypstRenderEngine::new(typst_bin, assets.font_dir.clone()));
        Self::with_engine(paths, assets, engine)
    }

    pub fn with_engine(
        paths: &PathsConfig,
        assets: ReceiptAssets,
        engine: Arc<dyn PdfEngine>,
    ) -> Self {
        let counter = SequenceCounter::from_file(paths.counter_file.clone());
        log::info!(
            "Numbering receipts from {}",
            counter.store().path().display()
        );
        let composer =
            ReceiptComposer::new(assets.template, assets.logo, paths.receipts_dir.clone(), engine);
        Self::new(counter, composer)
    }
}

impl<S: SequenceStore> ReceiptService<S> {
    pub fn new(counter: SequenceCounter<S>, composer: ReceiptComposer) -> Self {
        Self { counter, composer }
    }

    pub fn counter(&self) -> &SequenceCounter<S> {
        &self.counter
    }

    pub fn composer(&self) -> &ReceiptComposer {
        &self.composer
    }

    /// Validate, number and render one receipt.
    pub fn submit(&self, request: ReceiptRequest) -> Result<GeneratedReceipt, ReceiptError> {
        log::debug!("Validating receipt request for item {:?}", request.item);
        let fields = request.validate().map_err(|errors| {
            log::info!("Receipt request rejected: {:?}", errors.fields());
            ReceiptError::Validation(errors)
        })?;

        let sequence_number = self.counter.next();
        log::info!("Issued receipt number {}", sequence_number);

        let amount = FormattedAmount::new(fields.amount, fields.currency);
        if amount.words.is_empty() {
            log::warn!(
                "Receipt {} has no words restatement for amount {}",
                sequence_number,
                fields.amount
            );
        }

        let issued_at = Local::now();
        let path = self
            .composer
            .render(&fields, &sequence_number, &amount, &issued_at)
            .map_err(|e| {
                log::error!("Rendering receipt {} failed: {}", sequence_number, e);
                ReceiptError::Render(e)
            })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| receipt_file_name(&sequence_number, &fields.item));

        Ok(GeneratedReceipt {
            sequence_number,
            file_name,
            path,
            issued_at,
        })
    }
}
