#![allow(dead_code)]

use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

use wasl_server::config::{get_static_dir, PathsConfig, ReceiptAssets};
use wasl_server::receipt::{
    Currency, PdfEngine, ReceiptRequest, ReceiptService, RenderError, StagedAsset,
};

pub const FAKE_PDF: &[u8] = b"%PDF-1.7\n%fake receipt\n";

/// Mock implementation of PdfEngine for testing
#[derive(Default)]
pub struct MockPdfEngine {
    fail: AtomicBool,
    sources: Mutex<Vec<String>>,
}

impl MockPdfEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn last_source(&self) -> Option<String> {
        self.sources.lock().last().cloned()
    }

    pub fn calls(&self) -> usize {
        self.sources.lock().len()
    }
}

impl PdfEngine for MockPdfEngine {
    fn compile(&self, source: &str, _assets: &[StagedAsset<'_>]) -> Result<Vec<u8>, RenderError> {
        self.sources.lock().push(source.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(RenderError::Engine("simulated render failure".to_string()));
        }
        Ok(FAKE_PDF.to_vec())
    }
}

/// A file-backed service rooted in a fresh temporary directory
pub struct TestEnv {
    pub dir: TempDir,
    pub paths: PathsConfig,
    pub engine: Arc<MockPdfEngine>,
    pub service: ReceiptService,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let paths = PathsConfig::new(dir.path(), get_static_dir());
        let template = std::fs::read_to_string(&paths.template_file)
            .expect("Bundled receipt template is missing");
        let assets = ReceiptAssets {
            font_dir: dir.path().to_path_buf(),
            template,
            logo: None,
        };
        let engine = MockPdfEngine::new();
        let service = ReceiptService::with_engine(&paths, assets, engine.clone());

        Self {
            dir,
            paths,
            engine,
            service,
        }
    }

    pub fn counter_value(&self) -> Option<String> {
        std::fs::read_to_string(&self.paths.counter_file).ok()
    }

    pub fn receipt_count(&self) -> usize {
        count_files(&self.paths.receipts_dir)
    }
}

pub fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

pub fn sample_request() -> ReceiptRequest {
    ReceiptRequest {
        item: "دهن".to_string(),
        responsible_person: "أحمد".to_string(),
        site: "موقع1".to_string(),
        equipment: "حفارة".to_string(),
        amount: "1500".to_string(),
        currency: Currency::IraqiDinar,
        description: "صيانة".to_string(),
    }
}
