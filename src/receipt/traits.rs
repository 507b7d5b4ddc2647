//! Traits shared by the receipt pipeline.

use std::path::Path;

use super::RenderError;

/// Trait for validating request objects.
pub trait Validator {
    type Valid;

    /// Check every field and return the normalized value, or all problems found.
    fn validate(&self) -> Result<Self::Valid, super::ValidationErrors>;
}

/// A file copied next to the Typst source before compilation.
#[derive(Debug, Clone, Copy)]
pub struct StagedAsset<'a> {
    /// Name the template refers to.
    pub name: &'a str,
    pub source: &'a Path,
}

/// Turns a complete Typst document into PDF bytes.
pub trait PdfEngine: Send + Sync {
    fn compile(&self, source: &str, assets: &[StagedAsset<'_>]) -> Result<Vec<u8>, RenderError>;
}
