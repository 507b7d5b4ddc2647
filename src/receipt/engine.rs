//! Typst rendering engine.
//!
//! Handles the low-level details of writing Typst source to a temporary
//! directory, staging images next to it, invoking the compiler, and reading
//! back the output PDF.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

use super::traits::{PdfEngine, StagedAsset};
use super::RenderError;
use crate::config::ConfigError;

const SOURCE_FILE: &str = "receipt.typ";
const OUTPUT_FILE: &str = "receipt.pdf";

/// Compiles Typst documents by shelling out to the `typst` CLI.
#[derive(Debug, Clone)]
pub struct TypstRenderEngine {
    binary: String,
    font_dir: PathBuf,
}

impl TypstRenderEngine {
    pub fn new(binary: impl Into<String>, font_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            font_dir: font_dir.into(),
        }
    }

    /// Check that the configured binary runs at all.
    pub fn probe(&self) -> Result<String, ConfigError> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .map_err(|e| ConfigError::TypstUnavailable(self.binary.clone(), e.to_string()))?;

        if !output.status.success() {
            return Err(ConfigError::TypstUnavailable(
                self.binary.clone(),
                format!("exited with {}", output.status),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl PdfEngine for TypstRenderEngine {
    fn compile(&self, source: &str, assets: &[StagedAsset<'_>]) -> Result<Vec<u8>, RenderError> {
        // Create temp directory for compilation context
        let temp_dir = tempdir().map_err(RenderError::TempDir)?;

        for asset in assets {
            fs::copy(asset.source, temp_dir.path().join(asset.name))
                .map_err(RenderError::StageLogo)?;
        }

        fs::write(temp_dir.path().join(SOURCE_FILE), source).map_err(RenderError::WriteTypst)?;

        compile_typst_to_pdf(&self.binary, &self.font_dir, &temp_dir)
    }
}

/// Compile the staged source file to PDF.
fn compile_typst_to_pdf(
    binary: &str,
    font_dir: &Path,
    temp_dir: &TempDir,
) -> Result<Vec<u8>, RenderError> {
    let typ_path = temp_dir.path().join(SOURCE_FILE);
    let output_path = temp_dir.path().join(OUTPUT_FILE);

    let output = Command::new(binary)
        .arg("compile")
        .arg("--font-path")
        .arg(font_dir)
        .arg(&typ_path)
        .arg(&output_path)
        .current_dir(temp_dir.path())
        .output()
        .map_err(RenderError::TypstIo)?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        log::error!("Typst compilation failed ({}): {}", code, stderr);
        return Err(RenderError::TypstExit(code, stderr));
    }

    fs::read(&output_path).map_err(RenderError::ReadPdf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_fails_probe() {
        let engine = TypstRenderEngine::new("definitely-not-a-typst-binary", ".");
        assert!(matches!(
            engine.probe(),
            Err(ConfigError::TypstUnavailable(_, _))
        ));
    }

    #[test]
    fn test_missing_binary_is_a_render_error() {
        let engine = TypstRenderEngine::new("definitely-not-a-typst-binary", ".");
        let err = engine.compile("#set page(paper: \"a6\")", &[]).unwrap_err();
        assert!(matches!(err, RenderError::TypstIo(_)));
    }

    #[test]
    fn test_missing_asset_is_a_render_error() {
        let engine = TypstRenderEngine::new("typst", ".");
        let assets = [StagedAsset {
            name: "logo.png",
            source: Path::new("/nonexistent/logo.png"),
        }];
        let err = engine.compile("", &assets).unwrap_err();
        assert!(matches!(err, RenderError::StageLogo(_)));
    }
}
