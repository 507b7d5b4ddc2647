//! Receipt page layout and file output.
//!
//! The composer resolves every string that appears on the page, runs it
//! through [`TextDirectionFormatter`], fills the Typst template, hands the
//! source to a [`PdfEngine`] and writes the PDF into the receipts folder.

use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::amount::FormattedAmount;
use super::common::{format_date, format_time, receipt_file_name, typst_visual_string};
use super::direction::TextDirectionFormatter;
use super::models::ReceiptFields;
use super::traits::{PdfEngine, StagedAsset};
use super::RenderError;

const LOGO_ASSET_NAME: &str = "logo.png";

const COMPANY_TITLE: &str = "RIMAH AL EAMAR COMPANY for General Contracting";
const BAND_CAPTION: &str = "وصل استلام اجل وصل استلام اجل وصل استلام اجل وصل استلام اجل";
const COMPANY_LINES: [&str; 3] = ["شركة رماح الاعمار", "للتجارة والمقاولات", "العامة المحدودة"];
const DEPARTMENT_LINES: [&str; 3] = [
    "الادارة المالية العامة",
    "قسم الحسابات ",
    "حسابات مواقع العمل",
];
const TITLE: &str = "وصل استلام آجل";
const SIGNATURE_CAPTION: &str = "اسم وتوقيع مسؤول الموقع";

/// Every display string of one receipt, shaped and in visual order.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedReceipt {
    pub company_title: String,
    pub band_caption: String,
    pub company_lines: Vec<String>,
    pub department_lines: Vec<String>,
    pub title: String,
    pub time_label: String,
    pub date_label: String,
    pub number_label: String,
    /// Amount, item, person, site, equipment, words, description, signature.
    pub rows: Vec<String>,
}

impl FormattedReceipt {
    pub fn build(
        fields: &ReceiptFields,
        sequence_number: &str,
        amount: &FormattedAmount,
        issued_at: &DateTime<Local>,
        direction: &TextDirectionFormatter,
    ) -> Self {
        let d = |s: &str| direction.display(s);

        let rows = [
            amount.display.clone(),
            format!("الصنف  المستحق: {}", fields.item),
            format!("مسؤول   الموقع: {}", fields.responsible_person),
            format!("اسم موقع العمل: {}", fields.site),
            format!("الالية  او  مادة : {}", fields.equipment),
            format!("مبلغ  الاستحقاق: {}", amount.words),
            format!("الوصف او كمية : {}", fields.description),
            SIGNATURE_CAPTION.to_string(),
        ];

        Self {
            company_title: d(COMPANY_TITLE),
            band_caption: d(BAND_CAPTION),
            company_lines: COMPANY_LINES.iter().map(|s| d(s)).collect(),
            department_lines: DEPARTMENT_LINES.iter().map(|s| d(s)).collect(),
            title: d(TITLE),
            time_label: d(&format!("الوقت: {}", format_time(issued_at))),
            date_label: d(&format!("الــتـاريــخ: {}", format_date(issued_at))),
            number_label: d(&format!("الوصل: {}", sequence_number)),
            rows: rows.iter().map(|s| d(s)).collect(),
        }
    }
}

/// Lays out receipts and writes them to the receipts directory.
pub struct ReceiptComposer {
    template: String,
    logo: Option<PathBuf>,
    receipts_dir: PathBuf,
    engine: Arc<dyn PdfEngine>,
    direction: TextDirectionFormatter,
}

impl ReceiptComposer {
    pub fn new(
        template: impl Into<String>,
        logo: Option<PathBuf>,
        receipts_dir: impl Into<PathBuf>,
        engine: Arc<dyn PdfEngine>,
    ) -> Self {
        Self {
            template: template.into(),
            logo,
            receipts_dir: receipts_dir.into(),
            engine,
            direction: TextDirectionFormatter::new(),
        }
    }

    pub fn receipts_dir(&self) -> &Path {
        &self.receipts_dir
    }

    /// Render one receipt and return the absolute path of the written file.
    pub fn render(
        &self,
        fields: &ReceiptFields,
        sequence_number: &str,
        amount: &FormattedAmount,
        issued_at: &DateTime<Local>,
    ) -> Result<PathBuf, RenderError> {
        let formatted =
            FormattedReceipt::build(fields, sequence_number, amount, issued_at, &self.direction);
        let source = self.render_template(&formatted);

        let mut assets = Vec::new();
        if let Some(logo) = &self.logo {
            assets.push(StagedAsset {
                name: LOGO_ASSET_NAME,
                source: logo,
            });
        }

        let pdf = self.engine.compile(&source, &assets)?;

        fs::create_dir_all(&self.receipts_dir).map_err(RenderError::CreateDir)?;
        let file_name = receipt_file_name(sequence_number, &fields.item);
        let path = self.receipts_dir.join(&file_name);
        fs::write(&path, pdf).map_err(RenderError::WriteReceipt)?;

        log::info!("Receipt {} written to {}", sequence_number, path.display());
        Ok(fs::canonicalize(&path).unwrap_or(path))
    }

    /// Fill the template's data block and append its function body.
    pub fn render_template(&self, receipt: &FormattedReceipt) -> String {
        let logo = if self.logo.is_some() {
            format!("\"{}\"", LOGO_ASSET_NAME)
        } else {
            "none".to_string()
        };

        format!(
            r#"#let receipt(
  data: (
    logo: {},
    company_title: {},
    band_caption: {},
    company_lines: {},
    department_lines: {},
    title: {},
    time_label: {},
    date_label: {},
    number_label: {},
    rows: {},
  ),
) = {{
{}
#receipt()
"#,
            logo,
            typst_visual_string(&receipt.company_title),
            typst_visual_string(&receipt.band_caption),
            typst_array(&receipt.company_lines),
            typst_array(&receipt.department_lines),
            typst_visual_string(&receipt.title),
            typst_visual_string(&receipt.time_label),
            typst_visual_string(&receipt.date_label),
            typst_visual_string(&receipt.number_label),
            typst_array(&receipt.rows),
            self.extract_function_body(),
        )
    }

    fn extract_function_body(&self) -> String {
        if let Some(start) = self.template.find(") = {") {
            let body_start = start + 5;
            if let Some(end) = self.template.rfind("#receipt()") {
                if end > body_start {
                    return self.template[body_start..end].to_string();
                }
            }
        }
        self.template.clone()
    }
}

fn typst_array(items: &[String]) -> String {
    let mut out = String::from("(");
    for item in items {
        out.push_str(&typst_visual_string(item));
        out.push_str(", ");
    }
    out.push(')');
    out
}
