use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::amount::Currency;
use super::common::encode_path_segment;
use super::traits::Validator;
use super::validation::{validate_amount, validate_required, ValidationErrors};
use super::GeneratedReceipt;

/// Form fields submitted for one receipt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ReceiptRequest {
    /// Item the payment is for
    pub item: String,
    pub responsible_person: String,
    pub site: String,
    /// Equipment or material name
    pub equipment: String,
    /// Amount as typed; `,` thousands separators are accepted
    pub amount: String,
    #[serde(default)]
    pub currency: Currency,
    pub description: String,
}

/// A request that passed validation, with the amount parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptFields {
    pub item: String,
    pub responsible_person: String,
    pub site: String,
    pub equipment: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub description: String,
}

impl Validator for ReceiptRequest {
    type Valid = ReceiptFields;

    /// Validate all fields and report every problem at once.
    fn validate(&self) -> Result<ReceiptFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        validate_required(&self.item, "item", "اسم الصنف", &mut errors);
        validate_required(
            &self.responsible_person,
            "responsible_person",
            "اسم مسؤول الموقع",
            &mut errors,
        );
        validate_required(&self.site, "site", "موقع العمل", &mut errors);
        validate_required(&self.equipment, "equipment", "نوع الآلية", &mut errors);
        let amount = validate_amount(&self.amount, "amount", "المبلغ المستحق", &mut errors);
        validate_required(&self.description, "description", "الوصف", &mut errors);

        errors.into_result()?;

        Ok(ReceiptFields {
            item: self.item.trim().to_string(),
            responsible_person: self.responsible_person.trim().to_string(),
            site: self.site.trim().to_string(),
            equipment: self.equipment.trim().to_string(),
            amount: amount.unwrap_or_default(),
            currency: self.currency,
            description: self.description.trim().to_string(),
        })
    }
}

/// Response returned after a receipt has been generated.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReceiptResponse {
    pub sequence_number: String,
    pub file_name: String,
    /// Absolute path of the generated PDF on the server
    pub path: String,
    pub download_url: String,
    pub issued_at: DateTime<Local>,
}

impl From<GeneratedReceipt> for ReceiptResponse {
    fn from(receipt: GeneratedReceipt) -> Self {
        Self {
            download_url: format!(
                "/api/receipts/{}",
                encode_path_segment(&receipt.file_name)
            ),
            sequence_number: receipt.sequence_number,
            file_name: receipt.file_name,
            path: receipt.path.display().to_string(),
            issued_at: receipt.issued_at,
        }
    }
}
