//! Input validation for receipt submissions.
//!
//! Errors carry the failing field, an Arabic message for the person filling
//! the form, and a suggestion on how to fix it.

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Validation error with detailed, user-friendly messages.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    pub message: String,
    /// Suggestion for how to fix the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Create error for empty required field
    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("حقل {} لا يمكن أن يكون فارغاً", label))
            .with_suggestion(format!("يرجى تعبئة {}", label))
    }

    /// Create error for an amount that is not a number
    pub fn invalid_amount(field: &str, value: &str) -> Self {
        Self::new(
            field,
            format!("المبلغ '{}' يجب أن يكون رقماً صحيحاً أو عشرياً", value),
        )
        .with_suggestion("أدخل المبلغ بالأرقام، مثال: 1500 أو 1,250.5")
    }

    /// Create error for a zero or negative amount
    pub fn non_positive_amount(field: &str) -> Self {
        Self::new(field, "المبلغ يجب أن يكون أكبر من الصفر")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors with formatted output.
#[derive(Debug, Default, Clone)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Names of the fields that failed, in the order they were checked.
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }

    /// Get a numbered, multi-line message suitable for showing to the user
    pub fn to_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!("فشل التحقق: {} خطأ\n", self.errors.len())];

        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }

        parts.push(String::new());
        parts.push("يرجى تصحيح البيانات أعلاه والمحاولة مرة أخرى.".to_string());

        parts.join("\n")
    }

    /// Ok if no errors were collected
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_message())
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// Validation functions
// ============================================================================

/// Validate that a string is not empty after trimming
pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

/// Parse a positive amount, accepting `,` as a thousands separator.
pub fn parse_amount(value: &str) -> Option<Decimal> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// Validate the amount field and return the parsed value when it is usable
pub fn validate_amount(
    value: &str,
    field: &str,
    label: &str,
    errors: &mut ValidationErrors,
) -> Option<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(ValidationError::empty_field(field, label));
        return None;
    }

    match parse_amount(trimmed) {
        Some(amount) if amount > Decimal::ZERO => Some(amount),
        Some(_) => {
            errors.add(ValidationError::non_positive_amount(field));
            None
        }
        None => {
            errors.add(ValidationError::invalid_amount(field, trimmed));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_with_separators() {
        assert_eq!(parse_amount("1,500"), Some(Decimal::from(1500)));
        assert_eq!(parse_amount(" 12.5 "), Decimal::from_str("12.5").ok());
        assert_eq!(parse_amount("2e3"), Some(Decimal::from(2000)));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(","), None);
    }

    #[test]
    fn test_validate_amount_distinguishes_failures() {
        let mut errors = ValidationErrors::new();
        assert!(validate_amount("0", "amount", "المبلغ", &mut errors).is_none());
        assert!(validate_amount("-5", "amount", "المبلغ", &mut errors).is_none());
        assert!(validate_amount("ten", "amount", "المبلغ", &mut errors).is_none());
        assert!(validate_amount("  ", "amount", "المبلغ", &mut errors).is_none());

        let messages: Vec<String> = errors.iter().map(|e| e.message.clone()).collect();
        assert_eq!(messages.len(), 4);
        assert!(messages[0].contains("أكبر من الصفر"));
        assert!(messages[1].contains("أكبر من الصفر"));
        assert!(messages[2].contains("رقماً"));
        assert!(messages[3].contains("فارغاً"));
    }

    #[test]
    fn test_message_numbering() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::empty_field("item", "اسم الصنف"));
        errors.add(ValidationError::non_positive_amount("amount"));

        let msg = errors.to_message();
        assert!(msg.contains("2 خطأ"));
        assert!(msg.contains("1. [item]"));
        assert!(msg.contains("2. [amount]"));
        assert_eq!(errors.fields(), vec!["item", "amount"]);
    }
}
