use wasl_server::receipt::{ReceiptError, RenderError, ValidationError, ValidationErrors};
use wasl_server::ErrorResponse;

#[test]
fn test_error_response_constructors() {
    let error_response = ErrorResponse::bad_request("Invalid receipt file name");
    assert_eq!(error_response.error, "BadRequest");
    assert!(error_response.message.contains("file name"));

    assert_eq!(ErrorResponse::not_found("x").error, "NotFound");
    assert_eq!(ErrorResponse::internal_error("x").error, "InternalServerError");
}

#[test]
fn test_error_response_serialization() {
    let error = ErrorResponse::new("ValidationError", "المبلغ يجب أن يكون أكبر من الصفر");

    let json = serde_json::to_string(&error).unwrap();
    let back: ErrorResponse = serde_json::from_str(&json).unwrap();

    assert_eq!(back.error, "ValidationError");
    assert_eq!(back.message, error.message);
    assert!(chrono::DateTime::parse_from_rfc3339(&back.timestamp).is_ok());
}

#[test]
fn test_render_error_keeps_cause() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only filesystem");
    let err = ReceiptError::from(RenderError::WriteReceipt(io));

    let message = err.to_string();
    assert!(message.contains("failed to write receipt file"));
    assert!(message.contains("read-only filesystem"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_validation_error_lists_fields() {
    let mut errors = ValidationErrors::new();
    errors.add(ValidationError::empty_field("description", "الوصف"));
    let err = ReceiptError::from(errors);

    assert!(matches!(err, ReceiptError::Validation(_)));
    assert!(err.to_string().contains("[description]"));
}

#[test]
fn test_malformed_json_requests() {
    let result: Result<wasl_server::receipt::ReceiptRequest, _> =
        serde_json::from_str("{ malformed json ");
    assert!(result.is_err());

    let unknown_currency = r#"{"item":"a","responsible_person":"b","site":"c","equipment":"d","amount":"1","currency":"EUR","description":"e"}"#;
    let result: Result<wasl_server::receipt::ReceiptRequest, _> =
        serde_json::from_str(unknown_currency);
    assert!(result.is_err());
}
