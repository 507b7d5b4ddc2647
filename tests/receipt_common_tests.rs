use wasl_server::receipt::common::{escape_typst_string, receipt_file_name};
use wasl_server::receipt::TextDirectionFormatter;

#[test]
fn test_escape_typst_string() {
    assert_eq!(
        escape_typst_string(r#"Hello "World""#),
        r#"Hello \"World\""#
    );
    assert_eq!(escape_typst_string("Line1\nLine2"), r"Line1\nLine2");
}

#[test]
fn test_receipt_file_name() {
    assert_eq!(receipt_file_name("0001", "دهن"), "وصل_0001_دهن.pdf");
    assert_eq!(receipt_file_name("0020", "زيت  محرك"), "وصل_0020_زيتمحرك.pdf");
}

#[test]
fn test_display_is_identity_without_arabic() {
    let formatter = TextDirectionFormatter::new();
    for s in ["RIMAH AL EAMAR", "2025-01-31", "1,500.5 USD", "a \"quoted\" line"] {
        assert_eq!(formatter.display(s), s);
    }
}

#[test]
fn test_display_changes_arabic() {
    let formatter = TextDirectionFormatter::new();
    let shaped = formatter.display("وصل استلام آجل");
    assert_ne!(shaped, "وصل استلام آجل");
    assert_eq!(shaped.split(' ').count(), 3);
}
