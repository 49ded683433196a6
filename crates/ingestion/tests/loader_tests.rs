//! Integration tests for loading generated measurement sheets from disk.

use ingestion::{load_table, CellValue, IngestionError};
use test_utils::{sample_survey, SheetFixture, SheetValue, TempSheet, REQUIRED_HEADERS};

// ============================================================================
// Format parity
// ============================================================================

#[test]
fn test_xlsx_and_csv_yield_same_table() {
    let xlsx = TempSheet::xlsx(&sample_survey()).unwrap();
    let csv = TempSheet::csv(&sample_survey()).unwrap();

    let from_xlsx = load_table(&xlsx.path).unwrap();
    let from_csv = load_table(&csv.path).unwrap();

    assert_eq!(from_xlsx, from_csv);
    assert_eq!(from_xlsx.len(), 5);
}

#[test]
fn test_xlsx_headers_and_typed_cells() {
    let sheet = TempSheet::xlsx(&sample_survey()).unwrap();
    let table = load_table(&sheet.path).unwrap();

    let headers: Vec<&str> = table.headers().iter().map(String::as_str).collect();
    assert_eq!(headers, REQUIRED_HEADERS);

    assert_eq!(table.cell(0, 1), Some(&CellValue::Number(30.0)));
    assert_eq!(table.cell(2, 4), Some(&CellValue::Text("O13".into())));
    assert_eq!(table.cell(3, 4), Some(&CellValue::Text("4C".into())));
}

// ============================================================================
// Sparse rows
// ============================================================================

#[test]
fn test_xlsx_gaps_are_empty_and_blank_rows_dropped() {
    let fixture = SheetFixture::with_required_headers()
        .tree(1.0, 30.0, 10.0, 0.5, "A1")
        .row(vec![SheetValue::Empty; 5])
        .row(vec![
            SheetValue::Number(2.0),
            SheetValue::Empty,
            SheetValue::Number(12.0),
        ]);
    let sheet = TempSheet::xlsx(&fixture).unwrap();
    let table = load_table(&sheet.path).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.cell(1, 0), Some(&CellValue::Number(2.0)));
    assert_eq!(table.cell(1, 1), Some(&CellValue::Empty));
    assert_eq!(table.cell(1, 4), Some(&CellValue::Empty));
}

#[test]
fn test_csv_text_with_commas_survives() {
    let fixture = SheetFixture::with_required_headers().row(vec![
        SheetValue::from("Oak, north"),
        SheetValue::Number(30.0),
        SheetValue::Number(10.0),
        SheetValue::Number(0.5),
        SheetValue::from("B2"),
    ]);
    let sheet = TempSheet::csv(&fixture).unwrap();
    let table = load_table(&sheet.path).unwrap();

    assert_eq!(table.cell(0, 0), Some(&CellValue::Text("Oak, north".into())));
    assert_eq!(table.cell(0, 4), Some(&CellValue::Text("B2".into())));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_corrupt_workbook_is_an_xlsx_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tree_data.xlsx");
    std::fs::write(&path, b"PK\x03\x04 definitely not a zip").unwrap();

    assert!(matches!(load_table(&path), Err(IngestionError::Xlsx(_))));
}

#[test]
fn test_header_only_sheet_loads_empty() {
    let sheet = TempSheet::xlsx(&SheetFixture::with_required_headers()).unwrap();
    let table = load_table(&sheet.path).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.headers().len(), 5);
}
