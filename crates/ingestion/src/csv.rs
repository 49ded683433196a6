//! Minimal CSV parser that produces a [`Table`].
//!
//! Handles RFC 4180 quoting (including quoted newlines and doubled quotes),
//! CRLF line endings and a leading UTF-8 byte order mark. The first record
//! is the header; blank lines are skipped.

use crate::error::{IngestionError, Result};
use crate::table::{CellValue, Table};

const BOM: char = '\u{feff}';

/// Parse CSV bytes into a [`Table`].
pub(crate) fn parse_csv(data: &[u8]) -> Result<Table> {
    let text = std::str::from_utf8(data)
        .map_err(|e| IngestionError::Csv(format!("input is not valid UTF-8: {}", e)))?;
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut records = split_records(text)?.into_iter();

    let headers = records.next().ok_or(IngestionError::EmptyTable)?;
    let rows: Vec<Vec<CellValue>> = records
        .map(|fields| fields.iter().map(|f| CellValue::from_text(f)).collect())
        .collect();

    tracing::debug!(columns = headers.len(), rows = rows.len(), "Parsed CSV table");

    Ok(Table::new(headers, rows))
}

/// Split CSV text into records of raw field strings.
fn split_records(text: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                fields.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut fields));
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(IngestionError::Csv("unterminated quoted field".to_string()));
    }

    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        push_record(&mut records, fields);
    }

    Ok(records)
}

/// Keep a record unless it is a blank line.
fn push_record(records: &mut Vec<Vec<String>>, fields: Vec<String>) {
    let blank = fields.iter().all(|f| f.trim().is_empty());
    if !blank {
        records.push(fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let table = parse_csv(b"A/A,DBH (cm)\n1,30\n2,45.5\n").unwrap();
        assert_eq!(table.headers(), &["A/A".to_string(), "DBH (cm)".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, 1), Some(&CellValue::Number(45.5)));
    }

    #[test]
    fn test_quoted_fields() {
        let table = parse_csv(b"id,note\n1,\"a, b\"\n2,\"say \"\"hi\"\"\"\n3,\"two\nlines\"\n").unwrap();
        assert_eq!(table.cell(0, 1), Some(&CellValue::Text("a, b".into())));
        assert_eq!(table.cell(1, 1), Some(&CellValue::Text("say \"hi\"".into())));
        assert_eq!(table.cell(2, 1), Some(&CellValue::Text("two\nlines".into())));
    }

    #[test]
    fn test_crlf_bom_and_blank_lines() {
        let data = "\u{feff}id,coord\r\n1,A5\r\n\r\n,\r\n2,B7".as_bytes();
        let table = parse_csv(data).unwrap();
        assert_eq!(table.headers()[0], "id");
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, 1), Some(&CellValue::Text("B7".into())));
    }

    #[test]
    fn test_empty_fields_and_short_rows() {
        let table = parse_csv(b"a,b,c\n1,,3\n4\n").unwrap();
        assert_eq!(table.cell(0, 1), Some(&CellValue::Empty));
        assert_eq!(table.cell(1, 2), Some(&CellValue::Empty));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(parse_csv(b""), Err(IngestionError::EmptyTable)));
        assert!(matches!(parse_csv(b"a\n\"open"), Err(IngestionError::Csv(_))));
        assert!(matches!(parse_csv(&[0xff, 0xfe]), Err(IngestionError::Csv(_))));
    }
}
