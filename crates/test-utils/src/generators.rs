//! Test data generators for creating input files and synthetic grids.
//!
//! The workbook writer produces the smallest `.xlsx` package the loader
//! accepts: content types, workbook, workbook relationships, shared strings
//! and a single worksheet.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::fixtures::{SheetFixture, SheetValue};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Trees" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#;

/// Spreadsheet column letters for a 0-based column index (`0` → `A`, `26` → `AA`).
pub fn spreadsheet_column(mut idx: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn to_io_error(err: zip::result::ZipError) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err)
}

/// Build the worksheet XML and the shared string table for a fixture.
fn sheet_parts(fixture: &SheetFixture) -> (String, Vec<String>) {
    let mut shared: Vec<String> = Vec::new();
    let mut intern = |s: &str| -> usize {
        match shared.iter().position(|existing| existing == s) {
            Some(idx) => idx,
            None => {
                shared.push(s.to_string());
                shared.len() - 1
            }
        }
    };

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    let header_row: Vec<SheetValue> = fixture
        .headers
        .iter()
        .map(|h| SheetValue::Text(h.clone()))
        .collect();

    for (row_idx, row) in std::iter::once(&header_row)
        .chain(fixture.rows.iter())
        .enumerate()
    {
        let row_num = row_idx + 1;
        xml.push_str(&format!(r#"<row r="{row_num}">"#));
        for (col_idx, value) in row.iter().enumerate() {
            let cell_ref = format!("{}{}", spreadsheet_column(col_idx), row_num);
            match value {
                SheetValue::Number(n) => {
                    xml.push_str(&format!(r#"<c r="{cell_ref}"><v>{n}</v></c>"#));
                }
                SheetValue::Text(s) => {
                    let idx = intern(s);
                    xml.push_str(&format!(r#"<c r="{cell_ref}" t="s"><v>{idx}</v></c>"#));
                }
                SheetValue::Empty => {}
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");

    (xml, shared)
}

fn shared_strings_xml(strings: &[String]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
        strings.len()
    );
    for s in strings {
        xml.push_str(&format!(
            r#"<si><t xml:space="preserve">{}</t></si>"#,
            escape_xml(s)
        ));
    }
    xml.push_str("</sst>");
    xml
}

/// Write a fixture as a single-sheet `.xlsx` workbook.
pub fn write_xlsx(path: &Path, fixture: &SheetFixture) -> io::Result<()> {
    let (sheet_xml, shared) = sheet_parts(fixture);
    let parts: [(&str, String); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("xl/workbook.xml", WORKBOOK.to_string()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
        ("xl/sharedStrings.xml", shared_strings_xml(&shared)),
        ("xl/worksheets/sheet1.xml", sheet_xml),
    ];

    let mut zip = ZipWriter::new(File::create(path)?);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, content) in parts {
        zip.start_file(name, options).map_err(to_io_error)?;
        zip.write_all(content.as_bytes())?;
    }
    zip.finish().map_err(to_io_error)?;
    Ok(())
}

/// Write a fixture as a comma-separated file.
pub fn write_csv(path: &Path, fixture: &SheetFixture) -> io::Result<()> {
    let mut out = String::new();
    let header: Vec<String> = fixture
        .headers
        .iter()
        .map(|h| SheetValue::Text(h.clone()).to_csv_field())
        .collect();
    out.push_str(&header.join(","));
    out.push('\n');
    for row in &fixture.rows {
        let fields: Vec<String> = row.iter().map(SheetValue::to_csv_field).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    std::fs::write(path, out)
}

/// A temporary directory holding one generated input file.
///
/// The directory is removed when this value is dropped.
pub struct TempSheet {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TempSheet {
    /// Write `fixture` as `tree_data.xlsx` in a fresh temporary directory.
    pub fn xlsx(fixture: &SheetFixture) -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("tree_data.xlsx");
        write_xlsx(&path, fixture)?;
        Ok(Self { dir, path })
    }

    /// Write `fixture` as `tree_data.csv` in a fresh temporary directory.
    pub fn csv(fixture: &SheetFixture) -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("tree_data.csv");
        write_csv(&path, fixture)?;
        Ok(Self { dir, path })
    }
}

/// Creates a list of (row, column, volume) placements with predictable values.
///
/// Cell (r, c) receives `r * 1000 + c` as its volume, cycling over a
/// `width × height` grid, which makes sums and means easy to check.
pub fn create_placements(width: u32, height: u32, count: usize) -> Vec<(u32, u32, f64)> {
    (0..count)
        .map(|i| {
            let i = i as u32;
            let row = (i / width) % height + 1;
            let column = i % width + 1;
            (row, column, f64::from(row * 1000 + column))
        })
        .collect()
}
