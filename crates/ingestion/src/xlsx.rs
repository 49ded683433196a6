//! Reader for the first worksheet of an `.xlsx` workbook.
//!
//! Only cell values are read: styles, formulas and number formats are
//! ignored. The sheet path is resolved through the workbook relationships
//! and falls back to `xl/worksheets/sheet1.xml`.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::{IngestionError, Result};
use crate::table::{CellValue, Table};

const WORKBOOK_PATH: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PATH: &str = "xl/_rels/workbook.xml.rels";
const DEFAULT_SHEET_PATH: &str = "xl/worksheets/sheet1.xml";
const DEFAULT_SHARED_STRINGS_PATH: &str = "xl/sharedStrings.xml";

/// Parse xlsx bytes into a [`Table`].
pub(crate) fn parse_xlsx(data: &[u8]) -> Result<Table> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let rels = read_part(&mut archive, WORKBOOK_RELS_PATH)?
        .map(|xml| parse_relationships(&xml))
        .transpose()?
        .unwrap_or_default();

    let sheet_path = match read_part(&mut archive, WORKBOOK_PATH)? {
        Some(xml) => first_sheet_rel_id(&xml)?
            .and_then(|id| rels.iter().find(|r| r.id == id))
            .map(|r| resolve_target(&r.target))
            .unwrap_or_else(|| DEFAULT_SHEET_PATH.to_string()),
        None => DEFAULT_SHEET_PATH.to_string(),
    };

    let shared_strings_path = rels
        .iter()
        .find(|r| r.rel_type.ends_with("/sharedStrings"))
        .map(|r| resolve_target(&r.target))
        .unwrap_or_else(|| DEFAULT_SHARED_STRINGS_PATH.to_string());

    let shared_strings = match read_part(&mut archive, &shared_strings_path)? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };

    let sheet_xml = read_part(&mut archive, &sheet_path)?
        .ok_or_else(|| IngestionError::Xlsx(format!("worksheet '{}' is missing", sheet_path)))?;

    let cells = parse_sheet_cells(&sheet_xml, &shared_strings)?;
    let table = build_table(cells)?;

    tracing::debug!(
        sheet = %sheet_path,
        shared_strings = shared_strings.len(),
        columns = table.headers().len(),
        rows = table.len(),
        "Parsed xlsx worksheet"
    );

    Ok(table)
}

/// Read an archive member as UTF-8 text, `None` if it does not exist.
fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<Option<String>> {
    let mut file = match archive.by_name(path) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut xml = String::new();
    file.read_to_string(&mut xml)?;
    Ok(Some(xml))
}

/// Workbook relationship targets are relative to `xl/` unless absolute.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}

/// Value of the attribute with this local name (namespace prefix ignored).
fn attr_value(e: &BytesStart<'_>, local: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| IngestionError::Xlsx(format!("bad attribute: {}", err)))?;
        if attr.key.local_name().as_ref() == local {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

#[derive(Debug)]
struct Relationship {
    id: String,
    rel_type: String,
    target: String,
}

fn parse_relationships(xml: &str) -> Result<Vec<Relationship>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut rels = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e)
                if e.local_name().as_ref() == b"Relationship" =>
            {
                rels.push(Relationship {
                    id: attr_value(e, b"Id")?.unwrap_or_default(),
                    rel_type: attr_value(e, b"Type")?.unwrap_or_default(),
                    target: attr_value(e, b"Target")?.unwrap_or_default(),
                });
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(rels)
}

/// Relationship id (`r:id`) of the first `<sheet>` in the workbook.
fn first_sheet_rel_id(xml: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"sheet" => {
                return attr_value(e, b"id");
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Shared string table; rich-text runs are concatenated, phonetic hints skipped.
fn parse_shared_strings(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"rPh" => in_phonetic = true,
                b"t" if in_si && !in_phonetic => in_t = true,
                _ => {}
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Event::Text(ref e) if in_t => current.push_str(&e.unescape()?),
            Event::CData(ref e) if in_t => {
                current.push_str(&String::from_utf8_lossy(e));
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(std::mem::take(&mut current));
                    in_si = false;
                }
                b"rPh" => in_phonetic = false,
                b"t" => in_t = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(strings)
}

/// Parse the 1-based (row, column) of a cell reference like `B12`.
///
/// Uses spreadsheet base-26 for the letters (`AA` is column 27).
fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for b in cell_ref.bytes() {
        match b {
            b'$' => continue,
            b'A'..=b'Z' | b'a'..=b'z' if !saw_row => {
                let upper = b.to_ascii_uppercase();
                col = col.checked_mul(26)?.checked_add(u32::from(upper - b'A') + 1)?;
                saw_col = true;
            }
            b'0'..=b'9' => {
                row = row.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
                saw_row = true;
            }
            _ => return None,
        }
    }

    (saw_col && saw_row && row > 0).then_some((row, col))
}

/// Raw cell under construction while its children are read.
#[derive(Default)]
struct PendingCell {
    cell_type: Option<String>,
    value: String,
    inline: String,
}

impl PendingCell {
    fn finish(self, shared_strings: &[String]) -> Result<CellValue> {
        let value = match self.cell_type.as_deref() {
            Some("s") => {
                let idx: usize = self.value.trim().parse().map_err(|_| {
                    IngestionError::Xlsx(format!("bad shared string index '{}'", self.value))
                })?;
                let s = shared_strings.get(idx).ok_or_else(|| {
                    IngestionError::Xlsx(format!("shared string {} out of range", idx))
                })?;
                CellValue::Text(s.clone())
            }
            Some("inlineStr") => CellValue::Text(self.inline),
            Some("b") => CellValue::Bool(self.value.trim() == "1"),
            Some("str") | Some("e") | Some("d") => CellValue::Text(self.value),
            _ => match self.value.trim() {
                "" => CellValue::Empty,
                v => v
                    .parse::<f64>()
                    .map(CellValue::Number)
                    .unwrap_or_else(|_| CellValue::Text(self.value.clone())),
            },
        };

        Ok(match value {
            CellValue::Text(ref s) if s.is_empty() => CellValue::Empty,
            other => other,
        })
    }
}

/// Read every non-empty cell keyed by 1-based (row, column).
fn parse_sheet_cells(
    xml: &str,
    shared_strings: &[String],
) -> Result<BTreeMap<u32, BTreeMap<u32, CellValue>>> {
    let mut reader = Reader::from_str(xml);
    let mut cells: BTreeMap<u32, BTreeMap<u32, CellValue>> = BTreeMap::new();

    let mut current_row: u32 = 0;
    let mut last_col: u32 = 0;
    let mut position: (u32, u32) = (0, 0);
    let mut pending: Option<PendingCell> = None;
    let mut in_value = false;
    let mut in_inline_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = attr_value(e, b"r")?
                        .and_then(|r| r.trim().parse().ok())
                        .unwrap_or(current_row + 1);
                    last_col = 0;
                }
                b"c" => {
                    position = cell_position(e, current_row, last_col)?;
                    last_col = position.1;
                    pending = Some(PendingCell {
                        cell_type: attr_value(e, b"t")?,
                        ..PendingCell::default()
                    });
                }
                b"v" => in_value = true,
                b"t" if pending.is_some() => in_inline_text = true,
                _ => {}
            },
            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = attr_value(e, b"r")?
                        .and_then(|r| r.trim().parse().ok())
                        .unwrap_or(current_row + 1);
                }
                b"c" => {
                    last_col = cell_position(e, current_row, last_col)?.1;
                }
                _ => {}
            },
            Event::Text(ref e) => {
                if let Some(cell) = pending.as_mut() {
                    if in_value {
                        cell.value.push_str(&e.unescape()?);
                    } else if in_inline_text {
                        cell.inline.push_str(&e.unescape()?);
                    }
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"v" => in_value = false,
                b"t" => in_inline_text = false,
                b"c" => {
                    if let Some(cell) = pending.take() {
                        let value = cell.finish(shared_strings)?;
                        if !value.is_empty() {
                            let (row, col) = position;
                            cells.entry(row).or_default().insert(col, value);
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(cells)
}

/// Position of a `<c>` element from its `r` attribute, or the next column.
fn cell_position(e: &BytesStart<'_>, current_row: u32, last_col: u32) -> Result<(u32, u32)> {
    match attr_value(e, b"r")? {
        Some(r) => parse_cell_ref(&r)
            .ok_or_else(|| IngestionError::Xlsx(format!("bad cell reference '{}'", r))),
        None => Ok((current_row.max(1), last_col + 1)),
    }
}

/// First populated row is the header; later rows are data.
fn build_table(cells: BTreeMap<u32, BTreeMap<u32, CellValue>>) -> Result<Table> {
    let mut rows = cells.into_values();
    let header_cells = rows.next().ok_or(IngestionError::EmptyTable)?;

    let width = header_cells.keys().next_back().copied().unwrap_or(0) as usize;
    let mut headers = vec![String::new(); width];
    for (col, value) in header_cells {
        if let Some(slot) = headers.get_mut(col as usize - 1) {
            *slot = value.to_string();
        }
    }

    let data = rows
        .map(|row| {
            let mut values = vec![CellValue::Empty; width];
            for (col, value) in row {
                if let Some(slot) = values.get_mut(col as usize - 1) {
                    *slot = value;
                }
            }
            values
        })
        .filter(|values| !values.iter().all(CellValue::is_empty))
        .collect();

    Ok(Table::new(headers, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1"), Some((1, 1)));
        assert_eq!(parse_cell_ref("E12"), Some((12, 5)));
        assert_eq!(parse_cell_ref("AA3"), Some((3, 27)));
        assert_eq!(parse_cell_ref("$B$2"), Some((2, 2)));
        assert_eq!(parse_cell_ref("A0"), None);
        assert_eq!(parse_cell_ref("12"), None);
        assert_eq!(parse_cell_ref("A1B"), None);
    }

    #[test]
    fn test_shared_strings_rich_text_and_phonetic() {
        let xml = r#"<sst><si><t>plain</t></si><si><r><t>ri</t></r><r><t>ch</t></r><rPh><t>x</t></rPh></si><si/><si><t>a &amp; b</t></si></sst>"#;
        let strings = parse_shared_strings(xml).unwrap();
        assert_eq!(strings, vec!["plain", "rich", "", "a & b"]);
    }

    #[test]
    fn test_relationships_and_first_sheet() {
        let rels = parse_relationships(
            r#"<Relationships><Relationship Id="rId3" Type="http://x/worksheet" Target="worksheets/data.xml"/><Relationship Id="rId9" Type="http://x/sharedStrings" Target="/xl/strings.xml"/></Relationships>"#,
        )
        .unwrap();
        assert_eq!(rels.len(), 2);
        assert_eq!(resolve_target(&rels[0].target), "xl/worksheets/data.xml");
        assert_eq!(resolve_target(&rels[1].target), "xl/strings.xml");

        let id = first_sheet_rel_id(
            r#"<workbook xmlns:r="urn:r"><sheets><sheet name="Trees" sheetId="1" r:id="rId3"/><sheet name="Other" sheetId="2" r:id="rId4"/></sheets></workbook>"#,
        )
        .unwrap();
        assert_eq!(id.as_deref(), Some("rId3"));
    }

    #[test]
    fn test_sheet_cells_and_types() {
        let xml = r#"<worksheet><sheetData>
            <row r="1"><c r="A1" t="s"><v>0</v></c><c r="C1" t="inlineStr"><is><t>label</t></is></c></row>
            <row r="2"><c r="A2"><v>12.5</v></c><c r="B2" t="b"><v>1</v></c><c r="C2" t="str"><v>B7</v></c></row>
            <row r="3"><c r="A3" s="1"/></row>
            <row r="4"><c><v>7</v></c><c t="e"><v>#DIV/0!</v></c></row>
        </sheetData></worksheet>"#;
        let shared = vec!["id".to_string()];
        let table = build_table(parse_sheet_cells(xml, &shared).unwrap()).unwrap();

        assert_eq!(table.headers(), &["id".to_string(), String::new(), "label".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 0), Some(&CellValue::Number(12.5)));
        assert_eq!(table.cell(0, 1), Some(&CellValue::Bool(true)));
        assert_eq!(table.cell(0, 2), Some(&CellValue::Text("B7".into())));
        assert_eq!(table.cell(1, 0), Some(&CellValue::Number(7.0)));
        assert_eq!(table.cell(1, 1), Some(&CellValue::Text("#DIV/0!".into())));
    }

    #[test]
    fn test_shared_string_out_of_range() {
        let xml = r#"<worksheet><sheetData><row r="1"><c r="A1" t="s"><v>4</v></c></row></sheetData></worksheet>"#;
        assert!(matches!(
            parse_sheet_cells(xml, &[]),
            Err(IngestionError::Xlsx(_))
        ));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(parse_xlsx(b"not a workbook"), Err(IngestionError::Xlsx(_))));
    }
}
