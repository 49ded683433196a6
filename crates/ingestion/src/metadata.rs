//! Input file type detection.

use std::path::Path;

/// Detected file type based on extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Office Open XML workbook
    Xlsx,
    /// Comma-separated values
    Csv,
    /// Unknown format
    Unknown,
}

/// Detect file type from path.
pub fn detect_file_type(path: &Path) -> FileType {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match ext.as_deref() {
        Some("xlsx") | Some("xlsm") => FileType::Xlsx,
        Some("csv") => FileType::Csv,
        _ => FileType::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_file_type() {
        assert_eq!(detect_file_type(Path::new("tree_data.xlsx")), FileType::Xlsx);
        assert_eq!(detect_file_type(Path::new("/plots/A.XLSX")), FileType::Xlsx);
        assert_eq!(detect_file_type(Path::new("survey.xlsm")), FileType::Xlsx);
        assert_eq!(detect_file_type(Path::new("survey.csv")), FileType::Csv);
        assert_eq!(detect_file_type(Path::new("survey.xls")), FileType::Unknown);
        assert_eq!(detect_file_type(Path::new("survey")), FileType::Unknown);
    }
}
