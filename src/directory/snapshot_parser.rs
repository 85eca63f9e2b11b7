// ==========================================
// Pipe Inspection QMS - Snapshot file parsers
// ==========================================
// Reads directory snapshot exports into raw row maps.
// Supports: Excel (.xlsx/.xls) / CSV (.csv)
// ==========================================

use crate::directory::error::{DirectoryError, DirectoryResult};
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// ==========================================
// RowParser Trait
// ==========================================
// Purpose: one snapshot file -> raw rows (HashMap<column, value>)
// Implementors: CsvSnapshotParser, ExcelSnapshotParser
pub trait RowParser: Send + Sync {
    fn parse_rows(&self, file_path: &Path) -> DirectoryResult<Vec<HashMap<String, String>>>;
}

// ==========================================
// CSV parser
// ==========================================
pub struct CsvSnapshotParser;

impl RowParser for CsvSnapshotParser {
    fn parse_rows(&self, file_path: &Path) -> DirectoryResult<Vec<HashMap<String, String>>> {
        let path = file_path;

        if !path.exists() {
            return Err(DirectoryError::FileNotFound(path.display().to_string()));
        }

        if let Some(ext) = path.extension() {
            if ext != "csv" {
                return Err(DirectoryError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // snapshot exports have ragged rows
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row_map = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // skip fully blank rows
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(row_map);
        }

        Ok(rows)
    }
}

// ==========================================
// Excel parser
// ==========================================
pub struct ExcelSnapshotParser;

impl RowParser for ExcelSnapshotParser {
    fn parse_rows(&self, file_path: &Path) -> DirectoryResult<Vec<HashMap<String, String>>> {
        let path = file_path;

        if !path.exists() {
            return Err(DirectoryError::FileNotFound(path.display().to_string()));
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if ext != "xlsx" && ext != "xls" {
            return Err(DirectoryError::UnsupportedFormat(ext.to_string()));
        }

        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e: calamine::XlsxError| DirectoryError::ExcelParseError(e.to_string()))?;

        // first worksheet carries the export
        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(DirectoryError::ExcelParseError(
                "workbook has no worksheets".to_string(),
            ));
        }

        let sheet_name = sheet_names[0].clone();
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| DirectoryError::ExcelParseError(e.to_string()))?;

        let mut sheet_rows = range.rows();
        let header_row = sheet_rows
            .next()
            .ok_or_else(|| DirectoryError::ExcelParseError("worksheet has no rows".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for data_row in sheet_rows {
            let mut row_map = HashMap::new();

            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    let value = cell.to_string().trim().to_string();
                    row_map.insert(header.clone(), value);
                }
            }

            // skip fully blank rows
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(row_map);
        }

        Ok(rows)
    }
}

// ==========================================
// Extension-dispatched parser
// ==========================================
pub struct SnapshotFileParser;

impl SnapshotFileParser {
    pub fn parse<P: AsRef<Path>>(
        &self,
        file_path: P,
    ) -> DirectoryResult<Vec<HashMap<String, String>>> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => {
                let parser = CsvSnapshotParser;
                parser.parse_rows(path)
            }
            "xlsx" | "xls" => {
                let parser = ExcelSnapshotParser;
                parser.parse_rows(path)
            }
            _ => Err(DirectoryError::UnsupportedFormat(ext)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_csv_parser_valid_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "ADPNumber,Title,Active").unwrap();
        writeln!(temp_file, "10021,Jordan Reyes,Yes").unwrap();
        writeln!(temp_file, "10044,Sam Okafor,No").unwrap();

        let parser = CsvSnapshotParser;
        let rows = parser.parse_rows(temp_file.path()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("ADPNumber"), Some(&"10021".to_string()));
        assert_eq!(rows[0].get("Title"), Some(&"Jordan Reyes".to_string()));
    }

    #[test]
    fn test_csv_parser_trims_headers_and_values() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, " ADPNumber , Title ").unwrap();
        writeln!(temp_file, " 10021 , Jordan Reyes ").unwrap();

        let parser = CsvSnapshotParser;
        let rows = parser.parse_rows(temp_file.path()).unwrap();

        assert_eq!(rows[0].get("ADPNumber"), Some(&"10021".to_string()));
        assert_eq!(rows[0].get("Title"), Some(&"Jordan Reyes".to_string()));
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let parser = CsvSnapshotParser;
        let result = parser.parse_rows(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(DirectoryError::FileNotFound(_))));
    }

    #[test]
    fn test_csv_parser_skip_blank_rows() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "ADPNumber,Title").unwrap();
        writeln!(temp_file, "10021,Jordan Reyes").unwrap();
        writeln!(temp_file, ",").unwrap();
        writeln!(temp_file, "10044,Sam Okafor").unwrap();

        let parser = CsvSnapshotParser;
        let rows = parser.parse_rows(temp_file.path()).unwrap();

        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_dispatch_rejects_unknown_extension() {
        let parser = SnapshotFileParser;
        let result = parser.parse("employees.txt");
        assert!(matches!(result, Err(DirectoryError::UnsupportedFormat(_))));
    }
}
