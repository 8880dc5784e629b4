//! Boundary Tests for excel2md
//!
//! Empty inputs, irregular rows, escaping and wide characters.

use std::fs;
use std::path::Path;

use excel2md::{convert_excel_to_markdown, ConverterBuilder, MarkdownRenderer, Table, TableLoader};
use rust_xlsxwriter::*;

// Helper module for generating boundary test fixtures
mod fixtures {
    use super::*;

    /// Generate a workbook with an empty sheet (no cells)
    pub fn generate_empty_sheet(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("EmptySheet")?;
        workbook.save(path)
    }

    /// Generate a sheet whose data starts at C3
    pub fn generate_offset_table(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(2, 2, "Key")?;
        worksheet.write_string(2, 3, "Value")?;
        worksheet.write_string(3, 2, "a")?;
        worksheet.write_number(3, 3, 1)?;
        workbook.save(path)
    }

    /// Generate cells containing pipes and line breaks
    pub fn generate_special_characters(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Expression")?;
        worksheet.write_string(0, 1, "Memo")?;
        worksheet.write_string(1, 0, "a|b||c")?;
        worksheet.write_string(1, 1, "first\nsecond")?;
        workbook.save(path)
    }

    /// Generate a row with a gap in the middle
    pub fn generate_sparse_row(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "A")?;
        worksheet.write_string(0, 1, "B")?;
        worksheet.write_string(0, 2, "C")?;
        worksheet.write_string(1, 0, "1")?;
        worksheet.write_string(1, 2, "3")?;
        workbook.save(path)
    }

    /// Generate a large table (1,000 rows x 5 columns)
    pub fn generate_large_table(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for col in 0..5u16 {
            worksheet.write_string(0, col, format!("Col{}", col))?;
        }
        for row in 1..=1000u32 {
            for col in 0..5u16 {
                worksheet.write_number(row, col, (row * 10 + col as u32) as f64)?;
            }
        }
        workbook.save(path)
    }
}

#[test]
fn test_empty_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.xlsx");
    fixtures::generate_empty_sheet(&path).unwrap();

    let loaded = TableLoader::new().load(&path, None).unwrap();
    assert!(loaded.table.is_empty());
    assert_eq!(loaded.sheet_names, vec!["EmptySheet"]);
    assert_eq!(convert_excel_to_markdown(&path, None, None).unwrap(), "");
}

#[test]
fn test_empty_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "").unwrap();

    assert_eq!(convert_excel_to_markdown(&path, None, None).unwrap(), "");
}

#[test]
fn test_offset_table_starts_at_first_cell() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("offset.xlsx");
    fixtures::generate_offset_table(&path).unwrap();

    assert_eq!(
        convert_excel_to_markdown(&path, None, None).unwrap(),
        "| Key | Value |\n| --- | --- |\n| a | 1 |"
    );
}

#[test]
fn test_special_characters_in_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("special.xlsx");
    fixtures::generate_special_characters(&path).unwrap();

    let markdown = convert_excel_to_markdown(&path, None, None).unwrap();
    assert_eq!(
        markdown,
        "| Expression | Memo |\n| --- | --- |\n| a\\|b\\|\\|c | first second |"
    );
}

#[test]
fn test_sparse_row_keeps_column_positions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sparse.xlsx");
    fixtures::generate_sparse_row(&path).unwrap();

    assert_eq!(
        convert_excel_to_markdown(&path, None, None).unwrap(),
        "| A | B | C |\n| --- | --- | --- |\n| 1 |  | 3 |"
    );
}

#[test]
fn test_irregular_csv_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("irregular.csv");
    fs::write(&path, "a,b,c\n1\n1,2,3,4,5\n").unwrap();

    assert_eq!(
        convert_excel_to_markdown(&path, None, None).unwrap(),
        "| a | b | c |\n| --- | --- | --- |\n| 1 |  |  |\n| 1 | 2 | 3 |"
    );
}

#[test]
fn test_csv_with_utf8_bom() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bom.csv");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice("名前,年齢\n太郎,20\n".as_bytes());
    fs::write(&path, bytes).unwrap();

    assert_eq!(
        convert_excel_to_markdown(&path, None, None).unwrap(),
        "| 名前 | 年齢 |\n| --- | --- |\n| 太郎 | 20 |"
    );
}

#[test]
fn test_header_only_without_header_flag() {
    let table = Table::from_rows([["only"]]);
    assert_eq!(
        MarkdownRenderer::new().render(&table, false),
        "|  |\n| --- |\n| only |"
    );
}

#[test]
fn test_aligned_wide_characters() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wide.csv");
    fs::write(&path, "商品,価格\nりんご,120\nバナナ,98\n").unwrap();

    let converter = ConverterBuilder::new().aligned_columns(true).build().unwrap();
    assert_eq!(
        converter.convert_file(&path).unwrap(),
        "| 商品   | 価格 |\n\
         | ------ | ---- |\n\
         | りんご | 120  |\n\
         | バナナ | 98   |"
    );
}

#[test]
fn test_large_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("large.xlsx");
    fixtures::generate_large_table(&path).unwrap();

    let markdown = convert_excel_to_markdown(&path, None, None).unwrap();
    let lines: Vec<&str> = markdown.lines().collect();

    assert_eq!(lines.len(), 1002);
    assert_eq!(lines[0], "| Col0 | Col1 | Col2 | Col3 | Col4 |");
    assert_eq!(lines[1001], "| 10000 | 10001 | 10002 | 10003 | 10004 |");
}
