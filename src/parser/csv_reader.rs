//! CSV Parser
//!
//! csvクレートを使用したCSVファイルの読み込み。セルのテキストは加工せずに保持します。

use std::path::Path;

use crate::error::ExcelToMdError;
use crate::parser::encoding::{self, CsvEncoding};
use crate::types::{Row, Table};

/// CSVファイルを読み込み、テーブルに変換
///
/// すべての行をデータとして読み込みます（ヘッダーの扱いはレンダラーが決定）。
/// 列数が不揃いな行もそのまま保持します。
pub(crate) fn read_csv(path: &Path, encoding: CsvEncoding) -> Result<Table, ExcelToMdError> {
    let bytes = std::fs::read(path)?;
    let decoded =
        encoding::decode(&bytes, encoding).map_err(|e| ExcelToMdError::malformed(path, e))?;

    log::debug!(
        "Detected encoding for {}: {}",
        path.display(),
        decoded.encoding.name()
    );

    parse_csv_text(&decoded.text).map_err(|e| ExcelToMdError::malformed(path, e))
}

/// デコード済みのCSVテキストを解析
pub(crate) fn parse_csv_text(text: &str) -> Result<Table, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut table = Table::default();
    for record in reader.records() {
        let record = record?;
        let row: Row = record.iter().map(str::to_string).collect();
        table.push_row(row);
    }

    Ok(table)
}
