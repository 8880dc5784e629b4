//! Parser Module
//!
//! 入力ファイル（CSV / XLSX / XLS）を読み込み、表示用文字列のテーブルに変換する。
//! ExcelはcalamineとCellFormatter、CSVはcsvクレートとエンコーディング判定を使用します。

mod csv_reader;
mod encoding;
mod workbook;

use std::path::Path;

pub use encoding::CsvEncoding;
pub(crate) use workbook::WorkbookParser;

use crate::api::InputFormat;
use crate::error::ExcelToMdError;
use crate::formatter::CellFormatter;
use crate::security::SecurityConfig;
use crate::types::{LoadedTable, Table};

/// テーブルローダー
///
/// ファイルパス（と任意のシート名）からテーブルを読み込みます。
/// 型付きのセル値はこの境界で文字列に正規化され、外部には漏れません。
///
/// # 使用例
///
/// ```rust,no_run
/// use excel2md::TableLoader;
///
/// # fn main() -> Result<(), excel2md::ExcelToMdError> {
/// let loaded = TableLoader::new().load("book.xlsx", Some("Sheet2"))?;
/// println!("sheets: {:?}", loaded.sheet_names);
/// println!("rows: {}", loaded.table.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TableLoader {
    /// CSVのエンコーディング指定
    encoding: CsvEncoding,
    /// セキュリティ設定
    security: SecurityConfig,
    /// セルフォーマッター
    formatter: CellFormatter,
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TableLoader {
    /// デフォルト設定（エンコーディング自動判定）のローダーを生成
    pub fn new() -> Self {
        Self {
            encoding: CsvEncoding::Auto,
            security: SecurityConfig::default(),
            formatter: CellFormatter::new(),
        }
    }

    /// CSVのエンコーディングを指定
    pub fn with_encoding(mut self, encoding: CsvEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub(crate) fn with_security(mut self, security: SecurityConfig) -> Self {
        self.security = security;
        self
    }

    /// ファイルを読み込む
    ///
    /// # 引数
    ///
    /// * `path` - 入力ファイルのパス
    /// * `sheet` - シート名（Excelのみ有効。`None`の場合は最初のシート）
    ///
    /// # 戻り値
    ///
    /// * `Ok(LoadedTable)` - テーブルとシート名一覧（CSVの場合は空）
    ///
    /// # 発生し得るエラー
    ///
    /// * `FileNotFound` - パスが存在しない
    /// * `UnsupportedFormat` - 拡張子が対応していない
    /// * `SheetNotFound` - 指定したシートが存在しない
    /// * `MalformedFile` - パーサーが読み込めない
    pub fn load(
        &self,
        path: impl AsRef<Path>,
        sheet: Option<&str>,
    ) -> Result<LoadedTable, ExcelToMdError> {
        let path = path.as_ref();
        let format = self.check_input(path)?;

        if !format.is_workbook() {
            if let Some(sheet) = sheet {
                log::debug!("Ignoring sheet '{}' for CSV input {}", sheet, path.display());
            }
            return Ok(LoadedTable {
                table: csv_reader::read_csv(path, self.encoding)?,
                sheet_name: None,
                sheet_names: Vec::new(),
            });
        }

        let mut parser = WorkbookParser::open(path)?;
        let sheet_name = parser.resolve_sheet(sheet)?;
        log::debug!("Loading sheet '{}' from {}", sheet_name, path.display());
        let table = parser.read_sheet(&sheet_name, &self.formatter)?;

        Ok(LoadedTable {
            table,
            sheet_name: Some(sheet_name),
            sheet_names: parser.sheet_names(),
        })
    }

    /// ワークブックのシート名一覧を取得（CSVの場合は空）
    pub fn sheet_names(&self, path: impl AsRef<Path>) -> Result<Vec<String>, ExcelToMdError> {
        let path = path.as_ref();
        if !self.check_input(path)?.is_workbook() {
            return Ok(Vec::new());
        }
        Ok(WorkbookParser::open(path)?.sheet_names())
    }

    /// すべてのシートを読み込む（ワークブック順）
    ///
    /// CSVの場合は名前なしの1要素を返します。
    pub fn load_all(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Vec<(Option<String>, Table)>, ExcelToMdError> {
        let path = path.as_ref();
        let format = self.check_input(path)?;

        if !format.is_workbook() {
            return Ok(vec![(None, csv_reader::read_csv(path, self.encoding)?)]);
        }

        let mut parser = WorkbookParser::open(path)?;
        let mut sheets = Vec::new();
        for name in parser.sheet_names() {
            let table = parser.read_sheet(&name, &self.formatter)?;
            sheets.push((Some(name), table));
        }
        Ok(sheets)
    }

    /// 入力パスの存在・形式・サイズを検証
    fn check_input(&self, path: &Path) -> Result<InputFormat, ExcelToMdError> {
        if !path.exists() {
            return Err(ExcelToMdError::FileNotFound(path.to_path_buf()));
        }

        let format =
            InputFormat::from_path(path).ok_or_else(|| ExcelToMdError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: path
                    .extension()
                    .map(|ext| ext.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            })?;

        self.security.check_input_size(path)?;
        Ok(format)
    }
}
