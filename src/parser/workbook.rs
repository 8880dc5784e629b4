//! Workbook Parser
//!
//! calamineを使用したExcelワークブック（`.xlsx` / `.xls`）の読み込み。

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Reader, Sheets};

use crate::error::ExcelToMdError;
use crate::formatter::CellFormatter;
use crate::types::Table;

/// ワークブックパーサー
///
/// calamineのラッパーとして、ワークブックレベルの操作を提供します。
/// 形式（XLSX/XLS）の判別はcalamineに委ねます。
pub(crate) struct WorkbookParser {
    /// calamineのワークブック
    workbook: Sheets<BufReader<File>>,
    /// エラーメッセージ用の入力パス
    path: PathBuf,
}

impl WorkbookParser {
    /// ワークブックを開く
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックの読み込みに成功した場合
    /// * `Err(ExcelToMdError::MalformedFile)` - calamineが読み込めない場合
    pub fn open(path: &Path) -> Result<Self, ExcelToMdError> {
        let workbook =
            open_workbook_auto(path).map_err(|e| ExcelToMdError::malformed(path, e))?;

        Ok(Self {
            workbook,
            path: path.to_path_buf(),
        })
    }

    /// すべてのシート名を取得（ワークブック順）
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// 読み込むシート名を決定
    ///
    /// # 引数
    ///
    /// * `sheet` - シート名（`None`の場合は最初のシート）
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - 読み込むシート名
    /// * `Err(ExcelToMdError::SheetNotFound)` - 指定したシートが存在しない場合
    /// * `Err(ExcelToMdError::MalformedFile)` - シートが1つもない場合
    pub fn resolve_sheet(&self, sheet: Option<&str>) -> Result<String, ExcelToMdError> {
        let names = self.sheet_names();

        match sheet {
            Some(name) => {
                if names.iter().any(|n| n == name) {
                    Ok(name.to_string())
                } else {
                    Err(ExcelToMdError::SheetNotFound {
                        sheet: name.to_string(),
                        available: names,
                    })
                }
            }
            None => names
                .into_iter()
                .next()
                .ok_or_else(|| ExcelToMdError::malformed(&self.path, "workbook has no sheets")),
        }
    }

    /// シートを読み込み、表示用文字列のテーブルに変換
    ///
    /// calamineの範囲は最初の非空セルから始まるため、先頭の空行・空列は含まれません。
    pub fn read_sheet(
        &mut self,
        sheet_name: &str,
        formatter: &CellFormatter,
    ) -> Result<Table, ExcelToMdError> {
        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|e| ExcelToMdError::malformed(&self.path, e))?;

        let rows = range.rows().map(|row| formatter.format_row(row)).collect();

        Ok(Table::new(rows))
    }
}

// 実際のワークブックが必要なため、テストは統合テスト（tests/）で実装します。
