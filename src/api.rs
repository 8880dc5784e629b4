//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use std::path::Path;

/// シート選択方式
///
/// 変換対象のシートを選択する方法を指定します。CSV入力では無視されます。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum SheetSelector {
    /// ワークブック順で最初のシート（デフォルト）
    #[default]
    First,

    /// シート名指定
    ///
    /// 例: `SheetSelector::Name("Sheet2".to_string())`
    Name(String),

    /// すべてのシートを変換
    ///
    /// 各シートは `## Sheet: <name>` 見出しの下に出力され、
    /// シート間は空行で区切られます。
    All,
}

impl SheetSelector {
    /// `Option<&str>`からシート選択方式を生成（`None`は最初のシート）
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some(name) => SheetSelector::Name(name.to_string()),
            None => SheetSelector::First,
        }
    }
}

/// 入力ファイル形式
///
/// 拡張子（大文字小文字を区別しない）から判定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputFormat {
    /// カンマ区切りテキスト（`.csv`）
    Csv,
    /// Office Open XML ワークブック（`.xlsx`）
    Xlsx,
    /// Excel 97-2003 ワークブック（`.xls`）
    Xls,
}

impl InputFormat {
    /// 変換対象となる拡張子の一覧
    pub const EXTENSIONS: [&'static str; 3] = ["xlsx", "xls", "csv"];

    /// 拡張子から入力形式を判定
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(InputFormat::Csv),
            "xlsx" => Some(InputFormat::Xlsx),
            "xls" => Some(InputFormat::Xls),
            _ => None,
        }
    }

    /// パスの拡張子から入力形式を判定
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Excelワークブック（シートを持つ形式）かどうか
    pub fn is_workbook(self) -> bool {
        matches!(self, InputFormat::Xlsx | InputFormat::Xls)
    }

    /// 表示用のラベル（"Excel" / "CSV"）
    pub fn label(self) -> &'static str {
        if self.is_workbook() {
            "Excel"
        } else {
            "CSV"
        }
    }
}
