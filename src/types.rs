//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。
//!
//! セル値はパーサー境界で文字列に正規化されるため、`Table`の各セルは
//! 常に表示用の`String`です。

use std::path::{Path, PathBuf};

/// 1行分のセル（表示用文字列）
pub type Row = Vec<String>;

/// 行の順序付きシーケンス
///
/// 行ごとの列数は揃っていなくても構いません。矩形化（パディング/切り詰め）は
/// `MarkdownRenderer`が描画時に行います。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    /// 行のリストからテーブルを生成
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// 任意の文字列型の二次元配列からテーブルを生成
    ///
    /// ```rust
    /// use excel2md::Table;
    ///
    /// let table = Table::from_rows([["Name", "Age"], ["John", "30"]]);
    /// assert_eq!(table.len(), 2);
    /// ```
    pub fn from_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// 行のスライス
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// 行数
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 行が1つもないかどうか
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 先頭行の列数（空テーブルの場合は0）
    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// 行を末尾に追加
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// 行のリストを取り出す
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl From<Vec<Row>> for Table {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

/// `TableLoader::load`の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTable {
    /// 読み込んだテーブル
    pub table: Table,

    /// 読み込んだシート名（CSVの場合は`None`）
    pub sheet_name: Option<String>,

    /// ワークブック順のシート名一覧（CSVの場合は空）
    pub sheet_names: Vec<String>,
}

/// 1ファイル分の変換要求
///
/// CLI/GUIの呼び出しごとに生成され、生成後は変更されません。
/// 各フィールドはビルダー形式のメソッドで設定します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    input: PathBuf,
    output: Option<PathBuf>,
    sheet: Option<String>,
    include_header: bool,
}

impl ConversionRequest {
    /// 入力パスのみを指定して生成（ヘッダーあり、出力先なし）
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            sheet: None,
            include_header: true,
        }
    }

    /// 出力先パスを指定
    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    /// シート名を指定（`None`の場合はConverterの`SheetSelector`に従う）
    pub fn with_sheet(mut self, sheet: Option<String>) -> Self {
        self.sheet = sheet;
        self
    }

    /// 先頭行をヘッダーとして扱うか
    pub fn include_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn sheet(&self) -> Option<&str> {
        self.sheet.as_deref()
    }

    pub fn has_header(&self) -> bool {
        self.include_header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_from_rows() {
        let table = Table::from_rows([["Name", "Age"], ["John", "30"]]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.rows()[1], vec!["John".to_string(), "30".to_string()]);
    }

    #[test]
    fn test_table_empty() {
        let table = Table::default();
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_table_column_count_uses_first_row() {
        let table = Table::new(vec![
            vec!["a".to_string()],
            vec!["b".to_string(), "c".to_string(), "d".to_string()],
        ]);
        assert_eq!(table.column_count(), 1);
    }

    #[test]
    fn test_table_push_row() {
        let mut table = Table::default();
        table.push_row(vec!["x".to_string()]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.into_rows(), vec![vec!["x".to_string()]]);
    }

    #[test]
    fn test_conversion_request_defaults() {
        let request = ConversionRequest::new("input.csv");
        assert_eq!(request.input(), Path::new("input.csv"));
        assert!(request.output().is_none());
        assert!(request.sheet().is_none());
        assert!(request.has_header());
    }

    #[test]
    fn test_conversion_request_builder_chaining() {
        let request = ConversionRequest::new("book.xlsx")
            .with_output(Some(PathBuf::from("out/book.md")))
            .with_sheet(Some("Sheet2".to_string()))
            .include_header(false);

        assert_eq!(request.output(), Some(Path::new("out/book.md")));
        assert_eq!(request.sheet(), Some("Sheet2"));
        assert!(!request.has_header());
    }
}
