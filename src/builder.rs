//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。
//! `Converter`はTableLoaderとMarkdownRendererを組み合わせ、1ファイル分の変換を行います。

use std::fs;
use std::path::Path;

use crate::api::SheetSelector;
use crate::error::ExcelToMdError;
use crate::markdown::MarkdownRenderer;
use crate::parser::{CsvEncoding, TableLoader};
use crate::security::SecurityConfig;
use crate::types::{ConversionRequest, Table};

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConversionConfig {
    /// シート選択方式
    pub sheet_selector: SheetSelector,

    /// 先頭行をヘッダーとして扱うか
    pub include_header: bool,

    /// CSVエンコーディングのラベル（`None`の場合は自動判定）
    pub csv_encoding: Option<String>,

    /// 列幅を揃えるか
    pub aligned_columns: bool,

    /// 入力ファイルの最大サイズ（バイト）
    pub max_input_size: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            sheet_selector: SheetSelector::First,
            include_header: true,
            csv_encoding: None,
            aligned_columns: false,
            max_input_size: SecurityConfig::default().max_input_file_size,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Converter`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use excel2md::{ConverterBuilder, SheetSelector};
///
/// # fn main() -> Result<(), excel2md::ExcelToMdError> {
/// let converter = ConverterBuilder::new()
///     .with_sheet_selector(SheetSelector::All)
///     .with_csv_encoding("gbk")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - シート選択: 最初のシート
    /// - ヘッダー: 先頭行をヘッダーとして扱う
    /// - CSVエンコーディング: 自動判定
    /// - 列幅の整列: なし
    /// - 入力ファイルの最大サイズ: 2GB
    pub fn new() -> Self {
        Self::default()
    }

    /// 変換対象のシートを選択する
    ///
    /// `ConversionRequest`でシート名が指定された場合は、そちらが優先されます。
    ///
    /// ```rust,no_run
    /// use excel2md::{ConverterBuilder, SheetSelector};
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_sheet_selector(SheetSelector::Name("Sheet2".to_string()));
    /// ```
    pub fn with_sheet_selector(mut self, selector: SheetSelector) -> Self {
        self.config.sheet_selector = selector;
        self
    }

    /// 先頭行をヘッダーとして扱うかを指定する
    ///
    /// # 引数
    ///
    /// * `include: bool`:
    ///   * `true`: 先頭行をヘッダー行として出力（デフォルト）
    ///   * `false`: 空のヘッダー行を出力し、先頭行もデータ行として扱う
    pub fn include_header(mut self, include: bool) -> Self {
        self.config.include_header = include;
        self
    }

    /// CSVのエンコーディングをWHATWGラベルで指定する
    ///
    /// 未知のラベルは`build()`時に`ExcelToMdError::Config`になります。
    pub fn with_csv_encoding(mut self, label: impl Into<String>) -> Self {
        self.config.csv_encoding = Some(label.into());
        self
    }

    /// 列幅を表示幅で揃えるかを指定する
    pub fn aligned_columns(mut self, aligned: bool) -> Self {
        self.config.aligned_columns = aligned;
        self
    }

    /// 入力ファイルの最大サイズ（バイト）を指定する
    pub fn with_max_input_size(mut self, bytes: u64) -> Self {
        self.config.max_input_size = bytes;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Converter)`: 設定が有効な場合、Converterインスタンス
    /// * `Err(ExcelToMdError::Config)`: 設定が無効な場合
    ///
    /// # 発生し得るエラー
    ///
    /// * `ExcelToMdError::Config(String)`: 設定の検証に失敗した場合
    ///   * CSVエンコーディングのラベルが未知
    ///   * シート名が空文字列
    ///   * 入力ファイルの最大サイズが0
    pub fn build(self) -> Result<Converter, ExcelToMdError> {
        // 1. CSVエンコーディングの検証
        let encoding = match &self.config.csv_encoding {
            Some(label) => CsvEncoding::from_label(label).ok_or_else(|| {
                ExcelToMdError::Config(format!("Unknown CSV encoding label: '{}'", label))
            })?,
            None => CsvEncoding::Auto,
        };

        // 2. シート名の検証
        if let SheetSelector::Name(name) = &self.config.sheet_selector {
            if name.is_empty() {
                return Err(ExcelToMdError::Config(
                    "Sheet name must not be empty".to_string(),
                ));
            }
        }

        // 3. サイズ上限の検証
        if self.config.max_input_size == 0 {
            return Err(ExcelToMdError::Config(
                "Maximum input size must be greater than 0".to_string(),
            ));
        }

        let loader = TableLoader::new()
            .with_encoding(encoding)
            .with_security(SecurityConfig {
                max_input_file_size: self.config.max_input_size,
            });
        let renderer = MarkdownRenderer::new().aligned(self.config.aligned_columns);

        Ok(Converter {
            config: self.config,
            loader,
            renderer,
        })
    }
}

/// 変換処理のファサード
///
/// 1ファイルを読み込み、Markdownに変換し、必要に応じてファイルに書き込みます。
/// `ConverterBuilder`を使用して構築された設定に基づいて変換処理を実行します。
///
/// # 使用例
///
/// ```rust,no_run
/// use excel2md::ConverterBuilder;
///
/// # fn main() -> Result<(), excel2md::ExcelToMdError> {
/// let converter = ConverterBuilder::new().build()?;
/// let request = converter
///     .request("data.xlsx")
///     .with_sheet(Some("Sheet2".to_string()))
///     .with_output(Some("data.md".into()));
/// let markdown = converter.convert(&request)?;
/// println!("{}", markdown);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,

    /// テーブルローダー
    loader: TableLoader,

    /// Markdownレンダラー
    renderer: MarkdownRenderer,
}

impl Default for Converter {
    fn default() -> Self {
        let config = ConversionConfig::default();
        Self {
            renderer: MarkdownRenderer::new().aligned(config.aligned_columns),
            loader: TableLoader::new(),
            config,
        }
    }
}

impl Converter {
    /// 入力パスから変換要求を生成（ヘッダー設定はConverterの設定を引き継ぐ）
    pub fn request(&self, input: impl AsRef<Path>) -> ConversionRequest {
        ConversionRequest::new(input.as_ref()).include_header(self.config.include_header)
    }

    /// 変換要求を実行
    ///
    /// # 引数
    ///
    /// * `request` - 変換要求
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - 変換されたMarkdown文字列（出力先が指定された場合は書き込み済み）
    /// * `Err(ExcelToMdError)` - エラーが発生した場合
    ///
    /// # 処理フロー
    ///
    /// 1. シートの決定（要求のシート名 > `SheetSelector`）
    /// 2. テーブルの読み込み
    /// 3. Markdownへの変換
    /// 4. 出力先への書き込み（指定された場合）
    pub fn convert(&self, request: &ConversionRequest) -> Result<String, ExcelToMdError> {
        let input = request.input();
        let include_header = request.has_header();

        let markdown = match (request.sheet(), &self.config.sheet_selector) {
            (Some(sheet), _) => self.render_sheet(input, Some(sheet), include_header)?,
            (None, SheetSelector::Name(sheet)) => {
                self.render_sheet(input, Some(sheet.as_str()), include_header)?
            }
            (None, SheetSelector::All) => self.render_all_sheets(input, include_header)?,
            (None, _) => self.render_sheet(input, None, include_header)?,
        };

        if let Some(output) = request.output() {
            write_markdown(output, &markdown)?;
            log::info!("Wrote {} -> {}", input.display(), output.display());
        }

        Ok(markdown)
    }

    /// 入力ファイルを現在の設定で変換（書き込みなし）
    pub fn convert_file(&self, input: impl AsRef<Path>) -> Result<String, ExcelToMdError> {
        self.convert(&self.request(input))
    }

    /// テーブルを現在のレンダラー設定でMarkdownに変換
    pub fn render_table(&self, table: &Table, include_header: bool) -> String {
        self.renderer.render(table, include_header)
    }

    /// テーブルローダーを取得
    pub fn loader(&self) -> &TableLoader {
        &self.loader
    }

    /// Markdownレンダラーを取得
    pub fn renderer(&self) -> MarkdownRenderer {
        self.renderer
    }

    /// 先頭行をヘッダーとして扱う設定かどうか
    pub fn includes_header(&self) -> bool {
        self.config.include_header
    }

    /// 1シート（CSVの場合はファイル全体）を変換
    fn render_sheet(
        &self,
        input: &Path,
        sheet: Option<&str>,
        include_header: bool,
    ) -> Result<String, ExcelToMdError> {
        let loaded = self.loader.load(input, sheet)?;
        Ok(self.renderer.render(&loaded.table, include_header))
    }

    /// すべてのシートを変換
    ///
    /// ワークブックは `## Sheet: <name>` 見出し付きのセクションとして出力し、
    /// CSVは見出しなしのテーブル1つとして出力します。
    pub(crate) fn render_all_sheets(
        &self,
        input: &Path,
        include_header: bool,
    ) -> Result<String, ExcelToMdError> {
        let sheets = self.loader.load_all(input)?;

        let named: Vec<(&str, &Table)> = sheets
            .iter()
            .filter_map(|(name, table)| name.as_deref().map(|name| (name, table)))
            .collect();

        if named.is_empty() {
            let table = sheets.first().map(|(_, table)| table);
            return Ok(table
                .map(|table| self.renderer.render(table, include_header))
                .unwrap_or_default());
        }

        log::debug!("Rendering {} sheets from {}", named.len(), input.display());
        Ok(self.renderer.render_sheets(named, include_header))
    }
}

/// Markdownをファイルに書き込む（親ディレクトリは必要に応じて作成）
pub(crate) fn write_markdown(path: &Path, markdown: &str) -> Result<(), ExcelToMdError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, markdown)?;
    Ok(())
}
