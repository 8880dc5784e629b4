//! Preview Module
//!
//! デスクトップGUI向けのプレビューコントローラーを提供するモジュール。
//! 読み込んだファイル、シート一覧、選択中のシートなどの状態をコントローラーが保持し、
//! ファイル選択やクリップボードなどのOS依存の操作は`DesktopCapabilities`経由で行います。

use std::path::{Path, PathBuf};

use crate::builder::{write_markdown, Converter};
use crate::error::ExcelToMdError;
use crate::types::Table;

/// OS依存の操作（ファイルダイアログ、クリップボード）
pub trait DesktopCapabilities {
    /// 入力ファイルを選択させる（キャンセル時は`None`）
    fn pick_file(&mut self) -> Option<PathBuf>;

    /// テキストをクリップボードに書き込む
    fn write_clipboard(&mut self, text: &str) -> Result<(), ExcelToMdError>;
}

/// プレビューコントローラー
///
/// GUIの1ウィンドウ分の状態を保持します。シート未選択（`None`）は「すべてのシート」を意味し、
/// プレビューには最初のシートを、保存時にはすべてのシートを使用します。
///
/// # 使用例
///
/// ```rust,no_run
/// use std::path::PathBuf;
/// use excel2md::{Converter, DesktopCapabilities, ExcelToMdError, PreviewController};
///
/// struct NoDesktop;
///
/// impl DesktopCapabilities for NoDesktop {
///     fn pick_file(&mut self) -> Option<PathBuf> {
///         Some(PathBuf::from("book.xlsx"))
///     }
///     fn write_clipboard(&mut self, _text: &str) -> Result<(), ExcelToMdError> {
///         Ok(())
///     }
/// }
///
/// # fn main() -> Result<(), ExcelToMdError> {
/// let mut controller = PreviewController::new(Converter::default(), NoDesktop);
/// if controller.browse_input()? {
///     println!("{}", controller.preview());
///     controller.save()?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PreviewController<C: DesktopCapabilities> {
    converter: Converter,
    desktop: C,

    /// 入力ファイル
    input: Option<PathBuf>,

    /// 出力ファイル（既定は入力ファイルの拡張子を`.md`にしたもの）
    output: Option<PathBuf>,

    /// ワークブックのシート名（CSVの場合は空）
    sheet_names: Vec<String>,

    /// 選択中のシート（`None`はすべてのシート）
    current_sheet: Option<String>,

    /// 先頭行をヘッダーとして扱うか
    include_header: bool,

    /// プレビュー用に読み込んだテーブル
    table: Option<Table>,
}

impl<C: DesktopCapabilities> PreviewController<C> {
    pub fn new(converter: Converter, desktop: C) -> Self {
        let include_header = converter.includes_header();
        Self {
            converter,
            desktop,
            input: None,
            output: None,
            sheet_names: Vec::new(),
            current_sheet: None,
            include_header,
            table: None,
        }
    }

    /// ファイルダイアログで入力ファイルを選択して開く
    ///
    /// # 戻り値
    ///
    /// * `Ok(true)` - ファイルを開いた場合
    /// * `Ok(false)` - 選択がキャンセルされた場合
    pub fn browse_input(&mut self) -> Result<bool, ExcelToMdError> {
        match self.desktop.pick_file() {
            Some(path) => {
                self.open(path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 入力ファイルを開く
    ///
    /// シート一覧を取得し、最初のシートをプレビュー用に読み込みます。
    /// 失敗した場合、コントローラーの状態は変更されません。
    pub fn open(&mut self, path: impl Into<PathBuf>) -> Result<(), ExcelToMdError> {
        let path = path.into();
        let loaded = self.converter.loader().load(&path, None)?;

        self.output = Some(path.with_extension("md"));
        self.input = Some(path);
        self.sheet_names = loaded.sheet_names;
        self.current_sheet = None;
        self.table = Some(loaded.table);
        Ok(())
    }

    /// シートを選択（`None`はすべてのシート）
    pub fn select_sheet(&mut self, sheet: Option<&str>) -> Result<(), ExcelToMdError> {
        let input = self.require_input()?;
        let loaded = self.converter.loader().load(input, sheet)?;

        self.current_sheet = sheet.map(str::to_string);
        self.table = Some(loaded.table);
        Ok(())
    }

    /// 先頭行をヘッダーとして扱うかを設定
    pub fn set_include_header(&mut self, include: bool) {
        self.include_header = include;
    }

    /// 出力ファイルを変更
    pub fn set_output(&mut self, output: impl Into<PathBuf>) {
        self.output = Some(output.into());
    }

    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    /// 保存先として提案する出力ファイル
    pub fn suggested_output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    pub fn current_sheet(&self) -> Option<&str> {
        self.current_sheet.as_deref()
    }

    pub fn include_header(&self) -> bool {
        self.include_header
    }

    /// プレビュー用のMarkdown（ファイル未読み込みの場合は空文字列）
    pub fn preview(&self) -> String {
        self.table
            .as_ref()
            .map(|table| self.converter.render_table(table, self.include_header))
            .unwrap_or_default()
    }

    /// プレビューのMarkdownをクリップボードにコピー
    pub fn copy_to_clipboard(&mut self) -> Result<String, ExcelToMdError> {
        self.require_input()?;
        let markdown = self.preview();
        self.desktop.write_clipboard(&markdown)?;
        Ok(markdown)
    }

    /// 変換結果を出力ファイルに保存
    ///
    /// ワークブックでシート未選択の場合は、すべてのシートを見出し付きで保存します。
    ///
    /// # 戻り値
    ///
    /// * `Ok(PathBuf)` - 書き込んだ出力ファイル
    pub fn save(&self) -> Result<PathBuf, ExcelToMdError> {
        let input = self.require_input()?;
        let output = self
            .output
            .clone()
            .ok_or_else(|| ExcelToMdError::Config("No output file selected".to_string()))?;

        let markdown = if !self.sheet_names.is_empty() && self.current_sheet.is_none() {
            self.converter.render_all_sheets(input, self.include_header)?
        } else {
            self.preview()
        };

        write_markdown(&output, &markdown)?;
        log::info!("Saved {} -> {}", input.display(), output.display());
        Ok(output)
    }

    fn require_input(&self) -> Result<&Path, ExcelToMdError> {
        self.input
            .as_deref()
            .ok_or_else(|| ExcelToMdError::Config("No input file loaded".to_string()))
    }
}
