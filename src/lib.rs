//! excel2md - Excel/CSV to GitHub-flavored Markdown table converter
//!
//! This crate reads tabular data from `.xlsx`, `.xls` and `.csv` files and
//! renders it as GitHub-flavored Markdown tables, either one file at a time
//! or over a whole directory tree.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Convert the first sheet and also write it to report.md
//!     let markdown = excel2md::convert_excel_to_markdown(
//!         Path::new("report.xlsx"),
//!         Some(Path::new("report.md")),
//!         None,
//!     )?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use excel2md::{ConverterBuilder, SheetSelector};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_sheet_selector(SheetSelector::All) // one section per sheet
//!         .with_csv_encoding("gb18030")            // skip auto-detection
//!         .aligned_columns(true)                   // pad to display width
//!         .build()?;
//!
//!     let markdown = converter.convert_file("inventory.xlsx")?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Batch Conversion
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = excel2md::convert_directory(Path::new("data"), Some(Path::new("docs")), true)?;
//!     for result in &report.results {
//!         if let Some(error) = result.error() {
//!             eprintln!("{}: {}", result.path.display(), error);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

mod api;
mod batch;
mod builder;
mod cli;
mod error;
mod formatter;
mod grid;
mod markdown;
mod parser;
mod preview;
mod security;
mod types;

use std::path::Path;

// 公開API
pub use api::{InputFormat, SheetSelector};
pub use batch::{BatchJob, BatchReport, BatchWalker, FileOutcome, FileResult};
pub use builder::{Converter, ConverterBuilder};
pub use cli::{run, run_cli, Cli, ReportFormat};
pub use error::ExcelToMdError;
pub use markdown::MarkdownRenderer;
pub use parser::{CsvEncoding, TableLoader};
pub use preview::{DesktopCapabilities, PreviewController};
pub use types::{ConversionRequest, LoadedTable, Row, Table};

/// 1ファイルをMarkdownに変換
///
/// # 引数
///
/// * `input` - 入力ファイル（`.xlsx` / `.xls` / `.csv`）
/// * `output` - 出力ファイル（指定された場合は書き込みも行う）
/// * `sheet_name` - シート名（`None`の場合は最初のシート）
///
/// # 戻り値
///
/// * `Ok(String)` - 変換されたMarkdown文字列
/// * `Err(ExcelToMdError)` - 読み込み・書き込みに失敗した場合
pub fn convert_excel_to_markdown(
    input: &Path,
    output: Option<&Path>,
    sheet_name: Option<&str>,
) -> Result<String, ExcelToMdError> {
    let converter = Converter::default();
    let request = converter
        .request(input)
        .with_output(output.map(Path::to_path_buf))
        .with_sheet(sheet_name.map(str::to_string));
    converter.convert(&request)
}

/// ディレクトリ内のファイルをまとめて変換
///
/// `output_dir`が`None`の場合はファイルに書き込まず、各ファイルのMarkdownを
/// `FileOutcome::Rendered`として返します。1ファイルの失敗はバッチを中断しません。
///
/// # 発生し得るエラー
///
/// * `FileNotFound` - 入力ディレクトリが存在しない
/// * `Config` - 入力パスがディレクトリではない
pub fn convert_directory(
    input_dir: &Path,
    output_dir: Option<&Path>,
    recursive: bool,
) -> Result<BatchReport, ExcelToMdError> {
    let job = BatchJob::new(input_dir)
        .with_output_dir(output_dir.map(Path::to_path_buf))
        .recursive(recursive);
    BatchWalker::new(Converter::default()).run(&job)
}
