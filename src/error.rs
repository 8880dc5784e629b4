//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::path::PathBuf;

use thiserror::Error;

/// excel2mdクレート全体で使用するエラー型
///
/// 入力ファイルの読み込み、解析、Markdown変換、出力書き込み中に発生する
/// すべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `FileNotFound`: 入力パスが存在しない
/// - `UnsupportedFormat`: 拡張子が `.csv` / `.xlsx` / `.xls` のいずれでもない
/// - `SheetNotFound`: 指定されたシートがワークブックに存在しない
/// - `MalformedFile`: 拡張子は対応しているが、パーサーが読み込めない
/// - `Io`: 出力書き込みなどのI/Oエラー
/// - `Config`: 設定の検証に失敗したエラー
/// - `SecurityViolation`: サイズ制限や出力先パスの制約に違反したエラー
///
/// # 使用例
///
/// ```rust,no_run
/// use excel2md::{ExcelToMdError, TableLoader};
///
/// match TableLoader::new().load("missing.csv", None) {
///     Err(ExcelToMdError::FileNotFound(path)) => {
///         println!("not found: {}", path.display());
///     }
///     _ => {}
/// }
/// ```
#[derive(Error, Debug)]
pub enum ExcelToMdError {
    /// 入力パスが存在しない
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// 対応していない拡張子
    #[error(
        "Unsupported file extension '{extension}' for {}. Only .xlsx, .xls, and .csv are supported",
        .path.display()
    )]
    UnsupportedFormat {
        /// 入力パス
        path: PathBuf,
        /// 検出された拡張子（拡張子なしの場合は空文字列）
        extension: String,
    },

    /// 指定されたシートがワークブックに存在しない
    ///
    /// `available`にはワークブック順のシート名一覧が格納されます。
    #[error("Sheet '{sheet}' not found (available: {})", .available.join(", "))]
    SheetNotFound {
        /// 要求されたシート名
        sheet: String,
        /// ワークブックに存在するシート名
        available: Vec<String>,
    },

    /// パーサーがファイルを読み込めない（破損ファイル、不正なエンコーディングなど）
    #[error("Failed to read {}: {message}", .path.display())]
    MalformedFile {
        /// 入力パス
        path: PathBuf,
        /// パーサー由来の詳細メッセージ
        message: String,
    },

    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時の検証や、バッチ処理の入力ディレクトリが
    /// 不正な場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use excel2md::{ConverterBuilder, ExcelToMdError};
    ///
    /// let result = ConverterBuilder::new()
    ///     .with_csv_encoding("no-such-encoding")
    ///     .build();
    ///
    /// match result {
    ///     Err(ExcelToMdError::Config(msg)) => println!("設定エラー: {}", msg),
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

impl ExcelToMdError {
    /// パーサー由来のエラーを`MalformedFile`に包む
    pub(crate) fn malformed(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ExcelToMdError::MalformedFile {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
