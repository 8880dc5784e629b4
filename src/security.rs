//! Security Module
//!
//! 入力ファイルサイズの上限と、バッチ出力先パスの検証を提供するモジュール。

use std::path::{Component, Path};

use crate::error::ExcelToMdError;

/// セキュリティ設定
///
/// ファイル処理時のセキュリティ制限を定義します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 2GB (2_147_483_648 bytes)
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: 2_147_483_648, // 2GB
        }
    }
}

impl SecurityConfig {
    /// 入力ファイルのサイズを検証
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 上限以下の場合
    /// * `Err(ExcelToMdError::SecurityViolation)` - 上限を超える場合
    pub fn check_input_size(&self, path: &Path) -> Result<(), ExcelToMdError> {
        let size = std::fs::metadata(path)?.len();
        if size > self.max_input_file_size {
            return Err(ExcelToMdError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes): {}",
                size,
                self.max_input_file_size,
                path.display()
            )));
        }
        Ok(())
    }
}

/// 出力ルートからの相対パスの検証
///
/// ミラーリングした出力パスが出力ルートの外に出ないことを保証します。
///
/// # 戻り値
///
/// * `Ok(())` - パスが安全な場合
/// * `Err(String)` - パスが危険な場合（`..`や絶対パスを含む）
pub(crate) fn validate_relative_path(path: &Path) -> Result<(), String> {
    if path.as_os_str().is_empty() {
        return Err("Empty path is not allowed".to_string());
    }

    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(format!("Path traversal detected: {}", path.display()));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(format!("Absolute path is not allowed: {}", path.display()));
            }
        }
    }

    Ok(())
}
