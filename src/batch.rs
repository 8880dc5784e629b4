//! Batch Module
//!
//! ディレクトリ内の変換対象ファイルを列挙し、1ファイルずつ変換するモジュール。
//! 1ファイルの失敗はそのファイルの結果として記録され、バッチ全体は中断しません。

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glob::Pattern;
use rayon::prelude::*;
use serde::Serialize;

use crate::api::InputFormat;
use crate::builder::Converter;
use crate::error::ExcelToMdError;
use crate::security::validate_relative_path;
use crate::types::ConversionRequest;

/// バッチ変換ジョブ
///
/// 入力ディレクトリ、出力ディレクトリ、再帰フラグの組です。
/// 出力ディレクトリが`None`の場合、結果はファイルに書き込まずメモリ上のMarkdownとして返します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    input_dir: PathBuf,
    output_dir: Option<PathBuf>,
    recursive: bool,
}

impl BatchJob {
    /// 入力ディレクトリを指定して生成（非再帰、出力なし）
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: None,
            recursive: false,
        }
    }

    /// 出力ディレクトリを指定
    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    /// サブディレクトリを再帰的に探索するか
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// 変換対象ファイルを列挙
    ///
    /// 拡張子が`.csv` / `.xlsx` / `.xls`（大文字小文字を区別しない）のファイルを、
    /// パスの辞書順で返します。
    ///
    /// # 発生し得るエラー
    ///
    /// * `FileNotFound` - 入力ディレクトリが存在しない
    /// * `Config` - 入力パスがディレクトリではない
    pub fn discover(&self) -> Result<Vec<PathBuf>, ExcelToMdError> {
        if !self.input_dir.exists() {
            return Err(ExcelToMdError::FileNotFound(self.input_dir.clone()));
        }
        if !self.input_dir.is_dir() {
            return Err(ExcelToMdError::Config(format!(
                "Not a directory: {}",
                self.input_dir.display()
            )));
        }

        let root = Pattern::escape(&self.input_dir.to_string_lossy());
        let pattern = if self.recursive {
            format!("{}/**/*", root)
        } else {
            format!("{}/*", root)
        };

        let entries = glob::glob(&pattern).map_err(|e| {
            ExcelToMdError::Config(format!("Invalid glob pattern {}: {}", pattern, e))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) => {
                    if path.is_file() && InputFormat::from_path(&path).is_some() {
                        files.push(path);
                    }
                }
                Err(e) => log::warn!("Skipping unreadable entry: {}", e),
            }
        }
        files.sort();

        log::debug!(
            "Discovered {} convertible files under {}",
            files.len(),
            self.input_dir.display()
        );
        Ok(files)
    }

    /// 入力ファイルに対応する出力パスを計算
    ///
    /// 入力ディレクトリからの相対パスを出力ディレクトリ配下にミラーリングし、
    /// 拡張子を`.md`に変更します。出力ディレクトリがない場合は`None`です。
    pub fn output_path_for(&self, input: &Path) -> Result<Option<PathBuf>, ExcelToMdError> {
        let Some(output_dir) = &self.output_dir else {
            return Ok(None);
        };

        let input_path = without_cur_dir(input);
        let root = without_cur_dir(&self.input_dir);
        let relative = input_path.strip_prefix(&root).map_err(|_| {
            ExcelToMdError::SecurityViolation(format!(
                "{} is outside of {}",
                input.display(),
                self.input_dir.display()
            ))
        })?;
        validate_relative_path(relative).map_err(ExcelToMdError::SecurityViolation)?;

        Ok(Some(output_dir.join(relative).with_extension("md")))
    }

    /// ジョブを変換要求のリストに展開
    ///
    /// ファイルの列挙は1回だけ行い、実行中に再走査はしません。
    pub fn plan(&self, converter: &Converter) -> Result<Vec<ConversionRequest>, ExcelToMdError> {
        let mut seen = HashSet::new();
        let mut requests = Vec::new();

        for input in self.discover()? {
            let output = self.output_path_for(&input)?;
            if let Some(output) = &output {
                if !seen.insert(output.clone()) {
                    log::warn!(
                        "{} maps to {}, which is already produced by another input",
                        input.display(),
                        output.display()
                    );
                }
            }
            requests.push(converter.request(&input).with_output(output));
        }

        Ok(requests)
    }
}

/// `.`コンポーネントを除去（globの結果は`./`を含まないため）
fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// 1ファイル分の変換結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// 出力ファイルに書き込んだ
    Written { output: PathBuf },

    /// 出力先なしで変換した（メモリ上のMarkdown）
    Rendered { markdown: String },

    /// 変換に失敗した
    Failed { error: String },
}

/// 1ファイル分の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileResult {
    /// 入力ファイルのパス
    pub path: PathBuf,

    /// 変換結果
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

impl FileResult {
    pub fn is_success(&self) -> bool {
        !matches!(self.outcome, FileOutcome::Failed { .. })
    }

    /// 失敗時のエラーメッセージ
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            FileOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// メモリ上に変換した場合のMarkdown
    pub fn markdown(&self) -> Option<&str> {
        match &self.outcome {
            FileOutcome::Rendered { markdown } => Some(markdown),
            _ => None,
        }
    }
}

/// バッチ全体の結果
///
/// 結果は列挙順（パスの辞書順）に並びます。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// ファイルごとの結果
    pub results: Vec<FileResult>,

    /// キャンセルにより途中で停止したか
    pub interrupted: bool,
}

impl BatchReport {
    /// 成功したファイル数
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// 失敗したファイル数
    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    /// すべてのファイルが成功し、中断もされなかったか
    pub fn is_success(&self) -> bool {
        !self.interrupted && self.failed() == 0
    }
}

/// バッチウォーカー
///
/// `BatchJob`を展開し、各ファイルを`Converter`で変換します。
///
/// # 使用例
///
/// ```rust,no_run
/// use excel2md::{BatchJob, BatchWalker, ConverterBuilder};
///
/// # fn main() -> Result<(), excel2md::ExcelToMdError> {
/// let walker = BatchWalker::new(ConverterBuilder::new().build()?);
/// let job = BatchJob::new("data")
///     .with_output_dir(Some("docs".into()))
///     .recursive(true);
/// let report = walker.run(&job)?;
/// println!("{} / {} converted", report.succeeded(), report.results.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BatchWalker {
    converter: Converter,
    parallel: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl BatchWalker {
    /// 逐次実行のウォーカーを生成
    pub fn new(converter: Converter) -> Self {
        Self {
            converter,
            parallel: false,
            cancel: None,
        }
    }

    /// rayonのスレッドプールで並列に変換するか
    ///
    /// 並列実行でも結果は列挙順に並びます。
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// キャンセルフラグを設定
    ///
    /// 各ファイルの変換開始前に確認し、`true`の場合は残りのファイルを処理せずに停止します。
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    /// ジョブを実行
    ///
    /// # 戻り値
    ///
    /// * `Ok(BatchReport)` - ファイルごとの結果（個々の失敗を含む）
    /// * `Err(ExcelToMdError)` - 入力ディレクトリ自体が不正な場合のみ
    pub fn run(&self, job: &BatchJob) -> Result<BatchReport, ExcelToMdError> {
        let requests = job.plan(&self.converter)?;
        Ok(self.execute(&requests))
    }

    /// 展開済みの変換要求を実行
    pub fn execute(&self, requests: &[ConversionRequest]) -> BatchReport {
        if self.parallel {
            let results: Vec<Option<FileResult>> = requests
                .par_iter()
                .map(|request| {
                    if self.is_cancelled() {
                        None
                    } else {
                        Some(self.process(request))
                    }
                })
                .collect();

            let interrupted = results.iter().any(Option::is_none);
            BatchReport {
                results: results.into_iter().flatten().collect(),
                interrupted,
            }
        } else {
            let mut report = BatchReport::default();
            for request in requests {
                if self.is_cancelled() {
                    report.interrupted = true;
                    break;
                }
                report.results.push(self.process(request));
            }
            report
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    fn process(&self, request: &ConversionRequest) -> FileResult {
        let outcome = match self.converter.convert(request) {
            Ok(markdown) => match request.output() {
                Some(output) => FileOutcome::Written {
                    output: output.to_path_buf(),
                },
                None => FileOutcome::Rendered { markdown },
            },
            Err(e) => {
                log::warn!("Failed to convert {}: {}", request.input().display(), e);
                FileOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        FileResult {
            path: request.input().to_path_buf(),
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_output_path_for_mirrors_relative_path() {
        let job = BatchJob::new("in").with_output_dir(Some(PathBuf::from("out")));

        assert_eq!(
            job.output_path_for(Path::new("in/sub/c.csv")).unwrap(),
            Some(PathBuf::from("out/sub/c.md"))
        );
        assert_eq!(
            job.output_path_for(Path::new("in/report.v2.xlsx")).unwrap(),
            Some(PathBuf::from("out/report.v2.md"))
        );
    }

    #[test]
    fn test_output_path_for_with_current_dir_root() {
        let job = BatchJob::new("./in").with_output_dir(Some(PathBuf::from("out")));
        assert_eq!(
            job.output_path_for(Path::new("in/a.csv")).unwrap(),
            Some(PathBuf::from("out/a.md"))
        );

        let job = BatchJob::new(".").with_output_dir(Some(PathBuf::from("out")));
        assert_eq!(
            job.output_path_for(Path::new("a.csv")).unwrap(),
            Some(PathBuf::from("out/a.md"))
        );
    }

    #[test]
    fn test_output_path_for_without_output_dir() {
        let job = BatchJob::new("in");
        assert_eq!(job.output_path_for(Path::new("in/a.csv")).unwrap(), None);
    }

    #[test]
    fn test_output_path_for_outside_root() {
        let job = BatchJob::new("in").with_output_dir(Some(PathBuf::from("out")));
        assert!(matches!(
            job.output_path_for(Path::new("elsewhere/a.csv")),
            Err(ExcelToMdError::SecurityViolation(_))
        ));
    }

    #[test]
    fn test_discover_missing_root() {
        let job = BatchJob::new("no/such/dir");
        assert!(matches!(
            job.discover(),
            Err(ExcelToMdError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_discover_root_is_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let job = BatchJob::new(file.path());
        assert!(matches!(job.discover(), Err(ExcelToMdError::Config(_))));
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.XLSX", "a.csv", "notes.txt", "c.xls"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("folder.csv")).unwrap();

        let files = BatchJob::new(dir.path()).discover().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.XLSX", "c.xls"]);
    }

    #[test]
    fn test_discover_escapes_glob_metacharacters() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("data[2024]");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("a.csv"), "x\n").unwrap();

        let files = BatchJob::new(&root).discover().unwrap();
        assert_eq!(files, vec![root.join("a.csv")]);
    }

    #[test]
    fn test_report_counts() {
        let report = BatchReport {
            results: vec![
                FileResult {
                    path: PathBuf::from("a.csv"),
                    outcome: FileOutcome::Rendered {
                        markdown: String::new(),
                    },
                },
                FileResult {
                    path: PathBuf::from("b.xlsx"),
                    outcome: FileOutcome::Failed {
                        error: "broken".to_string(),
                    },
                },
            ],
            interrupted: false,
        };

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
        assert_eq!(report.results[1].error(), Some("broken"));
        assert_eq!(report.results[0].markdown(), Some(""));
    }

    #[test]
    fn test_report_serializes_status_tag() {
        let result = FileResult {
            path: PathBuf::from("a.csv"),
            outcome: FileOutcome::Written {
                output: PathBuf::from("a.md"),
            },
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "written");
        assert_eq!(json["path"], "a.csv");
        assert_eq!(json["output"], "a.md");
    }

    #[test]
    fn test_cancelled_before_start() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "x\n1\n").unwrap();

        let cancel = Arc::new(AtomicBool::new(true));
        let walker = BatchWalker::new(Converter::default()).with_cancel_flag(cancel);
        let report = walker.run(&BatchJob::new(dir.path())).unwrap();

        assert!(report.interrupted);
        assert!(report.results.is_empty());
        assert!(!report.is_success());
    }
}
