//! CLI Module
//!
//! コマンドラインインターフェースの実装。
//! 引数の解析はclap、エラーの文脈付けはanyhowで行います。
//! `src/bin/excel2md.rs`は`run_cli()`を呼び出すだけの薄いラッパーです。

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::api::{InputFormat, SheetSelector};
use crate::batch::{BatchJob, BatchReport, BatchWalker, FileOutcome};
use crate::builder::{Converter, ConverterBuilder};

/// バッチ結果の出力形式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripts and CI
    Json,
}

/// Convert Excel/CSV files to Markdown tables
///
/// INPUT is a single file, or a directory when --directory is used.
#[derive(Debug, Parser)]
#[command(name = "excel2md")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file (.xlsx, .xls, .csv) or directory
    pub input: PathBuf,

    /// Output Markdown file, or output directory with --directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Sheet name (Excel only, defaults to the first sheet)
    #[arg(short, long, conflicts_with = "all_sheets")]
    pub sheet: Option<String>,

    /// Convert every sheet of a workbook
    #[arg(long)]
    pub all_sheets: bool,

    /// Print the Markdown to stdout (single file only)
    #[arg(short, long)]
    pub preview: bool,

    /// Process all Excel/CSV files in the directory
    #[arg(short, long)]
    pub directory: bool,

    /// Recursively process subdirectories
    #[arg(short, long, requires = "directory")]
    pub recursive: bool,

    /// Encoding for CSV files (e.g. utf-8, gbk, gb18030, shift_jis)
    #[arg(short, long)]
    pub encoding: Option<String>,

    /// Treat the first row as data and emit a blank header
    #[arg(long)]
    pub no_header: bool,

    /// Pad columns to equal display width
    #[arg(long)]
    pub align: bool,

    /// Convert batch files on a thread pool
    #[arg(long, requires = "directory")]
    pub parallel: bool,

    /// Batch summary format
    #[arg(long, value_enum, default_value = "text")]
    pub report: ReportFormat,
}

impl Cli {
    /// 引数から`Converter`を構築
    pub fn converter(&self) -> Result<Converter> {
        let selector = if self.all_sheets {
            SheetSelector::All
        } else {
            SheetSelector::from_name(self.sheet.as_deref())
        };

        let mut builder = ConverterBuilder::new()
            .with_sheet_selector(selector)
            .include_header(!self.no_header)
            .aligned_columns(self.align);
        if let Some(label) = &self.encoding {
            builder = builder.with_csv_encoding(label.as_str());
        }

        builder.build().context("Invalid options")
    }
}

/// Run the CLI application
///
/// ログ出力は`RUST_LOG`で制御します（既定は`warn`）。
pub fn run_cli() -> Result<ExitCode> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    let cli = Cli::parse();
    run(&cli)
}

/// 解析済みの引数で変換を実行
///
/// # 戻り値
///
/// * `Ok(ExitCode::SUCCESS)` - すべての変換に成功した場合
/// * `Ok(ExitCode::FAILURE)` - バッチ内のいずれかのファイルが失敗した場合
/// * `Err` - 単一ファイルの変換に失敗した場合、または入力ディレクトリが不正な場合
pub fn run(cli: &Cli) -> Result<ExitCode> {
    let converter = cli.converter()?;

    if cli.directory {
        run_directory(cli, converter)
    } else {
        run_single(cli, &converter)
    }
}

fn run_single(cli: &Cli, converter: &Converter) -> Result<ExitCode> {
    // 出力先もプレビューも指定されていない場合はプレビュー
    let preview = cli.preview || cli.output.is_none();

    eprintln!("Converting: {}", cli.input.display());
    let request = converter
        .request(&cli.input)
        .with_output(cli.output.clone());
    let markdown = converter
        .convert(&request)
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    if preview {
        println!("{}", markdown);
    }
    if let Some(output) = &cli.output {
        eprintln!("Saved Markdown to {}", output.display());
    }

    Ok(ExitCode::SUCCESS)
}

fn run_directory(cli: &Cli, converter: Converter) -> Result<ExitCode> {
    // 出力先の指定がない場合は入力ファイルと同じ場所に書き込む（-pは無視）
    let output_dir = cli.output.clone().unwrap_or_else(|| cli.input.clone());
    if cli.preview {
        log::debug!("--preview is ignored in directory mode");
    }

    let job = BatchJob::new(&cli.input)
        .with_output_dir(Some(output_dir))
        .recursive(cli.recursive);
    let walker = BatchWalker::new(converter).with_parallel(cli.parallel);

    let requests = job
        .plan(walker.converter())
        .with_context(|| format!("Cannot process directory {}", cli.input.display()))?;

    let text = cli.report == ReportFormat::Text;
    if text {
        println!(
            "Processing directory {} (recursive={})",
            cli.input.display(),
            cli.recursive
        );
        if requests.is_empty() {
            println!("No Excel or CSV files found in '{}'", cli.input.display());
            return Ok(ExitCode::SUCCESS);
        }

        let inputs: Vec<&Path> = requests.iter().map(|r| r.input()).collect();
        print_file_list(&inputs);
    }

    let report = walker.execute(&requests);

    match cli.report {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize batch report to JSON")?;
            println!("{}", json);
        }
        ReportFormat::Text => print_report(&report),
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_file_list(inputs: &[&Path]) {
    let formats: Vec<Option<InputFormat>> =
        inputs.iter().map(|p| InputFormat::from_path(p)).collect();
    let excel_count = formats
        .iter()
        .filter(|f| f.map(InputFormat::is_workbook).unwrap_or(false))
        .count();
    let csv_count = formats.iter().filter(|f| **f == Some(InputFormat::Csv)).count();

    println!(
        "Found {} Excel files and {} CSV files.",
        excel_count, csv_count
    );
    println!("Files to convert:");
    for (i, (path, format)) in inputs.iter().zip(&formats).enumerate() {
        let label = format.map(InputFormat::label).unwrap_or("?");
        println!("  {}. [{}] {}", i + 1, label, path.display());
    }
}

fn print_report(report: &BatchReport) {
    for result in &report.results {
        match &result.outcome {
            FileOutcome::Written { output } => {
                println!("✓ {} -> {}", result.path.display(), output.display());
            }
            FileOutcome::Rendered { markdown } => {
                println!("✓ {}", result.path.display());
                println!("{}", markdown);
                println!();
            }
            FileOutcome::Failed { error } => {
                println!("✘ Failed to convert {}: {}", result.path.display(), error);
            }
        }
    }

    println!(
        "Successfully converted {} out of {} files",
        report.succeeded(),
        report.results.len()
    );
    if report.failed() > 0 {
        println!("Failed to convert {} files", report.failed());
    }
    if report.interrupted {
        println!("Interrupted before all files were converted");
    }
}
