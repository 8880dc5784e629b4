//! Grid Module
//!
//! 不揃いな行のテーブルから矩形のグリッド構造への変換を提供するモジュール。
//! 列数は先頭行の列数に揃え、短い行は空セルでパディング、長い行は切り詰めます。

use unicode_width::UnicodeWidthStr;

use crate::types::Table;

/// 整列モードでの列の最小幅（区切り行の`---`）
const MIN_COLUMN_WIDTH: usize = 3;

/// セル内容をMarkdownテーブル用にエスケープ
///
/// - `|` は `\|` に置換
/// - `|` の直前にあるバックスラッシュは二重化（`\|` → `\\\|`）
/// - 改行（`\r\n`, `\r`, `\n`）は1つにつき空白1文字に置換
pub(crate) fn escape_cell(content: &str) -> String {
    let mut escaped = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let mut run = 1;
                while chars.peek() == Some(&'\\') {
                    chars.next();
                    run += 1;
                }
                if chars.peek() == Some(&'|') {
                    run *= 2;
                }
                escaped.extend(std::iter::repeat('\\').take(run));
            }
            '|' => escaped.push_str("\\|"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                escaped.push(' ');
            }
            '\n' => escaped.push(' '),
            _ => escaped.push(c),
        }
    }

    escaped
}

/// 論理的なグリッド構造
///
/// すべてのセルはエスケープ済みで、すべての行は同じ列数を持ちます。
pub(crate) struct LogicalGrid {
    /// グリッドデータ（行 × 列）
    cells: Vec<Vec<String>>,

    /// 列数
    cols: usize,
}

impl LogicalGrid {
    /// テーブルから矩形のグリッドを構築
    ///
    /// # 引数
    ///
    /// * `table` - 表示用文字列のテーブル
    ///
    /// # 戻り値
    ///
    /// 先頭行の列数に揃えたグリッド（空テーブルの場合は0行0列）
    pub fn build(table: &Table) -> Self {
        let cols = table.column_count();

        let cells = table
            .rows()
            .iter()
            .map(|row| {
                let mut cells: Vec<String> =
                    row.iter().take(cols).map(|c| escape_cell(c)).collect();
                cells.resize(cols, String::new());
                cells
            })
            .collect();

        Self { cells, cols }
    }

    /// 行数を取得
    pub fn get_rows(&self) -> usize {
        self.cells.len()
    }

    /// 列数を取得
    pub fn get_cols(&self) -> usize {
        self.cols
    }

    /// 指定された行を取得
    pub fn get_row(&self, row_idx: usize) -> &[String] {
        self.cells.get(row_idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 行のイテレータ
    pub fn iter_rows(&self) -> impl Iterator<Item = &[String]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// 列幅を計算
    ///
    /// 各列について、すべての行のセル内容の表示幅を計算し、列ごとの最大幅を返します。
    /// 全角文字（日本語など）は表示幅2として計算します。最小幅は3です。
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths = vec![MIN_COLUMN_WIDTH; self.cols];

        for row in &self.cells {
            for (col_idx, cell) in row.iter().enumerate() {
                widths[col_idx] = widths[col_idx].max(cell.width());
            }
        }

        widths
    }
}

/// 1行分のセルを `| a | b |` 形式に連結
///
/// `widths`が指定された場合、各セルを表示幅に合わせて右側を空白で埋めます。
pub(crate) fn format_line<S: AsRef<str>>(cells: &[S], widths: Option<&[usize]>) -> String {
    let parts: Vec<String> = cells
        .iter()
        .enumerate()
        .map(|(col_idx, cell)| {
            let cell = cell.as_ref();
            match widths.and_then(|w| w.get(col_idx)) {
                Some(&width) => {
                    let padding = width.saturating_sub(cell.width());
                    format!("{}{}", cell, " ".repeat(padding))
                }
                None => cell.to_string(),
            }
        })
        .collect();

    format!("| {} |", parts.join(" | "))
}

/// ヘッダー区切り行を生成
///
/// 整列モードでは各列幅分のハイフン、それ以外は `---` を列数分出力します。
pub(crate) fn separator_line(cols: usize, widths: Option<&[usize]>) -> String {
    let dashes: Vec<String> = (0..cols)
        .map(|col_idx| {
            let width = widths
                .and_then(|w| w.get(col_idx).copied())
                .unwrap_or(MIN_COLUMN_WIDTH);
            "-".repeat(width)
        })
        .collect();

    format!("| {} |", dashes.join(" | "))
}
