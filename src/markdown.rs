//! Markdown Module
//!
//! テーブルをGitHub Flavored Markdownのテーブル記法に変換するモジュール。
//! I/Oを持たない純粋な変換で、同じ入力に対して常に同じ文字列を返します。

use crate::grid::{format_line, separator_line, LogicalGrid};
use crate::types::Table;

/// Markdownレンダラー
///
/// # 出力形式
///
/// - ヘッダーあり: 先頭行がヘッダー行、続いて区切り行、残りの行がデータ行
/// - ヘッダーなし: 空セルのヘッダー行と区切り行の後に、すべての行をデータ行として出力
/// - 空テーブル（または先頭行が0列）: 空文字列
///
/// 行は`\n`で連結され、末尾に改行は付きません。
///
/// # 使用例
///
/// ```rust
/// use excel2md::{MarkdownRenderer, Table};
///
/// let table = Table::from_rows([["Name", "Age"], ["John", "30"]]);
/// let markdown = MarkdownRenderer::new().render(&table, true);
/// assert_eq!(markdown, "| Name | Age |\n| --- | --- |\n| John | 30 |");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkdownRenderer {
    /// 列幅を表示幅で揃えるか
    aligned: bool,
}

impl MarkdownRenderer {
    /// デフォルト設定（整列なし）のレンダラーを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// 列幅の整列を有効化
    ///
    /// 有効な場合、各セルを列の最大表示幅（最小3）まで空白で埋め、
    /// 区切り行のハイフン数も列幅に合わせます。
    pub fn aligned(mut self, aligned: bool) -> Self {
        self.aligned = aligned;
        self
    }

    /// 整列が有効かどうか
    pub fn is_aligned(&self) -> bool {
        self.aligned
    }

    /// テーブルをMarkdownに変換
    ///
    /// # 引数
    ///
    /// * `table` - 表示用文字列のテーブル
    /// * `include_header` - 先頭行をヘッダーとして扱うか
    ///
    /// # 戻り値
    ///
    /// Markdownテーブル文字列
    pub fn render(&self, table: &Table, include_header: bool) -> String {
        let grid = LogicalGrid::build(table);
        let cols = grid.get_cols();
        if cols == 0 {
            return String::new();
        }

        let widths = self.aligned.then(|| grid.column_widths());
        let widths = widths.as_deref();

        let mut lines = Vec::with_capacity(grid.get_rows() + 2);
        let data_start = if include_header {
            lines.push(format_line(grid.get_row(0), widths));
            1
        } else {
            lines.push(format_line(&vec![""; cols][..], widths));
            0
        };
        lines.push(separator_line(cols, widths));

        for row in grid.iter_rows().skip(data_start) {
            lines.push(format_line(row, widths));
        }

        lines.join("\n")
    }

    /// 複数シートを1つのMarkdown文書に変換
    ///
    /// 各シートを `## Sheet: <name>` 見出し + 空行 + テーブルとして出力し、
    /// シート間は空行で区切ります。
    pub fn render_sheets<'a, I>(&self, sheets: I, include_header: bool) -> String
    where
        I: IntoIterator<Item = (&'a str, &'a Table)>,
    {
        sheets
            .into_iter()
            .map(|(name, table)| {
                format!("## Sheet: {}\n\n{}", name, self.render(table, include_header))
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
