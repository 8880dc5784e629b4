//! Formatter Module
//!
//! calamineが返すセル値を表示用の文字列に正規化するモジュール。
//! この境界より先では、セルは常に`String`として扱われます。

use calamine::{Data, ExcelDateTime};
use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

/// セルフォーマッター
///
/// セル値のフォーマット処理のファサードとして機能します。
#[derive(Debug, Default)]
pub(crate) struct CellFormatter {
    /// 日付フォーマッター
    date_formatter: DateFormatter,

    /// 数値フォーマッター
    number_formatter: NumberFormatter,
}

impl CellFormatter {
    /// 新しいCellFormatterインスタンスを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// セル値をフォーマット
    ///
    /// # 引数
    ///
    /// * `cell` - calamineのセルデータ
    ///
    /// # 戻り値
    ///
    /// 表示用文字列（空セルは空文字列）
    pub fn format_cell(&self, cell: &Data) -> String {
        match cell {
            Data::Empty => String::new(),
            Data::String(s) => s.clone(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => self.number_formatter.format(*f),
            Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Data::Error(e) => e.to_string(),
            Data::DateTime(dt) => self.date_formatter.format(dt),
            Data::DateTimeIso(s) => self.date_formatter.format_iso(s),
            Data::DurationIso(s) => s.clone(),
        }
    }

    /// 1行分のセルをフォーマット
    pub fn format_row(&self, row: &[Data]) -> Vec<String> {
        row.iter().map(|cell| self.format_cell(cell)).collect()
    }
}

/// 日付フォーマッター
///
/// Excelのシリアル日付値を文字列に変換します。
/// エポック（1900年/1904年システム）の判定はcalamineの`ExcelDateTime`に委ねます。
#[derive(Debug, Default)]
pub(crate) struct DateFormatter;

impl DateFormatter {
    /// 日付・期間セルをフォーマット
    ///
    /// - 時刻部分が0の日付: `YYYY-MM-DD`
    /// - 時刻を含む日付: `YYYY-MM-DD HH:MM:SS`
    /// - 期間: `H:MM:SS`
    ///
    /// 変換できない値（範囲外のシリアル値など）は数値としてフォーマットします。
    pub fn format(&self, value: &ExcelDateTime) -> String {
        if value.is_duration() {
            if let Some(duration) = value.as_duration() {
                return self.format_duration(duration);
            }
        } else if let Some(datetime) = value.as_datetime() {
            return self.format_datetime(datetime);
        }

        NumberFormatter.format(value.as_f64())
    }

    /// ISO 8601形式の日時文字列をフォーマット
    ///
    /// 解釈できない文字列はそのまま返します。
    pub fn format_iso(&self, value: &str) -> String {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
            return self.format_datetime(datetime);
        }
        match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) => date.format("%Y-%m-%d").to_string(),
            Err(_) => value.to_string(),
        }
    }

    pub fn format_datetime(&self, datetime: NaiveDateTime) -> String {
        // 秒未満は切り捨て
        if datetime.time().num_seconds_from_midnight() == 0 {
            datetime.format("%Y-%m-%d").to_string()
        } else {
            datetime.format("%Y-%m-%d %H:%M:%S").to_string()
        }
    }

    pub fn format_duration(&self, duration: Duration) -> String {
        let total = duration.num_seconds();
        let sign = if total < 0 { "-" } else { "" };
        let total = total.unsigned_abs();
        format!(
            "{}{}:{:02}:{:02}",
            sign,
            total / 3600,
            (total % 3600) / 60,
            total % 60
        )
    }
}

/// 数値フォーマッター
///
/// 整数値の浮動小数点数は`.0`なしで出力します。
#[derive(Debug, Default)]
pub(crate) struct NumberFormatter;

impl NumberFormatter {
    /// 整数として出力する上限（これを超える値は`f64`の既定表現を使う）
    const INTEGRAL_LIMIT: f64 = 1e15;

    pub fn format(&self, value: f64) -> String {
        if value == 0.0 {
            // -0.0も"0"にそろえる
            return "0".to_string();
        }

        if value.is_finite() && value.fract() == 0.0 && value.abs() < Self::INTEGRAL_LIMIT {
            format!("{:.0}", value)
        } else {
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn test_format_empty_and_string() {
        let formatter = CellFormatter::new();
        assert_eq!(formatter.format_cell(&Data::Empty), "");
        assert_eq!(
            formatter.format_cell(&Data::String("a|b".to_string())),
            "a|b"
        );
    }

    #[test]
    fn test_format_integral_float_without_trailing_zero() {
        let formatter = CellFormatter::new();
        assert_eq!(formatter.format_cell(&Data::Float(30.0)), "30");
        assert_eq!(formatter.format_cell(&Data::Float(-12.0)), "-12");
        assert_eq!(formatter.format_cell(&Data::Int(42)), "42");
    }

    #[test]
    fn test_format_fractional_float() {
        let formatter = CellFormatter::new();
        assert_eq!(formatter.format_cell(&Data::Float(3.25)), "3.25");
        assert_eq!(formatter.format_cell(&Data::Float(0.1)), "0.1");
    }

    #[test]
    fn test_format_negative_zero() {
        assert_eq!(NumberFormatter.format(-0.0), "0");
    }

    #[test]
    fn test_format_large_float_falls_back() {
        let formatter = NumberFormatter;
        assert_eq!(formatter.format(123_456_789_012.0), "123456789012");
        assert_eq!(formatter.format(1e20), 1e20f64.to_string());
        assert_eq!(formatter.format(f64::NAN), "NaN");
    }

    #[test]
    fn test_format_bool_and_error() {
        let formatter = CellFormatter::new();
        assert_eq!(formatter.format_cell(&Data::Bool(true)), "TRUE");
        assert_eq!(formatter.format_cell(&Data::Bool(false)), "FALSE");
        assert_eq!(
            formatter.format_cell(&Data::Error(CellErrorType::Div0)),
            "#DIV/0!"
        );
    }

    #[test]
    fn test_format_iso_datetime() {
        let formatter = CellFormatter::new();
        let iso = |s: &str| formatter.format_cell(&Data::DateTimeIso(s.to_string()));

        assert_eq!(iso("2025-01-15T10:00:00"), "2025-01-15 10:00:00");
        assert_eq!(iso("2025-01-15T10:00:00.250"), "2025-01-15 10:00:00");
        assert_eq!(iso("2025-01-15T00:00:00"), "2025-01-15");
        assert_eq!(iso("2025-01-15"), "2025-01-15");
        // 解釈できない文字列はそのまま
        assert_eq!(iso("10:30:00"), "10:30:00");
    }

    #[test]
    fn test_format_iso_duration_passes_through() {
        let formatter = CellFormatter::new();
        assert_eq!(
            formatter.format_cell(&Data::DurationIso("PT1H".to_string())),
            "PT1H"
        );
    }

    #[test]
    fn test_format_row() {
        let formatter = CellFormatter::new();
        let row = vec![Data::String("John".to_string()), Data::Float(30.0), Data::Empty];
        assert_eq!(formatter.format_row(&row), vec!["John", "30", ""]);
    }

    #[test]
    fn test_date_formatter_date_only() {
        let datetime = NaiveDate::from_ymd_opt(2025, 11, 20)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(DateFormatter.format_datetime(datetime), "2025-11-20");
    }

    #[test]
    fn test_date_formatter_with_time() {
        let datetime = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(13, 5, 9)
            .unwrap();
        assert_eq!(DateFormatter.format_datetime(datetime), "2025-01-02 13:05:09");
    }

    #[test]
    fn test_duration_formatter() {
        let formatter = DateFormatter;
        assert_eq!(formatter.format_duration(Duration::seconds(0)), "0:00:00");
        assert_eq!(formatter.format_duration(Duration::seconds(3_725)), "1:02:05");
        assert_eq!(formatter.format_duration(Duration::hours(36)), "36:00:00");
        assert_eq!(formatter.format_duration(Duration::seconds(-90)), "-0:01:30");
    }
}
