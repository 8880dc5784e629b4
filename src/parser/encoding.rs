//! CSV Encoding Detection
//!
//! CSVファイルのバイト列をUTF-8文字列にデコードするモジュール。
//! BOM、UTF-8の妥当性を確認した後、chardetngの統計的な推定でレガシーエンコーディングを判定します。

use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// CSVのエンコーディング指定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvEncoding {
    /// 自動判定（デフォルト）
    #[default]
    Auto,

    /// 明示的に指定されたエンコーディング
    Fixed(&'static Encoding),
}

impl CsvEncoding {
    /// WHATWGラベル（`utf-8`, `gbk`, `shift_jis` など）から生成
    ///
    /// 未知のラベルの場合は`None`を返します。
    pub fn from_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.trim().as_bytes()).map(CsvEncoding::Fixed)
    }
}

/// デコード結果
#[derive(Debug)]
pub(crate) struct Decoded<'a> {
    pub text: Cow<'a, str>,
    pub encoding: &'static Encoding,
}

/// バイト列をデコード
///
/// # 戻り値
///
/// * `Ok(Decoded)` - デコード済み文字列と採用したエンコーディング
/// * `Err(String)` - 明示指定のエンコーディングで不正なバイト列があった場合
pub(crate) fn decode(bytes: &[u8], encoding: CsvEncoding) -> Result<Decoded<'_>, String> {
    match encoding {
        CsvEncoding::Fixed(encoding) => {
            let (text, actual, had_errors) = encoding.decode(bytes);
            if had_errors {
                return Err(format!("invalid {} byte sequence", actual.name()));
            }
            Ok(Decoded {
                text,
                encoding: actual,
            })
        }
        CsvEncoding::Auto => Ok(detect(bytes)),
    }
}

fn detect(bytes: &[u8]) -> Decoded<'_> {
    // 1. BOM
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return Decoded { text, encoding };
    }

    // 2. UTF-8
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Decoded {
            text: Cow::Borrowed(text),
            encoding: encoding_rs::UTF_8,
        };
    }

    // 3. レガシーエンコーディング（GBK / Big5 / Shift_JIS / windows-1252 など）を推定
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, false);

    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        log::warn!(
            "Input is not valid {}; invalid byte sequences were replaced",
            encoding.name()
        );
    }
    Decoded { text, encoding }
}
