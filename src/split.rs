//! 按空白和标点切分文本。
//!
//! 切分规则固定为 `([,.:;?_!"()']|--|\s)`：标点和 `--` 作为独立的词保留，空白只作为分隔符丢弃。

use regex::Regex;
use std::sync::LazyLock;

/// 作为独立词输出的单字符标点。
pub const PUNCTUATION: [char; 11] = [',', '.', ':', ';', '?', '_', '!', '"', '(', ')', '\''];

/// 作为单个词输出的双连字符。
pub const DOUBLE_HYPHEN: &str = "--";

static DELIMITER: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"{}|{}|\s",
        punctuation_class(),
        regex::escape(DOUBLE_HYPHEN)
    );
    Regex::new(&pattern).unwrap()
});

/// 匹配任一单字符标点的字符类，如 `[,\.:...]`。
pub(crate) fn punctuation_class() -> String {
    let mut class = String::from("[");
    for c in PUNCTUATION {
        class.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
    }
    class.push(']');
    class
}

/// 切分文本，返回按原文顺序排列的词。
#[inline]
pub fn split(text: &str) -> Vec<&str> {
    pieces(text).collect()
}

/// 惰性地切分文本。
pub fn pieces(text: &str) -> Pieces<'_> {
    Pieces {
        text,
        matches: DELIMITER.find_iter(text),
        start: 0,
        pending: None,
    }
}

/// 切分文本产生的词迭代器，不产生空词，每个词都去除了两端空白。
pub struct Pieces<'t> {
    text: &'t str,
    matches: regex::Matches<'static, 't>,
    /// 下一个分隔符之前片段的起点
    start: usize,
    /// 已经匹配但尚未输出的分隔符
    pending: Option<&'t str>,
}

impl<'t> Iterator for Pieces<'t> {
    type Item = &'t str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // 先输出分隔符之前的片段，再输出分隔符本身
            if let Some(delimiter) = self.pending.take() {
                if let Some(piece) = non_blank(delimiter) {
                    return Some(piece);
                }
                continue;
            }
            match self.matches.next() {
                Some(m) => {
                    let head = &self.text[self.start..m.start()];
                    self.start = m.end();
                    self.pending = Some(m.as_str());
                    if let Some(piece) = non_blank(head) {
                        return Some(piece);
                    }
                }
                None => {
                    let tail = &self.text[self.start..];
                    self.start = self.text.len();
                    return non_blank(tail);
                }
            }
        }
    }
}

#[inline]
fn non_blank(piece: &str) -> Option<&str> {
    match piece.trim() {
        "" => None,
        piece => Some(piece),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_hyphen() {
        assert_eq!(
            split("Hi--there, friend."),
            ["Hi", "--", "there", ",", "friend", "."]
        );
    }

    #[test]
    fn test_every_punctuation_is_a_token() {
        for c in PUNCTUATION {
            let text = format!("a{c}b");
            assert_eq!(split(&text), ["a", &*c.to_string(), "b"]);
        }
        assert_eq!(split(&format!("a{DOUBLE_HYPHEN}b")), ["a", DOUBLE_HYPHEN, "b"]);
    }

    #[test]
    fn test_empty() {
        assert!(split("").is_empty());
        assert!(split(" \t\r\n ").is_empty());
    }

    #[test]
    fn test_consecutive_delimiters() {
        assert_eq!(split("\"Yes!\"  --  (no)"), [
            "\"", "Yes", "!", "\"", "--", "(", "no", ")"
        ]);
        assert_eq!(split("'"), ["'"]);
    }

    #[test]
    fn test_single_hyphen_and_unicode() {
        assert_eq!(split("well-known café\tnaïve"), ["well-known", "café", "naïve"]);
        // 三个连字符：先匹配 `--`，剩下的单个 `-` 成为普通词
        assert_eq!(split("a---b"), ["a", "--", "-b"]);
    }

    #[test]
    fn test_sentence() {
        let text = "It's the last he painted, you know,\" Mrs. Gisburn said with pardonable pride.";
        assert_eq!(
            split(text),
            [
                "It", "'", "s", "the", "last", "he", "painted", ",", "you", "know", ",", "\"",
                "Mrs", ".", "Gisburn", "said", "with", "pardonable", "pride", "."
            ]
        );
    }

    #[test]
    fn test_lazy_matches_eager() {
        let text = "I HAD always thought Jack Gisburn rather a cheap genius--though a good fellow enough--so it was no great surprise to me to hear that, in the height of his glory, he had dropped his painting.";
        assert_eq!(pieces(text).count(), split(text).len());
        assert!(pieces(text).all(|p| !p.is_empty() && p.trim() == p));
    }
}
