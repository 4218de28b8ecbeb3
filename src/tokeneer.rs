use crate::{
    split::{pieces, punctuation_class},
    utok, Error, Method, Result, Vocab,
};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// 词级分词器，持有一个只读的词表。
///
/// 编码时按固定规则切分文本并逐词查表，解码时以空格连接各词，再删去单字符标点前的空白。
/// 词表外的词和词序号都会使操作整体失败，不产生部分结果。
pub struct Tokeneer<M = Vocab> {
    method: M,
}

impl<M: Method> Tokeneer<M> {
    /// 词表的双射性质由 [`Vocab`] 的构造过程保证，因此这里不会失败。
    pub fn new(method: M) -> Self {
        debug!("tokenizer ready with {} tokens", method.vocab_size());
        Self { method }
    }

    /// 文本 -> 词序号。遇到第一个词表外的词即失败。
    pub fn encode(&self, text: &str) -> Result<Vec<utok>> {
        pieces(text)
            .map(|piece| {
                self.method.find_piece(piece).ok_or_else(|| {
                    debug!("encode stopped at unknown token {piece:?}");
                    Error::UnknownToken(piece.to_string())
                })
            })
            .collect()
    }

    /// 词序号 -> 文本。遇到第一个词表外的词序号即失败。
    pub fn decode(&self, tokens: &[utok]) -> Result<String> {
        let mut ans = String::new();
        for &t in tokens {
            let piece = self.method.piece(t).ok_or_else(|| {
                let vocab_size = self.method.vocab_size();
                debug!("decode stopped at unknown id {t} (vocab size {vocab_size})");
                Error::UnknownId { id: t, vocab_size }
            })?;
            if !ans.is_empty() {
                ans.push(' ');
            }
            ans.push_str(piece);
        }
        Ok(collapse_punctuation(&ans))
    }

    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.method.vocab_size()
    }

    #[inline]
    pub fn internal(&self) -> &M {
        &self.method
    }
}

/// 删去单字符标点前的空白。`--` 不在此列，其前的空格会保留。
fn collapse_punctuation(text: &str) -> String {
    static SPACED_PUNCTUATION: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(&format!(r"\s+({})", punctuation_class())).unwrap());
    SPACED_PUNCTUATION.replace_all(text, "$1").into_owned()
}
