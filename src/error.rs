use crate::utok;
use thiserror::Error;

/// 分词器的错误类型。所有错误都是终止性的，出错的操作不产生部分结果。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// 编码时遇到词表外的词
    #[error("unknown token: {0:?}")]
    UnknownToken(String),

    /// 解码时遇到词表外的词序号
    #[error("unknown token id {id} (vocab size {vocab_size})")]
    UnknownId { id: utok, vocab_size: usize },

    /// 提供的词表不是双射
    #[error("invalid vocabulary: {0}")]
    Configuration(String),

    /// 词表文本格式错误，行号从 1 开始
    #[error("malformed vocabulary at line {line}: {reason}")]
    Format { line: usize, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
