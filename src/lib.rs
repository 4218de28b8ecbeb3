#![deny(warnings)]

mod error;
mod split;
mod tokeneer;
mod vocab;

pub use error::{Error, Result};
pub use split::{pieces, split, Pieces, DOUBLE_HYPHEN, PUNCTUATION};
pub use tokeneer::Tokeneer;
pub use vocab::{build_vocab, Vocab};

/// `utok` for token id.
#[allow(non_camel_case_types)]
pub type utok = u32;

/// 词与词序号之间的查找方法。
///
/// [`Tokeneer`] 负责切分文本和拼接解码结果，具体的查表由实现此 trait 的词表完成。
pub trait Method {
    fn vocab_size(&self) -> usize;
    /// piece -> token
    fn find_piece(&self, piece: &str) -> Option<utok>;
    /// token -> piece
    fn piece(&self, token: utok) -> Option<&str>;
}
