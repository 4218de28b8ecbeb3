//! 封闭词表：词与 `[0, N)` 内连续词序号之间的双射。

use crate::{utok, Error, Method, Result};
use patricia_tree::PatriciaMap;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// 从切分后的语料构造词表。
///
/// 重复的词只保留一个，去重后按码点的字典序排序，从 0 开始依次编号。
/// 相同的输入总是产生完全相同的词表。
#[inline]
pub fn build_vocab<'s>(tokens: impl IntoIterator<Item = &'s str>) -> Vocab {
    Vocab::build(tokens)
}

pub struct Vocab {
    /// 保存所有词的字符串内容，短词尽量复用长词的片段
    text: Box<str>,
    /// 按词序号保存每个词在 `text` 中的位置
    tokens: Box<[(u32, u32)]>,
    /// 词到词序号的前缀树
    trie: PatriciaMap<utok>,
}

impl Vocab {
    /// 见 [`build_vocab`]。
    pub fn build<'s>(tokens: impl IntoIterator<Item = &'s str>) -> Self {
        // BTreeSet 同时完成去重和排序，`str` 的序即码点序
        let sorted = tokens
            .into_iter()
            .filter(|t| is_token(t))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        Self::from_pieces(&sorted)
    }

    /// 从外部提供的映射构造词表。
    ///
    /// 映射必须是双射：词非空、不含空白且不重复，词序号不重复并恰好覆盖 `[0, N)`。
    pub fn from_pairs<'s>(pairs: impl IntoIterator<Item = (&'s str, utok)>) -> Result<Self> {
        let pairs = pairs.into_iter().collect::<Vec<_>>();
        let mut slots = vec![None::<&str>; pairs.len()];
        let mut seen = HashMap::<&str, utok>::with_capacity(pairs.len());
        for (piece, id) in pairs {
            if !is_token(piece) {
                return Err(Error::Configuration(format!(
                    "token {piece:?} at id {id} is empty or contains whitespace"
                )));
            }
            if let Some(prev) = seen.insert(piece, id) {
                return Err(Error::Configuration(format!(
                    "token {piece:?} mapped to both {prev} and {id}"
                )));
            }
            let i = id as usize;
            if i >= slots.len() {
                // N 个词的序号必须落在 [0, N) 内，否则必有空洞
                return Err(Error::Configuration(format!(
                    "id {id} out of range for {} tokens",
                    slots.len()
                )));
            }
            if let Some(prev) = slots[i].replace(piece) {
                return Err(Error::Configuration(format!(
                    "id {id} shared by {prev:?} and {piece:?}"
                )));
            }
        }
        let pieces = slots
            .into_iter()
            .map(|piece| piece.ok_or_else(|| Error::Configuration("ids are not dense".into())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_pieces(&pieces))
    }

    /// 见 [`Vocab::from_pairs`]。
    #[inline]
    pub fn from_map(map: &HashMap<String, utok>) -> Result<Self> {
        Self::from_pairs(map.iter().map(|(k, &v)| (k.as_str(), v)))
    }

    /// 解析词表文本：每行一个用双引号包裹的词，行号即词序号。
    pub fn from_vocabs_txt(txt: &str) -> Result<Self> {
        let pieces = txt
            .lines()
            .enumerate()
            .map(|(i, line)| {
                line.strip_prefix('"')
                    .and_then(|s| s.strip_suffix('"'))
                    .ok_or(Error::Format {
                        line: i + 1,
                        reason: "token must be wrapped in double quotes",
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_pairs(pieces.into_iter().zip(0..))
    }

    /// 按 [`Vocab::from_vocabs_txt`] 的格式输出词表。
    pub fn to_vocabs_txt(&self) -> String {
        let mut ans = String::with_capacity(self.iter().map(|(_, p)| p.len() + 3).sum());
        for (_, piece) in self.iter() {
            ans.push('"');
            ans.push_str(piece);
            ans.push_str("\"\n");
        }
        ans
    }

    /// 词表中的词数。
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// piece -> token
    #[inline]
    pub fn get(&self, piece: &str) -> Option<utok> {
        self.trie.get(piece.as_bytes()).copied()
    }

    /// token -> piece
    #[inline]
    pub fn piece(&self, token: utok) -> Option<&str> {
        self.tokens
            .get(token as usize)
            .map(|&(off, len)| &self.text[off as usize..][..len as usize])
    }

    /// 按词序号遍历词表。
    pub fn iter(&self) -> impl Iterator<Item = (utok, &str)> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .map(|(i, &(off, len))| (i as utok, &self.text[off as usize..][..len as usize]))
    }

    /// 第 i 个词的序号为 i。调用者保证 `pieces` 非空且不重复。
    fn from_pieces(pieces: &[&str]) -> Self {
        let total_len = pieces.iter().map(|p| p.len()).sum::<usize>();
        let CompressedVocab { text, slices } = CompressedVocab::new(pieces, total_len);
        let tokens = slices
            .into_iter()
            .map(|(off, len)| (off as u32, len as u32))
            .collect::<Box<_>>();
        let trie = pieces
            .iter()
            .enumerate()
            .map(|(i, piece)| (piece.as_bytes(), i as utok))
            .collect();

        debug!(
            "built vocab of {} tokens, compressed to {} bytes from {total_len} bytes",
            tokens.len(),
            text.len(),
        );

        Self { text, tokens, trie }
    }
}

impl Method for Vocab {
    #[inline]
    fn vocab_size(&self) -> usize {
        self.len()
    }
    #[inline]
    fn find_piece(&self, piece: &str) -> Option<utok> {
        self.get(piece)
    }
    #[inline]
    fn piece(&self, token: utok) -> Option<&str> {
        Vocab::piece(self, token)
    }
}

/// 切分结果中的词非空且不含空白，词表只接受这样的词。
#[inline]
fn is_token(piece: &str) -> bool {
    !piece.is_empty() && !piece.contains(char::is_whitespace)
}

/// 利用词表中的重复部分压缩词表。
struct CompressedVocab {
    text: Box<str>,
    slices: Vec<(usize, usize)>,
}

impl CompressedVocab {
    fn new(pieces: &[&str], total_len: usize) -> Self {
        let mut slices = vec![(0usize, 0usize); pieces.len()];
        let mut text_buf = String::with_capacity(total_len);
        let mut indices = (0..pieces.len()).collect::<Vec<_>>();
        // 短的词可能是长词的子串，先放入长词
        indices.sort_unstable_by_key(|&i| std::cmp::Reverse(pieces[i].len()));
        for i in indices {
            let p = pieces[i];
            // utf-8 是自同步的，合法子串的匹配位置必定落在字符边界上
            let off = memchr::memmem::find(text_buf.as_bytes(), p.as_bytes()).unwrap_or_else(|| {
                let off = text_buf.len();
                text_buf.push_str(p);
                off
            });
            slices[i] = (off, p.len());
        }
        Self {
            text: text_buf.into_boxed_str(),
            slices,
        }
    }
}
