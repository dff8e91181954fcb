//! ローマ字入力判定エンジン。
//!
//! かな文字列を [`InputNode`] の列に変換し（[`compile`]）、1打鍵ずつ照合する（[`apply`]）。
//! 表示用の文字列や進捗は節点列とカーソルから毎回導出する（[`display`]）。

pub mod compile;
pub mod display;
pub mod matcher;
pub mod table;

pub use compile::compile;
pub use display::{completed_length, display_string, next_expected_char, shortest_spelling};
pub use matcher::{acceptable_keys, apply, Keystroke};
pub use table::{spellings, ROMAJI_TABLE};

/// かな1単位ぶんの照合状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputNode {
    unit: String,
    /// 受け付ける綴り。1文字ずつに分解して持つ
    alternatives: Vec<Vec<char>>,
    /// 綴りごとの入力済み文字数（`alternatives` と同じ長さ）
    progress: Vec<usize>,
    is_complete: bool,
}

impl InputNode {
    /// `alternatives` が空の場合は元の単位をそのまま打つ綴りを1つ補う。
    pub fn new(unit: impl Into<String>, alternatives: Vec<Vec<char>>) -> Self {
        let unit = unit.into();
        let mut alternatives: Vec<Vec<char>> =
            alternatives.into_iter().filter(|alt| !alt.is_empty()).collect();
        if alternatives.is_empty() {
            alternatives.push(unit.chars().collect());
        }
        let progress = vec![0; alternatives.len()];
        Self {
            unit,
            alternatives,
            progress,
            is_complete: false,
        }
    }

    pub fn from_spellings(unit: impl Into<String>, spellings: &[&str]) -> Self {
        Self::new(
            unit,
            spellings.iter().map(|s| s.chars().collect()).collect(),
        )
    }

    /// 表示文字そのものを1打で入力する節点
    pub fn passthrough(ch: char) -> Self {
        Self::new(ch.to_string(), vec![vec![ch]])
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn alternatives(&self) -> &[Vec<char>] {
        &self.alternatives
    }

    pub fn progress(&self) -> &[usize] {
        &self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// この節点で受理済みの打鍵数
    pub fn typed(&self) -> usize {
        self.progress.iter().copied().max().unwrap_or(0)
    }

    /// 先頭の綴りの先頭文字
    pub fn first_char(&self) -> Option<char> {
        self.alternatives.first().and_then(|alt| alt.first()).copied()
    }

    /// 規則で追加する綴りを最優先に差し込む。入力開始前にのみ呼ぶこと。
    fn prepend_alternative(&mut self, alternative: Vec<char>) {
        debug_assert_eq!(self.typed(), 0);
        self.alternatives.insert(0, alternative);
        self.progress = vec![0; self.alternatives.len()];
    }
}
