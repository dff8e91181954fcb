use std::time::Instant;

use crate::text::TextWithReading;

/// 練習セッションへの入力イベント
#[derive(Debug, Clone)]
pub enum PracticeEvent {
    Key(KeyEvent),
    /// 最初の文からやり直す（Escキー相当）
    Reset,
    /// 物理配列と練習配列の切替
    SelectLayouts { physical: String, target: String },
    /// 出題文の差し替え（カテゴリ変更時など）
    SelectTexts(Vec<TextWithReading>),
}

/// キーイベント。`key` は物理キーボード上で押された文字
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    pub key: char,
    pub timestamp: Instant,
}

impl KeyEvent {
    pub fn new(key: char) -> Self {
        Self {
            key,
            timestamp: Instant::now(),
        }
    }
}
