use std::time::{Duration, Instant};

use crate::config::PracticeConfig;
use crate::error::{AppError, LayoutError};
use crate::event::{KeyEvent, PracticeEvent};
use crate::key::KeyMap;
use crate::layout::{Layout, LayoutCatalog};
use crate::romaji::{self, InputNode, Keystroke};
use crate::text::TextWithReading;

/// 1ラウンド分の練習状態
#[derive(Debug)]
pub struct PracticeSession {
    layouts: LayoutCatalog,
    target_layout: String,
    /// 物理キー → 練習配列のキー
    key_map: KeyMap,
    /// 練習配列のキー → 物理キー（押すべき物理キーの案内用）
    reverse_map: KeyMap,
    texts: Vec<TextWithReading>,
    text_index: usize,
    nodes: Vec<InputNode>,
    cursor: usize,
    started_at: Option<Instant>,
    /// 現在の文を打ち終えた時刻
    finished_at: Option<Instant>,
    errors: u32,
    keystrokes: u32,
    completed_count: usize,
    advance_delay: Duration,
}

/// 描画用のスナップショット
#[derive(Debug, Clone, PartialEq)]
pub struct PracticeView {
    pub display: String,
    pub reading: String,
    pub romaji: String,
    /// `romaji` のうち入力済みの文字数
    pub completed: usize,
    pub next_target: Option<char>,
    pub next_physical: Option<char>,
    pub errors: u32,
    pub keystrokes: u32,
    /// 何問目か（1始まり）
    pub position: usize,
    pub total: usize,
    pub is_complete: bool,
    pub all_complete: bool,
    /// 0.0 〜 1.0
    pub accuracy: f32,
    pub keys_per_minute: f32,
}

impl PracticeSession {
    pub fn new(
        config: &PracticeConfig,
        layouts: LayoutCatalog,
        texts: Vec<TextWithReading>,
    ) -> Result<Self, AppError> {
        let (key_map, reverse_map) =
            build_maps(&layouts, &config.physical_layout, &config.target_layout)?;
        let mut session = Self {
            layouts,
            target_layout: config.target_layout.clone(),
            key_map,
            reverse_map,
            texts,
            text_index: 0,
            nodes: Vec::new(),
            cursor: 0,
            started_at: None,
            finished_at: None,
            errors: 0,
            keystrokes: 0,
            completed_count: 0,
            advance_delay: config.advance_delay(),
        };
        session.reset_practice();
        Ok(session)
    }

    /// キー以外のイベントでは `Ok(None)` を返す
    pub fn process_event(&mut self, event: PracticeEvent) -> Result<Option<Keystroke>, AppError> {
        match event {
            PracticeEvent::Key(ke) => return Ok(self.press(ke)),
            PracticeEvent::Reset => self.reset_all(),
            PracticeEvent::SelectLayouts { physical, target } => {
                self.select_layouts(&physical, &target)?
            }
            PracticeEvent::SelectTexts(texts) => self.select_texts(texts),
        }
        Ok(None)
    }

    /// 1打鍵を処理する。打ち終えた文への入力や節点がない場合は `None`
    pub fn press(&mut self, ke: KeyEvent) -> Option<Keystroke> {
        if self.finished_at.is_some() || self.cursor >= self.nodes.len() {
            return None;
        }

        let logical = self.key_map.translate(ke.key.to_ascii_lowercase());

        if self.started_at.is_none() {
            self.started_at = Some(ke.timestamp);
        }
        self.keystrokes += 1;

        let result = romaji::apply(&mut self.nodes, self.cursor, logical);
        if !result.accepted() {
            self.errors += 1;
            return Some(result);
        }

        if result.node_completed() {
            self.cursor += 1;
            if self.cursor >= self.nodes.len() {
                self.finished_at = Some(ke.timestamp);
                self.completed_count += 1;
                log::info!(
                    "text {}/{} complete: {} keystrokes, {} errors",
                    self.text_index + 1,
                    self.texts.len(),
                    self.keystrokes,
                    self.errors
                );
            }
        }
        Some(result)
    }

    /// 時間経過処理。打ち終えてから待ち時間が過ぎていれば次の文へ進み `true` を返す
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(finished_at) = self.finished_at else {
            return false;
        };
        if now.saturating_duration_since(finished_at) < self.advance_delay {
            return false;
        }
        if self.text_index + 1 >= self.texts.len() {
            return false;
        }
        self.text_index += 1;
        self.reset_practice();
        true
    }

    /// 打ち終えてから次の文に進めるようになるまでの残り時間
    pub fn time_until_advance(&self, now: Instant) -> Option<Duration> {
        let finished_at = self.finished_at?;
        if self.text_index + 1 >= self.texts.len() {
            return None;
        }
        Some(
            self.advance_delay
                .saturating_sub(now.saturating_duration_since(finished_at)),
        )
    }

    pub fn reset_all(&mut self) {
        self.completed_count = 0;
        self.text_index = 0;
        self.reset_practice();
    }

    pub fn select_layouts(&mut self, physical: &str, target: &str) -> Result<(), LayoutError> {
        let (key_map, reverse_map) = build_maps(&self.layouts, physical, target)?;
        self.key_map = key_map;
        self.reverse_map = reverse_map;
        self.target_layout = target.to_string();
        log::info!("layouts changed: {} -> {}", physical, target);
        self.reset_practice();
        Ok(())
    }

    pub fn select_texts(&mut self, texts: Vec<TextWithReading>) {
        self.texts = texts;
        self.reset_all();
    }

    pub fn view(&self, now: Instant) -> PracticeView {
        let (display, reading) = self
            .current_text()
            .map(|t| (t.display.clone(), t.reading.clone()))
            .unwrap_or_default();
        let romaji = romaji::display_string(&self.nodes);
        let completed = romaji::completed_length(&self.nodes, self.cursor);
        let next_target = romaji::next_expected_char(&romaji, completed);
        let next_physical = next_target.map(|c| self.reverse_map.translate(c));

        PracticeView {
            display,
            reading,
            romaji,
            completed,
            next_target,
            next_physical,
            errors: self.errors,
            keystrokes: self.keystrokes,
            position: (self.completed_count + 1).min(self.texts.len().max(1)),
            total: self.texts.len(),
            is_complete: self.finished_at.is_some(),
            all_complete: self.is_all_complete(),
            accuracy: self.accuracy(),
            keys_per_minute: self.keys_per_minute(now),
        }
    }

    pub fn is_all_complete(&self) -> bool {
        !self.texts.is_empty() && self.completed_count >= self.texts.len()
    }

    pub fn current_text(&self) -> Option<&TextWithReading> {
        self.texts.get(self.text_index)
    }

    /// 次に受け付ける練習配列上のキー
    pub fn acceptable_keys(&self) -> Vec<char> {
        romaji::acceptable_keys(&self.nodes, self.cursor)
    }

    pub fn target_layout(&self) -> Result<&Layout, LayoutError> {
        self.layouts.get(&self.target_layout)
    }

    // --- private helpers ---

    /// 現在の文の入力状態を作り直す（節点列は毎回新しく生成する）
    fn reset_practice(&mut self) {
        self.started_at = None;
        self.finished_at = None;
        self.errors = 0;
        self.keystrokes = 0;
        self.cursor = 0;
        self.nodes = self
            .current_text()
            .map(|t| romaji::compile(&t.reading))
            .unwrap_or_default();
    }

    fn accuracy(&self) -> f32 {
        if self.keystrokes == 0 {
            return 1.0;
        }
        (self.keystrokes - self.errors) as f32 / self.keystrokes as f32
    }

    fn keys_per_minute(&self, now: Instant) -> f32 {
        let Some(started_at) = self.started_at else {
            return 0.0;
        };
        let end = self.finished_at.unwrap_or(now);
        let minutes = end.saturating_duration_since(started_at).as_secs_f32() / 60.0;
        if minutes <= 0.0 {
            return 0.0;
        }
        (self.keystrokes - self.errors) as f32 / minutes
    }
}

fn build_maps(
    layouts: &LayoutCatalog,
    physical: &str,
    target: &str,
) -> Result<(KeyMap, KeyMap), LayoutError> {
    let physical = layouts.get(physical)?;
    let target = layouts.get(target)?;
    Ok((
        KeyMap::build(physical, target)?,
        KeyMap::build(target, physical)?,
    ))
}
