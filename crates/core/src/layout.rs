use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

pub const ROWS: usize = 3;
pub const COLUMNS: usize = 10;

/// キーボード配列（文字キー部分の3段×10キー）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub name: String,
    pub rows: Vec<Vec<char>>,
}

impl Layout {
    fn from_rows(name: &str, rows: [&str; ROWS]) -> Self {
        Self {
            name: name.to_string(),
            rows: rows.iter().map(|row| row.chars().collect()).collect(),
        }
    }

    /// 3段×10キーであることを確認する
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.rows.len() != ROWS {
            return Err(LayoutError::Shape {
                name: self.name.clone(),
                detail: format!("expected {} rows, got {}", ROWS, self.rows.len()),
            });
        }
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != COLUMNS {
                return Err(LayoutError::Shape {
                    name: self.name.clone(),
                    detail: format!("row {} has {} keys, expected {}", i, row.len(), COLUMNS),
                });
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let layout: Self = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// JSONファイルからインポート
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSONファイルへエクスポート
    pub fn save(&self, path: &Path) -> Result<(), LayoutError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// 選択可能な配列の一覧。挿入順を保つ
#[derive(Debug, Clone, Default)]
pub struct LayoutCatalog {
    entries: Vec<(String, Layout)>,
}

impl LayoutCatalog {
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        for (id, layout) in builtin_layouts() {
            catalog.insert(id, layout);
        }
        catalog
    }

    /// 同じIDがあれば置き換える
    pub fn insert(&mut self, id: impl Into<String>, layout: Layout) {
        let id = id.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = layout,
            None => self.entries.push((id, layout)),
        }
    }

    /// ファイルを読み込み、ファイル名（拡張子なし）をIDとして追加する
    pub fn import(&mut self, path: &Path) -> Result<String, LayoutError> {
        let layout = Layout::load(path)?;
        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("custom")
            .to_string();
        log::info!("imported layout {:?} as {:?}", layout.name, id);
        self.insert(id.clone(), layout);
        Ok(id)
    }

    pub fn get(&self, id: &str) -> Result<&Layout, LayoutError> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, layout)| layout)
            .ok_or_else(|| LayoutError::UnknownLayout(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Layout)> {
        self.entries.iter().map(|(id, layout)| (id.as_str(), layout))
    }
}

fn builtin_layouts() -> Vec<(&'static str, Layout)> {
    vec![
        (
            "qwerty",
            Layout::from_rows("QWERTY配列", ["qwertyuiop", "asdfghjkl;", "zxcvbnm,./"]),
        ),
        (
            "dvorak",
            Layout::from_rows("Dvorak配列", ["',.pyfgcrl", "aoeuidhtns", ";qjkxbmwvz"]),
        ),
        (
            "colemak",
            Layout::from_rows("Colemak配列", ["qwfpgjluy;", "arstdhneio", "zxcvbkm,./"]),
        ),
        (
            "ohnishi",
            Layout::from_rows("大西配列", ["qlu,.fwryp", "eiao-ktnsh", "zxcv;gdmjb"]),
        ),
        (
            "astarte",
            Layout::from_rows("Astarte配列", ["qpuy,jdhgw", "oeai.ctnsr", "zx-v/mlfbk"]),
        ),
        (
            "eucalyn",
            Layout::from_rows("Eucalyn配列", ["qw,.;mrdyp", "aoeiugtksn", "zxcvfbhjl/"]),
        ),
        (
            "tomisuke",
            Layout::from_rows("Tomisuke配列", ["=,.-;lrdyp", "aoeiugntsk", "qxcwvhmfbz"]),
        ),
        (
            "dvorakjp",
            Layout::from_rows("DvorakJP配列", ["',.pyfgcrl", "aoeuidhtns", ";qjkxbmwvz"]),
        ),
        // 拡張キーを含まない基本配列のみ
        (
            "sky",
            Layout::from_rows("SKY配列", ["wrmhfquao.", "ntskyvuaoi", "pdzgbxeiei"]),
        ),
    ]
}
