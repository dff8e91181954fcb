use std::collections::HashMap;

use crate::error::LayoutError;
use crate::layout::{Layout, COLUMNS, ROWS};

/// 物理キー → 論理キーの対応表。
/// 2つの配列の同じ段・同じ列のキー同士を対応づける。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMap {
    map: HashMap<char, char>,
}

impl KeyMap {
    /// `physical` で打ったキーを `target` のキーとして扱う対応表を作る。
    ///
    /// 同じ文字が複数位置にある配列では後の位置が優先される。
    pub fn build(physical: &Layout, target: &Layout) -> Result<Self, LayoutError> {
        physical.validate()?;
        target.validate()?;

        let mut map = HashMap::with_capacity(ROWS * COLUMNS);
        for (physical_row, target_row) in physical.rows.iter().zip(&target.rows) {
            for (&from, &to) in physical_row.iter().zip(target_row) {
                map.insert(from, to);
            }
        }
        Ok(Self { map })
    }

    /// 対応がなければそのまま返す
    pub fn translate(&self, key: char) -> char {
        self.map.get(&key).copied().unwrap_or(key)
    }

    pub fn is_identity(&self) -> bool {
        self.map.iter().all(|(from, to)| from == to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutCatalog;

    #[test]
    fn maps_positionally() {
        let catalog = LayoutCatalog::builtin();
        let map = KeyMap::build(
            catalog.get("qwerty").unwrap(),
            catalog.get("ohnishi").unwrap(),
        )
        .unwrap();
        assert_eq!(map.translate('q'), 'q');
        assert_eq!(map.translate('w'), 'l');
        assert_eq!(map.translate('a'), 'e');
        assert_eq!(map.translate('/'), 'b');
        // 対応外のキーは素通し
        assert_eq!(map.translate(' '), ' ');
        assert_eq!(map.translate('1'), '1');
    }

    #[test]
    fn reverse_map_undoes_forward_map() {
        let catalog = LayoutCatalog::builtin();
        let qwerty = catalog.get("qwerty").unwrap();
        let dvorak = catalog.get("dvorak").unwrap();
        let forward = KeyMap::build(qwerty, dvorak).unwrap();
        let reverse = KeyMap::build(dvorak, qwerty).unwrap();
        for row in &qwerty.rows {
            for &key in row {
                assert_eq!(reverse.translate(forward.translate(key)), key);
            }
        }
    }

    #[test]
    fn same_layout_is_identity() {
        let catalog = LayoutCatalog::builtin();
        let dvorak = catalog.get("dvorak").unwrap();
        assert!(KeyMap::build(dvorak, dvorak).unwrap().is_identity());
    }

    #[test]
    fn rejects_malformed_layout() {
        let catalog = LayoutCatalog::builtin();
        let broken = Layout {
            name: "broken".into(),
            rows: vec![vec!['a']],
        };
        assert!(KeyMap::build(catalog.get("qwerty").unwrap(), &broken).is_err());
    }
}
