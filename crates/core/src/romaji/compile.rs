use super::table::{spellings, HATSUON, SOKUON};
use super::InputNode;

/// 変換できない漢字の代わりに表示し、そのまま打たせる文字
pub const IDEOGRAPH_PLACEHOLDER: char = '?';

/// かな文字列を入力節点の列に変換する。
///
/// 拗音などの2文字単位を1文字単位より優先して切り出し、走査後に促音と撥音の
/// 文脈規則を適用する。同じ入力に対して常に同じ結果を返す。
pub fn compile(text: &str) -> Vec<InputNode> {
    let chars: Vec<char> = text.chars().collect();
    let mut nodes = Vec::with_capacity(chars.len());

    let mut i = 0;
    while i < chars.len() {
        if i + 1 < chars.len() {
            let pair: String = chars[i..i + 2].iter().collect();
            if let Some(spellings) = spellings(&pair) {
                nodes.push(InputNode::from_spellings(pair, spellings));
                i += 2;
                continue;
            }
        }
        nodes.push(single_node(chars[i]));
        i += 1;
    }

    apply_sokuon(&mut nodes);
    apply_hatsuon(&mut nodes);

    log::trace!("compiled {:?} into {} nodes", text, nodes.len());
    nodes
}

fn single_node(ch: char) -> InputNode {
    let mut buf = [0u8; 4];
    let unit: &str = ch.encode_utf8(&mut buf);

    if let Some(spellings) = spellings(unit) {
        InputNode::from_spellings(unit, spellings)
    } else if ch.is_ascii_alphanumeric() {
        InputNode::passthrough(ch.to_ascii_lowercase())
    } else if is_ideograph(ch) {
        InputNode::passthrough(IDEOGRAPH_PLACEHOLDER)
    } else {
        InputNode::passthrough(ch)
    }
}

/// CJK統合漢字（U+4E00..=U+9FAF）
fn is_ideograph(ch: char) -> bool {
    ('\u{4e00}'..='\u{9faf}').contains(&ch)
}

/// っ: 次の節点の子音を1回多く打つ綴りを先頭に足す
fn apply_sokuon(nodes: &mut [InputNode]) {
    for j in 0..nodes.len().saturating_sub(1) {
        if nodes[j].unit() != SOKUON {
            continue;
        }
        if let Some(consonant) = nodes[j + 1].first_char().filter(char::is_ascii_lowercase) {
            nodes[j].prepend_alternative(vec![consonant]);
        }
    }
}

/// ん: 文末、または次が母音・y・n で始まらない場合に限り "n" 1打を許す
fn apply_hatsuon(nodes: &mut [InputNode]) {
    for j in 0..nodes.len() {
        if nodes[j].unit() != HATSUON {
            continue;
        }
        let single_n = match nodes.get(j + 1) {
            None => true,
            Some(next) => next
                .first_char()
                .is_some_and(|c| !matches!(c, 'a' | 'i' | 'u' | 'e' | 'o' | 'y' | 'n')),
        };
        if single_n {
            nodes[j].prepend_alternative(vec!['n']);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::romaji::table::ROMAJI_TABLE;

    fn alts(node: &InputNode) -> Vec<String> {
        node.alternatives()
            .iter()
            .map(|alt| alt.iter().collect())
            .collect()
    }

    #[test]
    fn every_table_unit_compiles_to_its_spellings() {
        for (kana, spellings) in ROMAJI_TABLE {
            let nodes = compile(kana);
            assert_eq!(nodes.len(), 1, "{kana}");
            let expected: Vec<String> = spellings.iter().map(|s| s.to_string()).collect();
            match *kana {
                // 末尾の「ん」は "n" 1打が先頭に加わる
                "ん" => {
                    assert_eq!(alts(&nodes[0])[0], "n");
                    assert_eq!(alts(&nodes[0])[1..], expected[..]);
                }
                _ => assert_eq!(alts(&nodes[0]), expected, "{kana}"),
            }
            assert!(nodes[0].progress().iter().all(|&p| p == 0));
        }
    }

    #[test]
    fn digraph_takes_precedence() {
        let nodes = compile("きゃ");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].unit(), "きゃ");
        assert_eq!(alts(&nodes[0]), vec!["kya"]);
    }

    #[test]
    fn sokuon_prepends_next_consonant() {
        let nodes = compile("っか");
        assert_eq!(nodes.len(), 2);
        assert_eq!(alts(&nodes[0]), vec!["k", "ltu", "xtu", "ltsu"]);
    }

    #[test]
    fn sokuon_without_consonant_keeps_table_spellings() {
        let nodes = compile("っ。");
        assert_eq!(alts(&nodes[0]), vec!["ltu", "xtu", "ltsu"]);
        let nodes = compile("かっ");
        assert_eq!(alts(&nodes[1]), vec!["ltu", "xtu", "ltsu"]);
    }

    #[test]
    fn hatsuon_before_vowel_requires_long_form() {
        let nodes = compile("かんい");
        assert_eq!(alts(&nodes[1]), vec!["nn", "xn"]);
    }

    #[test]
    fn hatsuon_before_consonant_allows_single_n() {
        let nodes = compile("かんか");
        assert_eq!(alts(&nodes[1]), vec!["n", "nn", "xn"]);
    }

    #[test]
    fn hatsuon_before_y_or_n_requires_long_form() {
        assert_eq!(alts(&compile("んや")[0]), vec!["nn", "xn"]);
        assert_eq!(alts(&compile("んな")[0]), vec!["nn", "xn"]);
        assert_eq!(alts(&compile("んん")[0]), vec!["nn", "xn"]);
    }

    #[test]
    fn hatsuon_at_end_allows_single_n() {
        let nodes = compile("ほん");
        assert_eq!(alts(&nodes[1]), vec!["n", "nn", "xn"]);
    }

    #[test]
    fn ascii_and_symbols_pass_through() {
        let nodes = compile("A1「");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].unit(), "a");
        assert_eq!(alts(&nodes[0]), vec!["a"]);
        assert_eq!(alts(&nodes[1]), vec!["1"]);
        assert_eq!(nodes[2].unit(), "「");
        assert_eq!(alts(&nodes[2]), vec!["「"]);
    }

    #[test]
    fn ideograph_degrades_to_placeholder() {
        let nodes = compile("日は");
        assert_eq!(nodes[0].unit(), "?");
        assert_eq!(alts(&nodes[0]), vec!["?"]);
        assert_eq!(alts(&nodes[1]), vec!["ha"]);
    }

    #[test]
    fn compile_is_deterministic() {
        let text = "きょうはいっしょにごはんをたべましょう。";
        assert_eq!(compile(text), compile(text));
    }
}
