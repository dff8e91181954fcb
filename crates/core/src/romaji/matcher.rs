use super::InputNode;

/// 1打鍵の照合結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    /// 受理。`alternative` は宣言順で最初に進んだ綴り
    Advanced { alternative: usize },
    /// 受理し、`alternative` の綴りを打ち切って節点が完了した
    NodeCompleted { alternative: usize },
    /// どの綴りも次にこの文字を期待していない
    Mismatch,
    /// 完了済みの節点への入力
    AlreadyComplete,
    /// カーソルが節点列の範囲外
    OutOfRange,
}

impl Keystroke {
    pub fn accepted(&self) -> bool {
        matches!(self, Self::Advanced { .. } | Self::NodeCompleted { .. })
    }

    pub fn node_completed(&self) -> bool {
        matches!(self, Self::NodeCompleted { .. })
    }
}

impl InputNode {
    /// 1文字を照合する。
    ///
    /// 進めるのは「生きている」綴り、つまり入力済み文字数が節点の打鍵数と等しく、
    /// 次の文字が `key` のものだけ。ここで進まなかった綴りは以後遅れたままになるので、
    /// 途中まで進んだ綴りどうしが異なる入力を前提にすることはない。
    pub fn feed(&mut self, key: char) -> Keystroke {
        if self.is_complete {
            return Keystroke::AlreadyComplete;
        }

        let typed = self.typed();
        let advancing: Vec<usize> = (0..self.alternatives.len())
            .filter(|&i| self.progress[i] == typed && self.alternatives[i].get(typed) == Some(&key))
            .collect();

        let Some(&first) = advancing.first() else {
            return Keystroke::Mismatch;
        };

        for &i in &advancing {
            self.progress[i] += 1;
        }

        let finished = advancing
            .iter()
            .copied()
            .find(|&i| self.progress[i] == self.alternatives[i].len());
        match finished {
            Some(alternative) => {
                self.is_complete = true;
                Keystroke::NodeCompleted { alternative }
            }
            None => Keystroke::Advanced { alternative: first },
        }
    }
}

/// `index` 番目の節点に1打鍵を適用する。
///
/// 不一致や範囲外のときは節点列を一切変更しない。変更されるのは `index` の節点だけ。
pub fn apply(nodes: &mut [InputNode], index: usize, key: char) -> Keystroke {
    let Some(node) = nodes.get_mut(index) else {
        log::debug!("keystroke {:?} at node {} past end ({})", key, index, nodes.len());
        return Keystroke::OutOfRange;
    };
    let result = node.feed(key);
    if !result.accepted() {
        log::debug!("keystroke {:?} rejected at node {} ({}): {:?}", key, index, node.unit(), result);
    }
    result
}

/// 現在の節点で次に受け付ける文字（重複なし、綴りの宣言順）
pub fn acceptable_keys(nodes: &[InputNode], index: usize) -> Vec<char> {
    let Some(node) = nodes.get(index).filter(|n| !n.is_complete()) else {
        return Vec::new();
    };
    let typed = node.typed();
    let mut keys = Vec::new();
    for (alt, &progress) in node.alternatives().iter().zip(node.progress()) {
        if progress != typed {
            continue;
        }
        if let Some(&c) = alt.get(progress) {
            if !keys.contains(&c) {
                keys.push(c);
            }
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::romaji::compile;

    fn drive(nodes: &mut [InputNode], keys: &str) -> (usize, Vec<Keystroke>) {
        let mut cursor = 0;
        let mut results = Vec::new();
        for key in keys.chars() {
            let r = apply(nodes, cursor, key);
            if r.node_completed() {
                cursor += 1;
            }
            results.push(r);
        }
        (cursor, results)
    }

    #[test]
    fn sokuon_completes_with_one_extra_consonant() {
        let mut nodes = compile("っか");
        let (cursor, results) = drive(&mut nodes, "kka");
        assert_eq!(cursor, 2);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(Keystroke::accepted));
        assert_eq!(results[0], Keystroke::NodeCompleted { alternative: 0 });
        assert!(nodes.iter().all(InputNode::is_complete));
    }

    #[test]
    fn sokuon_table_spelling_still_accepted() {
        let mut nodes = compile("っか");
        let (cursor, _) = drive(&mut nodes, "xtuka");
        assert_eq!(cursor, 2);
    }

    #[test]
    fn longer_alternative_wins_after_divergence() {
        let mut nodes = vec![InputNode::new(
            "し",
            vec![vec!['s', 'i'], vec!['s', 'h', 'i']],
        )];
        assert_eq!(apply(&mut nodes, 0, 's'), Keystroke::Advanced { alternative: 0 });
        assert_eq!(apply(&mut nodes, 0, 'h'), Keystroke::Advanced { alternative: 1 });
        assert_eq!(apply(&mut nodes, 0, 'i'), Keystroke::NodeCompleted { alternative: 1 });
        assert_eq!(nodes[0].progress(), &[1, 3]);
        assert!(nodes[0].is_complete());
    }

    #[test]
    fn stalled_alternative_cannot_resume() {
        let mut nodes = vec![InputNode::new(
            "し",
            vec![vec!['s', 'i'], vec!['s', 'h', 'i']],
        )];
        apply(&mut nodes, 0, 's');
        apply(&mut nodes, 0, 'h');
        // "si" の2文字目は 'i' だが、すでに "sh" まで打っているので受け付けない
        assert_eq!(nodes[0].progress(), &[1, 2]);
        assert_eq!(acceptable_keys(&nodes, 0), vec!['i']);
        assert_eq!(apply(&mut nodes, 0, 'h'), Keystroke::Mismatch);
    }

    #[test]
    fn earlier_alternative_wins_ties() {
        let mut nodes = compile("し");
        assert_eq!(apply(&mut nodes, 0, 's'), Keystroke::Advanced { alternative: 0 });
        assert_eq!(apply(&mut nodes, 0, 'i'), Keystroke::NodeCompleted { alternative: 0 });
    }

    #[test]
    fn mismatch_leaves_nodes_unchanged() {
        let mut nodes = compile("かさ");
        apply(&mut nodes, 0, 'k');
        let before = nodes.clone();
        assert_eq!(apply(&mut nodes, 0, 'z'), Keystroke::Mismatch);
        assert_eq!(nodes, before);
    }

    #[test]
    fn out_of_range_is_a_no_op() {
        let mut nodes = compile("あ");
        let before = nodes.clone();
        let r = apply(&mut nodes, 1, 'a');
        assert_eq!(r, Keystroke::OutOfRange);
        assert!(!r.accepted());
        assert_eq!(nodes, before);
    }

    #[test]
    fn completed_node_is_never_mutated() {
        let mut nodes = compile("あ");
        assert!(apply(&mut nodes, 0, 'a').node_completed());
        let before = nodes.clone();
        assert_eq!(apply(&mut nodes, 0, 'a'), Keystroke::AlreadyComplete);
        assert_eq!(nodes, before);
    }

    #[test]
    fn hatsuon_shortcut_preferred_before_consonant() {
        let mut nodes = compile("かんか");
        let (cursor, results) = drive(&mut nodes, "kanka");
        assert_eq!(cursor, 3);
        assert!(results.iter().all(Keystroke::accepted));
    }

    #[test]
    fn hatsuon_before_vowel_needs_double_n() {
        let mut nodes = compile("かんい");
        let (cursor, _) = drive(&mut nodes, "kani");
        // "n" のあとに 'i' は受け付けない
        assert_eq!(cursor, 1);
        let (cursor, results) = drive(&mut compile("かんい"), "kanni");
        assert_eq!(cursor, 3);
        assert!(results.iter().all(Keystroke::accepted));
    }

    #[test]
    fn acceptable_keys_lists_every_live_alternative() {
        let nodes = compile("ちゃ");
        assert_eq!(acceptable_keys(&nodes, 0), vec!['t', 'c']);
        assert!(acceptable_keys(&nodes, 1).is_empty());
    }
}
