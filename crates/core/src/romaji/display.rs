use super::InputNode;

/// 最短の綴り。同じ長さなら宣言順で先のもの
pub fn shortest_spelling(node: &InputNode) -> &[char] {
    let mut shortest: &[char] = &[];
    for (i, alt) in node.alternatives().iter().enumerate() {
        if i == 0 || alt.len() < shortest.len() {
            shortest = alt;
        }
    }
    shortest
}

/// 画面に出すローマ字。打鍵位置はこの文字列の文字単位で数える
pub fn display_string(nodes: &[InputNode]) -> String {
    nodes
        .iter()
        .flat_map(|node| shortest_spelling(node).iter())
        .collect()
}

/// `cursor` より前の節点の最短綴り長の合計に、現在の節点の打鍵数を足したもの
pub fn completed_length(nodes: &[InputNode], cursor: usize) -> usize {
    let done: usize = nodes
        .iter()
        .take(cursor)
        .map(|node| shortest_spelling(node).len())
        .sum();
    let current = nodes.get(cursor).map_or(0, InputNode::typed);
    done + current
}

/// 次に打つべき文字。打ち終わっていれば `None`
pub fn next_expected_char(display: &str, completed: usize) -> Option<char> {
    display.chars().nth(completed)
}
