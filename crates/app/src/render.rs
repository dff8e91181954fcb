use std::fmt::Write;

use romatype_core::{Layout, PracticeView};

macro_rules! color {
    ($text:expr, "green") => {
        format!("\x1b[32m{}\x1b[0m", $text)
    };
    ($text:expr, "highlight") => {
        format!("\x1b[1;30;43m{}\x1b[0m", $text)
    };
    ($text:expr, "key") => {
        format!("\x1b[1;37;44m{}\x1b[0m", $text)
    };
    ($text:expr, "gray") => {
        format!("\x1b[90m{}\x1b[0m", $text)
    };
}

/// 練習画面1枚分の文字列
pub fn render(view: &PracticeView, target: &Layout) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "問題 {} / {}", view.position, view.total);
    if view.all_complete {
        let _ = writeln!(out, "{}", color!("全ての問題を完了しました！", "green"));
        let _ = writeln!(out, "{}", color!(":reset でもう一度練習できます", "gray"));
        return out;
    }

    let _ = writeln!(out, "{}", view.display);
    let _ = writeln!(out, "({})", view.reading);
    let _ = writeln!(out, "{}", romaji_line(view));
    let _ = writeln!(
        out,
        "進捗: {}/{}  エラー: {}  正確率: {:.0}%  {:.0} keys/min",
        view.completed,
        view.romaji.chars().count(),
        view.errors,
        view.accuracy * 100.0,
        view.keys_per_minute
    );
    if view.is_complete {
        let _ = writeln!(out, "{}", color!("完了！次へ...", "green"));
        return out;
    }

    out.push('\n');
    out.push_str(&legend(target, view.next_target));
    if let (Some(target_key), Some(physical)) = (view.next_target, view.next_physical) {
        if physical != target_key {
            let _ = writeln!(
                out,
                "物理キーボードでは「{}」を押してください",
                color!(physical.to_uppercase(), "key")
            );
        }
    }
    out
}

/// 入力済み・次の1文字・未入力 を色分けしたローマ字
fn romaji_line(view: &PracticeView) -> String {
    let typed: String = view.romaji.chars().take(view.completed).collect();
    let mut rest = view.romaji.chars().skip(view.completed);
    let next = rest.next().map(String::from).unwrap_or_default();
    let remaining: String = rest.collect();
    format!(
        "{}{}{}",
        color!(typed, "green"),
        color!(next, "highlight"),
        remaining
    )
}

/// 練習配列のキー表。次に押すキーを強調し、ホームポジションの段には印をつける
fn legend(layout: &Layout, next: Option<char>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} 配列", layout.name);
    for (row_index, row) in layout.rows.iter().enumerate() {
        out.push_str(&" ".repeat(row_index * 2));
        for &key in row {
            let label = format!(" {} ", key.to_uppercase());
            if Some(key) == next {
                out.push_str(&color!(label, "key"));
            } else if row_index == 1 {
                out.push_str(&format!("[{}]", key.to_uppercase()));
            } else {
                out.push_str(&label);
            }
        }
        out.push('\n');
    }
    let space = if next == Some(' ') {
        color!("  Space  ", "key")
    } else {
        color!("  Space  ", "gray")
    };
    let _ = writeln!(out, "{}{}", " ".repeat(12), space);
    out
}
