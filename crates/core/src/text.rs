use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// 1ラウンドで出題する文の数
pub const DEFAULT_TEXTS_PER_ROUND: usize = 15;

/// 練習文。`reading` はひらがな化済みであること
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextWithReading {
    pub display: String,
    pub reading: String,
}

impl TextWithReading {
    pub fn new(display: &str, reading: &str) -> Self {
        Self {
            display: display.to_string(),
            reading: reading.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextCategory {
    pub name: String,
    pub texts: Vec<TextWithReading>,
}

/// 組み込みカテゴリ（ID, カテゴリ）
pub fn builtin_categories() -> Vec<(&'static str, TextCategory)> {
    vec![
        ("daily", category("日常会話", DAILY)),
        ("food", category("食事・料理", FOOD)),
        ("nature", category("自然・季節", NATURE)),
        ("work", category("ビジネス", WORK)),
    ]
}

pub fn find_category(id: &str) -> Result<TextCategory, AppError> {
    builtin_categories()
        .into_iter()
        .find(|(existing, _)| *existing == id)
        .map(|(_, category)| category)
        .ok_or_else(|| AppError::UnknownCategory(id.to_string()))
}

/// 重複なしで最大 `count` 件をランダムに選ぶ
pub fn select_random<R: Rng + ?Sized>(
    texts: &[TextWithReading],
    count: usize,
    rng: &mut R,
) -> Vec<TextWithReading> {
    let mut shuffled = texts.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count.min(texts.len()));
    shuffled
}

fn category(name: &str, texts: &[(&str, &str)]) -> TextCategory {
    TextCategory {
        name: name.to_string(),
        texts: texts
            .iter()
            .map(|(display, reading)| TextWithReading::new(display, reading))
            .collect(),
    }
}

const DAILY: &[(&str, &str)] = &[
    ("おはようございます", "おはようございます"),
    ("今日はいい天気ですね。", "きょうはいいてんきですね。"),
    ("ありがとうございました", "ありがとうございました"),
    ("また明日会いましょう。", "またあしたあいましょう。"),
    ("ちょっと待ってください。", "ちょっとまってください。"),
    ("お元気ですか？", "おげんきですか？"),
    ("駅まで歩いて行きます。", "えきまであるいていきます。"),
    ("最近、映画を見ましたか？", "さいきん、えいがをみましたか？"),
];

const FOOD: &[(&str, &str)] = &[
    ("いただきます", "いただきます"),
    ("ごちそうさまでした", "ごちそうさまでした"),
    ("お寿司が食べたいです。", "おすしがたべたいです。"),
    ("温かいお茶をください。", "あたたかいおちゃをください。"),
    ("野菜をたくさん食べましょう。", "やさいをたくさんたべましょう。"),
    ("今夜はカレーにしよう。", "こんやはかれーにしよう。"),
    ("ラーメンを一杯ください。", "らーめんをいっぱいください。"),
];

const NATURE: &[(&str, &str)] = &[
    ("桜が満開になりました。", "さくらがまんかいになりました。"),
    ("夏の海はきれいです。", "なつのうみはきれいです。"),
    ("紅葉が美しい季節です。", "こうようがうつくしいきせつです。"),
    ("雪が静かに降っている。", "ゆきがしずかにふっている。"),
    ("山の上から富士山が見える。", "やまのうえからふじさんがみえる。"),
    ("雨上がりに虹が出た。", "あめあがりににじがでた。"),
];

const WORK: &[(&str, &str)] = &[
    ("会議は十時から始まります。", "かいぎはじゅうじからはじまります。"),
    ("資料を確認してください。", "しりょうをかくにんしてください。"),
    ("よろしくお願いいたします。", "よろしくおねがいいたします。"),
    ("明日までに提出します。", "あしたまでにていしゅつします。"),
    ("お疲れさまでした。", "おつかれさまでした。"),
    ("メールを送信しました。", "めーるをそうしんしました。"),
];
