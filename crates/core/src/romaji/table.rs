/// ひらがな（1文字または拗音2文字）と、受け付けるローマ字綴りの対応表。
/// 綴りの順序は意味を持つ: 入力時の優先順位と、表示用最短綴りの同長時の選択に使われる。
pub const ROMAJI_TABLE: &[(&str, &[&str])] = &[
    ("あ", &["a"]),
    ("い", &["i", "yi"]),
    ("う", &["u", "wu", "whu"]),
    ("え", &["e"]),
    ("お", &["o"]),
    ("か", &["ka", "ca"]),
    ("き", &["ki"]),
    ("く", &["ku", "cu", "qu"]),
    ("け", &["ke"]),
    ("こ", &["ko", "co"]),
    ("さ", &["sa"]),
    ("し", &["si", "shi", "ci"]),
    ("す", &["su"]),
    ("せ", &["se", "ce"]),
    ("そ", &["so"]),
    ("た", &["ta"]),
    ("ち", &["ti", "chi"]),
    ("つ", &["tu", "tsu"]),
    ("て", &["te"]),
    ("と", &["to"]),
    ("な", &["na"]),
    ("に", &["ni"]),
    ("ぬ", &["nu"]),
    ("ね", &["ne"]),
    ("の", &["no"]),
    ("は", &["ha"]),
    ("ひ", &["hi"]),
    ("ふ", &["hu", "fu"]),
    ("へ", &["he"]),
    ("ほ", &["ho"]),
    ("ま", &["ma"]),
    ("み", &["mi"]),
    ("む", &["mu"]),
    ("め", &["me"]),
    ("も", &["mo"]),
    ("や", &["ya"]),
    ("ゆ", &["yu"]),
    ("よ", &["yo"]),
    ("ら", &["ra"]),
    ("り", &["ri"]),
    ("る", &["ru"]),
    ("れ", &["re"]),
    ("ろ", &["ro"]),
    ("わ", &["wa"]),
    ("を", &["wo"]),
    ("ん", &["nn", "xn"]),
    ("が", &["ga"]),
    ("ぎ", &["gi"]),
    ("ぐ", &["gu"]),
    ("げ", &["ge"]),
    ("ご", &["go"]),
    ("ざ", &["za"]),
    ("じ", &["zi", "ji"]),
    ("ず", &["zu"]),
    ("ぜ", &["ze"]),
    ("ぞ", &["zo"]),
    ("だ", &["da"]),
    ("ぢ", &["di"]),
    ("づ", &["du"]),
    ("で", &["de"]),
    ("ど", &["do"]),
    ("ば", &["ba"]),
    ("び", &["bi"]),
    ("ぶ", &["bu"]),
    ("べ", &["be"]),
    ("ぼ", &["bo"]),
    ("ぱ", &["pa"]),
    ("ぴ", &["pi"]),
    ("ぷ", &["pu"]),
    ("ぺ", &["pe"]),
    ("ぽ", &["po"]),
    ("きゃ", &["kya"]),
    ("きゅ", &["kyu"]),
    ("きょ", &["kyo"]),
    ("しゃ", &["sya", "sha"]),
    ("しゅ", &["syu", "shu"]),
    ("しょ", &["syo", "sho"]),
    ("ちゃ", &["tya", "cha", "cya"]),
    ("ちゅ", &["tyu", "chu", "cyu"]),
    ("ちょ", &["tyo", "cho", "cyo"]),
    ("にゃ", &["nya"]),
    ("にゅ", &["nyu"]),
    ("にょ", &["nyo"]),
    ("ひゃ", &["hya"]),
    ("ひゅ", &["hyu"]),
    ("ひょ", &["hyo"]),
    ("みゃ", &["mya"]),
    ("みゅ", &["myu"]),
    ("みょ", &["myo"]),
    ("りゃ", &["rya"]),
    ("りゅ", &["ryu"]),
    ("りょ", &["ryo"]),
    ("ぎゃ", &["gya"]),
    ("ぎゅ", &["gyu"]),
    ("ぎょ", &["gyo"]),
    ("じゃ", &["zya", "ja", "jya"]),
    ("じゅ", &["zyu", "ju", "jyu"]),
    ("じょ", &["zyo", "jo", "jyo"]),
    ("びゃ", &["bya"]),
    ("びゅ", &["byu"]),
    ("びょ", &["byo"]),
    ("ぴゃ", &["pya"]),
    ("ぴゅ", &["pyu"]),
    ("ぴょ", &["pyo"]),
    ("ふぁ", &["fa", "huxa", "fwa"]),
    ("ふぃ", &["fi", "huxi", "fwi", "fyi"]),
    ("ふぇ", &["fe", "huxe", "fwe", "fye"]),
    ("ふぉ", &["fo", "huxo", "fwo"]),
    ("っ", &["ltu", "xtu", "ltsu"]),
    ("ー", &["-"]),
    ("、", &[","]),
    ("。", &["."]),
    ("？", &["?"]),
    ("！", &["!"]),
    (" ", &[" "]),
    ("　", &[" "]),
];

/// 促音
pub const SOKUON: &str = "っ";
/// 撥音
pub const HATSUON: &str = "ん";

/// 表に載っている単位ならその綴り一覧を返す
pub fn spellings(unit: &str) -> Option<&'static [&'static str]> {
    ROMAJI_TABLE
        .iter()
        .find(|(kana, _)| *kana == unit)
        .map(|(_, spellings)| *spellings)
}
