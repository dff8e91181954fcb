/// アプリケーションエラーの統合型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 設定ファイルエラー
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 配列定義エラー
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// 練習文カテゴリが見つからない
    #[error("unknown text category: {0}")]
    UnknownCategory(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("unknown layout: {0}")]
    UnknownLayout(String),

    /// 3段×10キーでない
    #[error("layout {name:?} has invalid shape: {detail}")]
    Shape { name: String, detail: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("parse error: {0}")]
    ParseError(#[from] serde_json::Error),
}
