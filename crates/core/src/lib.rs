pub mod config;
pub mod error;
pub mod event;
pub mod key;
pub mod layout;
pub mod romaji;
pub mod state;
pub mod text;

pub use config::{AppConfig, DiagnosticsConfig, DiagnosticsLevel, PracticeConfig};
pub use error::{AppError, ConfigError, LayoutError};
pub use event::{KeyEvent, PracticeEvent};
pub use key::KeyMap;
pub use layout::{Layout, LayoutCatalog};
pub use romaji::{InputNode, Keystroke};
pub use state::{PracticeSession, PracticeView};
pub use text::{TextCategory, TextWithReading};
