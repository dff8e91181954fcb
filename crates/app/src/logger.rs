use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{Level, LevelFilter, Log, Metadata, Record};
use romatype_core::{DiagnosticsConfig, DiagnosticsLevel};

struct FileLogger {
    config: DiagnosticsConfig,
    log_path: PathBuf,
}

static LOGGER: OnceLock<Mutex<FileLogger>> = OnceLock::new();

/// `log` クレートのマクロを [`FileLogger`] に流すための窓口
struct Facade;

static FACADE: Facade = Facade;

pub fn init(base_dir: &Path, config: &DiagnosticsConfig) {
    let log_path = base_dir.join("logs").join("romatype.log");
    log::set_max_level(level_filter(config.level));

    if let Some(lock) = LOGGER.get() {
        if let Ok(mut logger) = lock.lock() {
            logger.log_path = log_path;
            logger.config = config.clone();
        }
        return;
    }

    let logger = FileLogger {
        config: config.clone(),
        log_path,
    };
    let _ = LOGGER.set(Mutex::new(logger));
    if let Err(err) = log::set_logger(&FACADE) {
        eprintln!("[WARN] logger already installed: {}", err);
    }
}

impl Log for Facade {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            write(record.level(), &record.args().to_string());
        }
    }

    fn flush(&self) {}
}

fn write(level: Level, message: &str) {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let line = format!("[{}][{}] {}\n", now, level, message);

    // 練習画面を崩さないよう、標準エラーには警告以上のみ
    if level <= Level::Warn {
        eprint!("{}", line);
    }

    let Some(lock) = LOGGER.get() else {
        return;
    };
    let Ok(logger) = lock.lock() else {
        return;
    };

    if logger.config.file_logging_enabled {
        if let Err(err) = append_with_rotation(
            &logger.log_path,
            logger.config.max_file_bytes,
            logger.config.max_files,
            &line,
        ) {
            eprintln!("[ERROR] logger write failed: {}", err);
        }
    }
}

fn level_filter(level: DiagnosticsLevel) -> LevelFilter {
    match level {
        DiagnosticsLevel::Error => LevelFilter::Error,
        DiagnosticsLevel::Warn => LevelFilter::Warn,
        DiagnosticsLevel::Info => LevelFilter::Info,
        DiagnosticsLevel::Debug => LevelFilter::Debug,
    }
}

fn append_with_rotation(
    log_path: &Path,
    max_file_bytes: u64,
    max_files: u32,
    line: &str,
) -> std::io::Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let next_len = line.len() as u64;
    let current_len = fs::metadata(log_path).map(|m| m.len()).unwrap_or(0);

    if current_len.saturating_add(next_len) > max_file_bytes {
        rotate(log_path, max_files)?;
    }

    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    f.write_all(line.as_bytes())?;
    f.flush()?;
    Ok(())
}

fn rotate(log_path: &Path, max_files: u32) -> std::io::Result<()> {
    if max_files <= 1 {
        if log_path.exists() {
            fs::remove_file(log_path)?;
        }
        return Ok(());
    }

    for idx in (1..max_files).rev() {
        let src = if idx == 1 {
            log_path.to_path_buf()
        } else {
            rotated_path(log_path, idx - 1)
        };
        let dst = rotated_path(log_path, idx);

        if src.exists() {
            if dst.exists() {
                fs::remove_file(&dst)?;
            }
            fs::rename(&src, &dst)?;
        }
    }

    Ok(())
}

fn rotated_path(log_path: &Path, idx: u32) -> PathBuf {
    PathBuf::from(format!("{}.{}", log_path.to_string_lossy(), idx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log_path(name: &str) -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir()
            .join(format!("romatype-logs-{}-{}", name, stamp))
            .join("romatype.log")
    }

    #[test]
    fn rotation_keeps_at_most_max_files() {
        let path = temp_log_path("rotate");
        let line = "x".repeat(600);
        for _ in 0..5 {
            append_with_rotation(&path, 1024, 2, &line).unwrap();
        }
        assert!(path.exists());
        assert!(rotated_path(&path, 1).exists());
        assert!(!rotated_path(&path, 2).exists());
        assert!(fs::metadata(&path).unwrap().len() <= 1024);

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn level_filter_follows_config() {
        assert_eq!(level_filter(DiagnosticsLevel::Warn), LevelFilter::Warn);
        assert_eq!(level_filter(DiagnosticsLevel::Debug), LevelFilter::Debug);
    }
}
