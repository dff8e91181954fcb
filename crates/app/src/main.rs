mod logger;
mod render;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::{Parser, Subcommand};
use rand::thread_rng;

use romatype_core::romaji;
use romatype_core::text::{find_category, select_random};
use romatype_core::{
    AppConfig, AppError, KeyEvent, Keystroke, LayoutCatalog, PracticeEvent, PracticeSession,
};

#[derive(Parser)]
#[command(name = "romatype", about = "Romaji typing practice on a remapped keyboard layout")]
struct Cli {
    /// Path to the config file (default: config.json next to the executable)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Extra layout JSON files; each becomes selectable under its file stem
    #[arg(long = "layout-file")]
    layout_files: Vec<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Practice typing (default)
    Practice {
        /// Layout of the physical keyboard
        #[arg(long)]
        physical: Option<String>,
        /// Layout to practice
        #[arg(long)]
        target: Option<String>,
        /// Text category
        #[arg(long)]
        category: Option<String>,
        /// Number of texts in the round
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Show the romaji and accepted spellings for a hiragana text
    Romaji {
        text: String,
    },
    /// List available layouts
    Layouts,
    /// Write a layout as JSON
    ExportLayout {
        id: String,
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // 設定ファイル読み込み（既定は exe 隣の config.json）
    let config_path = cli.config.clone().unwrap_or_else(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join("config.json")))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    });

    let config = AppConfig::load_or_create(&config_path).unwrap_or_else(|e| {
        eprintln!("config load failed, using defaults: {}", e);
        AppConfig::default()
    });

    let base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    logger::init(&base_dir, &config.diagnostics);

    if let Err(err) = run(cli, config) {
        log::error!("{}", err);
        process::exit(1);
    }
}

fn run(cli: Cli, mut config: AppConfig) -> Result<(), AppError> {
    let mut layouts = LayoutCatalog::builtin();
    for path in &cli.layout_files {
        layouts.import(path)?;
    }

    match cli.command.unwrap_or(Command::Practice {
        physical: None,
        target: None,
        category: None,
        count: None,
    }) {
        Command::Practice {
            physical,
            target,
            category,
            count,
        } => {
            let practice = &mut config.practice;
            if let Some(physical) = physical {
                practice.physical_layout = physical;
            }
            if let Some(target) = target {
                practice.target_layout = target;
            }
            if let Some(category) = category {
                practice.category = category;
            }
            if let Some(count) = count {
                practice.texts_per_round = count;
            }
            config.validate()?;
            practice_loop(&config, layouts)
        }
        Command::Romaji { text } => {
            print_romaji(&text);
            Ok(())
        }
        Command::Layouts => {
            for (id, layout) in layouts.iter() {
                println!("{:<10} {}", id, layout.name);
            }
            Ok(())
        }
        Command::ExportLayout { id, path } => {
            layouts.get(&id)?.save(&path)?;
            println!("wrote {} to {}", id, path.display());
            Ok(())
        }
    }
}

fn print_romaji(text: &str) {
    let nodes = romaji::compile(text);
    println!("{}", romaji::display_string(&nodes));
    for node in &nodes {
        let spellings: Vec<String> = node
            .alternatives()
            .iter()
            .map(|alt| alt.iter().collect())
            .collect();
        println!("  {}\t{}", node.unit(), spellings.join(" / "));
    }
}

/// 1行ぶんの文字を1打鍵ずつ送る。`:reset` でやり直し、`:q` で終了
fn practice_loop(config: &AppConfig, layouts: LayoutCatalog) -> Result<(), AppError> {
    let category = find_category(&config.practice.category)?;
    let texts = select_random(
        &category.texts,
        config.practice.texts_per_round,
        &mut thread_rng(),
    );
    log::info!(
        "starting practice: {} -> {}, category {} ({} texts)",
        config.practice.physical_layout,
        config.practice.target_layout,
        category.name,
        texts.len()
    );

    let mut session = PracticeSession::new(&config.practice, layouts, texts)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    draw(&session, &mut stdout)?;
    for line in stdin.lock().lines() {
        let mut last_miss: Option<(char, Vec<char>)> = None;
        let line = line?;
        match line.trim() {
            ":q" | ":quit" => break,
            ":reset" => {
                session.process_event(PracticeEvent::Reset)?;
            }
            _ => {
                for key in line.chars() {
                    let expected = session.acceptable_keys();
                    let result = session.process_event(PracticeEvent::Key(KeyEvent::new(key)))?;
                    if result == Some(Keystroke::Mismatch) {
                        last_miss = Some((key, expected));
                    }
                }
            }
        }

        // 打ち終えた文は少し表示してから次へ進める
        if let Some(wait) = session.time_until_advance(Instant::now()) {
            draw(&session, &mut stdout)?;
            std::thread::sleep(wait);
            session.tick(Instant::now());
        }
        if let Some((key, expected)) = last_miss {
            let expected: String = expected.into_iter().collect();
            writeln!(stdout, "miss: {:?} (expected one of {:?})", key, expected)?;
        }
        draw(&session, &mut stdout)?;
    }
    Ok(())
}

fn draw(session: &PracticeSession, out: &mut impl Write) -> Result<(), AppError> {
    let view = session.view(Instant::now());
    let target = session.target_layout()?;
    writeln!(out, "\n{}", render::render(&view, target))?;
    if !view.all_complete {
        write!(out, "> ")?;
    }
    out.flush()?;
    Ok(())
}
