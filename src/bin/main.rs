use aac_core::config::{init_logging, Config};
use aac_core::core::grid::{group_by_grammar, rows};
use aac_core::core::settings::clamp_grid_columns;
use aac_core::speech::{SpeechEngine, Utterance};
use aac_core::{AacEngine, Board, ComposerKind, GrammarType, Language, Pictogram};
use clap::Parser;
use crossterm::style::{Color, Stylize};
use std::fs::File;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;

/// Terminal pictogram board: tap by number, speak the phrase.
#[derive(Parser, Debug)]
#[command(name = "aac_board", version)]
struct Args {
    /// Directory holding the catalog, boards and settings.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Sentence composer to use.
    #[arg(long, value_enum)]
    composer: Option<ComposerKind>,
    /// Packaged catalog to use instead of the built-in one.
    #[arg(long)]
    catalog: Option<PathBuf>,
}

/// Prints utterances instead of speaking them.
struct TerminalSpeech;

impl SpeechEngine for TerminalSpeech {
    fn speak(&mut self, utterance: &Utterance) {
        let boost = if utterance.volume_boost { " [boost]" } else { "" };
        println!(
            "{} {}{}",
            format!("[{} x{:.1}]", utterance.language.locale_tag(), utterance.rate).dark_grey(),
            utterance.text.as_str().bold(),
            boost
        );
    }
}

fn main() {
    init_logging();
    let args = Args::parse();
    let mut config = Config::resolve(args.data_dir, args.composer);
    if let Some(path) = args.catalog {
        config = match config.with_packaged_catalog_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("[ERROR] {}", e);
                std::process::exit(1);
            }
        };
    }

    let mut engine = AacEngine::open(&config, Box::new(TerminalSpeech));
    let mut grouped = false;
    let mut status = String::new();

    loop {
        print_ui(&engine, grouped, &status);
        status.clear();

        let mut input = String::new();
        match stdin().read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let cmd = input.trim();
        let (head, rest) = cmd.split_once(' ').unwrap_or((cmd, ""));
        let rest = rest.trim();

        match head {
            "exit" | "q" => break,
            "" | "s" => match engine.speak_phrase() {
                Ok(_) => {}
                Err(e) => status = format!("cannot speak: {}", e),
            },
            "c" => engine.clear_phrase(),
            "d" => match rest.parse::<usize>() {
                Ok(n) if n > 0 => {
                    engine.remove_at(n - 1);
                }
                _ => status = "usage: d <position>".into(),
            },
            "g" => grouped = !grouped,
            "b" if rest.is_empty() => status = board_list(&engine),
            "b" => match engine.switch_board(rest) {
                Ok(()) => status = format!("board '{}' active", rest),
                Err(e) => status = e.to_string(),
            },
            "nb" => status = new_board(&mut engine, rest),
            "del" => match engine.delete_board(rest) {
                Ok(()) => status = format!("board '{}' deleted", rest),
                Err(e) => status = e.to_string(),
            },
            "set" => status = apply_setting(&mut engine, rest),
            "add" => status = add_pictogram(&mut engine, rest),
            "img" => status = attach_image(&mut engine, rest),
            "rm" => match engine.remove_pictogram(rest) {
                Some(p) => status = format!("removed '{}'", p.id),
                None => status = format!("no pictogram '{}'", rest),
            },
            "reset" => {
                engine.reset_catalog();
                status = "packaged catalog restored".into();
            }
            s => match s.parse::<usize>() {
                Ok(n) if n > 0 => {
                    let id = engine.grid().get(n - 1).map(|p| p.id.clone());
                    match id {
                        Some(id) => {
                            engine.tap(&id);
                        }
                        None => status = format!("no pictogram at {}", n),
                    }
                }
                _ => status = format!("unknown command '{}'", s),
            },
        }
    }

    engine.stop_speaking();
}

fn cell(p: &Pictogram, language: Language, show_labels: bool, index: usize) -> String {
    let (r, g, b) = p.color().rgb();
    let text = if show_labels { p.label(language) } else { p.id.as_str() };
    format!(" {:>2} {:<12}", index, text)
        .with(Color::Black)
        .on(Color::Rgb { r, g, b })
        .to_string()
}

fn print_ui(engine: &AacEngine, grouped: bool, status: &str) {
    // Basic clear screen for simplicity
    print!("\x1B[2J\x1B[1;1H");
    let settings = engine.settings.settings();
    let board_name = engine
        .boards
        .active_board()
        .map(|b| b.name)
        .unwrap_or_else(|| "(all pictograms)".into());

    println!("{}", format!("AAC board - {} - {}", board_name, settings.language).bold());
    println!("-----------------------------------------------------------------");
    println!("<n> tap  s speak  d <n> remove  c clear  g grouped  b [id] boards");
    println!("nb <name>: <ids..>  del <id>  set <key> <value>  add/img/rm  exit\n");

    let grid = engine.grid();
    let index_of = |p: &Pictogram| grid.iter().position(|q| std::ptr::eq(*q, p)).unwrap_or(0) + 1;

    if grouped {
        for group in group_by_grammar(&grid) {
            println!("{}", group.grammar.tag().to_uppercase().dark_grey());
            for row in rows(&group.pictograms, group.columns) {
                let line: String = row
                    .iter()
                    .map(|p| cell(*p, settings.language, settings.show_labels, index_of(*p)))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("{}", line);
            }
        }
    } else {
        for row in rows(&grid, settings.grid_columns as usize) {
            let line: String = row
                .iter()
                .map(|p| cell(*p, settings.language, settings.show_labels, index_of(*p)))
                .collect::<Vec<_>>()
                .join(" ");
            println!("{}", line);
        }
    }

    let phrase: Vec<String> = engine
        .phrase
        .pictograms()
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}:{}", i + 1, p.label(settings.language)))
        .collect();
    println!("\nPhrase: [{}]", phrase.join("  "));
    if !status.is_empty() {
        println!("{}", status.yellow());
    }
    print!("\n> ");
    let _ = stdout().flush();
}

fn board_list(engine: &AacEngine) -> String {
    let active = engine.boards.active_board_id();
    engine
        .boards
        .list_boards()
        .iter()
        .map(|b| {
            let mark = if b.id == active { "*" } else { " " };
            format!("{} {} ({}, {} pictograms)", mark, b.id, b.name, b.pictogram_ids.len())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn new_board(engine: &mut AacEngine, spec: &str) -> String {
    let Some((name, ids)) = spec.split_once(':') else {
        return "usage: nb <name>: <id> <id> ...".into();
    };
    let ids: Vec<String> = ids.split_whitespace().map(str::to_string).collect();
    if name.trim().is_empty() || ids.is_empty() {
        return "a board needs a name and at least one pictogram".into();
    }
    match engine.save_board(Board::new(name.trim(), ids)) {
        Ok(board) => format!("board '{}' saved as {}", board.name, board.id),
        Err(e) => e.to_string(),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "on" | "true" | "1" | "yes" => Some(true),
        "off" | "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Rate or pitch multiplier; `nan` and `inf` parse as floats but are refused.
fn parse_speech_factor(value: &str) -> Option<f32> {
    value
        .parse::<f32>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f.clamp(0.1, 3.0))
}

fn apply_setting(engine: &mut AacEngine, spec: &str) -> String {
    let (key, value) = spec.split_once(' ').unwrap_or((spec, ""));
    let value = value.trim();
    let settings = &mut engine.settings;
    let result = match key {
        "lang" => Language::from_code(value).map(|l| settings.set_language(l)),
        "rate" => parse_speech_factor(value).map(|r| settings.set_speech_rate(r)),
        "pitch" => parse_speech_factor(value).map(|p| settings.set_speech_pitch(p)),
        "cols" => value.parse().ok().map(|c| settings.set_grid_columns(clamp_grid_columns(c))),
        "auto" => parse_flag(value).map(|f| settings.set_auto_speak(f)),
        "labels" => parse_flag(value).map(|f| settings.set_show_labels(f)),
        "boost" => parse_flag(value).map(|f| settings.set_volume_boost(f)),
        _ => None,
    };
    match result {
        Some(Ok(())) => format!("{} = {}", key, value),
        Some(Err(e)) => format!("{} changed but not saved: {}", key, e),
        None => "keys: lang es|ca|en, rate, pitch, cols, auto, labels, boost".into(),
    }
}

/// add <category> <grammar> <es>[|<ca>[|<en>]]
fn add_pictogram(engine: &mut AacEngine, spec: &str) -> String {
    let mut parts = spec.splitn(3, ' ');
    let (Some(category), Some(grammar), Some(labels)) = (parts.next(), parts.next(), parts.next()) else {
        return "usage: add <category> <grammar> <es>|<ca>|<en>".into();
    };
    let mut pictogram = Pictogram::new(Pictogram::new_custom_id(), GrammarType::from(grammar.to_string()))
        .with_icon("ic_pictogram_placeholder");
    for (language, label) in Language::ALL.into_iter().zip(labels.split('|')) {
        if !label.trim().is_empty() {
            pictogram = pictogram.with_label(language, label.trim());
        }
    }
    if pictogram.labels.is_empty() {
        return "at least one label is required".into();
    }
    let id = pictogram.id.clone();
    engine.upsert_pictogram(category, pictogram);
    format!("added {} to '{}'", id, category)
}

/// img <pictogram id> <image file>
fn attach_image(engine: &mut AacEngine, spec: &str) -> String {
    let Some((id, path)) = spec.split_once(' ') else {
        return "usage: img <id> <path>".into();
    };
    let Some((category, existing)) = engine
        .catalog()
        .find_with_category(id)
        .map(|(c, p)| (c.to_string(), p.clone()))
    else {
        return format!("no pictogram '{}'", id);
    };
    let file = match File::open(path.trim()) {
        Ok(file) => file,
        Err(e) => return e.to_string(),
    };
    match engine.images.save_image(file) {
        Ok(filename) => {
            if let Some(old) = existing.custom_image_path.as_deref() {
                engine.images.delete_image(old);
            }
            let updated = Pictogram {
                custom_image_path: Some(filename.clone()),
                ..existing
            };
            engine.upsert_pictogram(&category, updated);
            format!("image {} attached to {}", filename, id)
        }
        Err(e) => e.to_string(),
    }
}
