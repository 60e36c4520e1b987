use aac_core::boards::BoardManager;
use aac_core::config::{init_logging, Config};
use aac_core::core::board::dangling_ids;
use aac_core::persistence::CatalogStore;
use aac_core::Language;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "aac_catalog", version, about = "Inspect and repair the pictogram catalog")]
struct Args {
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every category and its pictograms.
    Dump {
        #[arg(long, default_value = "es")]
        lang: String,
    },
    /// Report duplicate ids and board entries the catalog cannot resolve.
    Validate,
    /// Delete the edited catalog so the packaged one is used again.
    Reset,
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();
    let config = Config::resolve(args.data_dir, None);
    let layout = config.layout();
    let store = CatalogStore::with_packaged(layout.catalog_file(), config.packaged_catalog.clone());

    match args.command {
        Command::Dump { lang } => {
            let language = Language::from_code(&lang).unwrap_or_default();
            let catalog = store.load();
            let source = if store.has_override() { "device copy" } else { "packaged" };
            println!("# catalog ({})", source);
            for (category, pictograms) in &catalog.categories {
                println!("{}:", category);
                for p in pictograms {
                    println!("  {:<12} {:<10} {}", p.id, p.grammar_type.tag(), p.label(language));
                }
            }
            ExitCode::SUCCESS
        }
        Command::Validate => {
            let catalog = store.load();
            let mut problems = 0;
            for id in catalog.duplicate_ids() {
                println!("duplicate id: {}", id);
                problems += 1;
            }
            for board in BoardManager::new(&layout).list_boards() {
                for id in dangling_ids(&board, &catalog) {
                    println!("board {} references missing pictogram {}", board.id, id);
                    problems += 1;
                }
            }
            if problems == 0 {
                println!("ok");
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Reset => match store.reset() {
            Ok(()) => {
                println!("catalog reset to packaged default");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("[ERROR] {}", e);
                ExitCode::FAILURE
            }
        },
    }
}
