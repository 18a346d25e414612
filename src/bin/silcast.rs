//! silcast command line driver.
//!
//! Parses a textual SIL file, translates it and prints one summary per
//! entity. Warnings are collected and printed after the summaries.

use bumpalo::Bump;
use clap::Parser;
use silcast::cast::{AstFactory, CAst};
use silcast::core::{BuiltinFilter, CollectingSink, TranslationSession, TranslatorConfig};
use silcast::sil::parse_module;
use silcast::translate_module;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "silcast")]
#[command(about = "Translate textual SIL into CAst entities", long_about = None)]
struct Cli {
    /// Textual SIL input file
    input: PathBuf,

    /// Drop empty placeholder nodes from block statements. Call and control-flow
    /// instructions currently translate to placeholders, so this also empties
    /// the per-entity call and control-flow node lists
    #[arg(long)]
    omit_empty: bool,

    /// Symbol of the script entry function
    #[arg(long, value_name = "SYM", default_value = silcast::core::DEFAULT_ENTRY_SYMBOL)]
    entry: String,

    /// File listing demangled builtin names to skip, one per line
    #[arg(long, value_name = "FILE")]
    builtins: Option<PathBuf>,

    /// Print every block statement tree
    #[arg(long)]
    dump_ast: bool,

    /// Print session statistics
    #[arg(long)]
    stats: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.input)?;
    let module = match parse_module(&text) {
        Ok(module) => module,
        Err(e) => {
            eprintln!("Error: {}: {}", cli.input.display(), e);
            std::process::exit(1);
        }
    };

    let builtins = match &cli.builtins {
        Some(path) => BuiltinFilter::from_file(path)?,
        None => BuiltinFilter::default(),
    };
    let config = TranslatorConfig::new()
        .with_empty_nodes(!cli.omit_empty)
        .with_entry_symbol(cli.entry.clone())
        .with_builtins(builtins);

    let arena = Bump::new();
    let session = TranslationSession::new(&arena);
    let mut ast = CAst::new(&session);
    let mut sink = CollectingSink::new();

    let translated = match translate_module(&mut ast, &session, &module, &config, &mut sink) {
        Ok(translated) => translated,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    for entity in &translated.entities {
        print!("{}", entity);
        if cli.dump_ast {
            for &block in &entity.blocks {
                println!("{}", ast.dump(block));
            }
        }
    }

    for diagnostic in sink.diagnostics() {
        eprintln!("{}", diagnostic);
    }

    if cli.stats {
        print!("{}", translated.stats);
    }
    Ok(())
}
