use std::env;
use std::process::exit;
use std::time::Duration;

use indicatif::ProgressBar;
use manualqa_core::config::Settings;
use manualqa_core::store::JsonChunkStore;
use manualqa_core::traits::ChunkStore;
use manualqa_pipeline::build_pipeline;
use tracing_subscriber::EnvFilter;

fn parse_args() -> (String, Vec<String>) {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <command> [args]", args[0]);
        eprintln!("Commands:");
        eprintln!("  ask \"<question>\"    Answer a question from the indexed manual");
        exit(1);
    }
    (args[1].clone(), args[2..].to_vec())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (command, args) = parse_args();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;

    match command.as_str() {
        "ask" => {
            let question = args.first().cloned().unwrap_or_else(|| {
                eprintln!("Usage: manualqa ask \"<question>\"");
                exit(1);
            });

            let store = JsonChunkStore::new(&settings.persist_dir);
            let chunks = store.get_all_chunks()?;
            println!("📦 Loaded {} chunks from {}", chunks.len(), settings.persist_dir.display());

            let spinner = ProgressBar::new_spinner();
            spinner.set_message("Building lexical and vector indexes...");
            spinner.enable_steady_tick(Duration::from_millis(100));
            let pipeline = build_pipeline(&settings, chunks)?;
            spinner.finish_with_message("✅ Indexes ready");

            let answer = tokio::runtime::Runtime::new()?.block_on(pipeline.answer(&question))?;

            println!("\nANSWER:\n{}", answer.text);
            if answer.cited_pages.is_empty() {
                println!("\nPAGES: (none)");
            } else {
                let pages: Vec<String> = answer.cited_pages.iter().map(u32::to_string).collect();
                println!("\nPAGES: {}", pages.join(", "));
            }
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            eprintln!("Run without arguments to see usage.");
            exit(1);
        }
    }

    Ok(())
}
