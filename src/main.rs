//! # convopack CLI
//!
//! Command-line interface for the convopack library.

use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use convopack::cli::{Args, Branch, Command};
use convopack::config::{IngestConfig, RenderConfig};
use convopack::core::Corpus;
use convopack::core::output::{write_combined_markdown, write_separate};
use convopack::ingest::ArchiveOutcome;
use convopack::pipeline::merge_exports;
use convopack::progress::stderr_progress;
use convopack::ConvopackError;

const MASTER_FILE: &str = "master_conversations.json";
const READABLE_FILE: &str = "conversations_readable.md";
const SEPARATE_DIR: &str = "conversations";
const EXTRACTED_DIR: &str = "extracted_conversations";

fn main() {
    let args = <Args as ClapParser>::parse();
    init_tracing(args.quiet);

    if let Err(e) = run(args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "convopack=warn" } else { "convopack=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<(), ConvopackError> {
    let total_start = Instant::now();
    let quiet = args.quiet;

    println!("📦 convopack v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match args.command {
        Command::Merge {
            exports_dir,
            output,
            extract_dir,
            member,
        } => {
            let mut config = IngestConfig::new().with_member_name(member);
            if let Some(dir) = extract_dir {
                config = config.with_extract_dir(dir);
            }
            merge(&exports_dir, &output, &config)?;
        }
        Command::Render {
            master,
            output,
            branch,
        } => {
            let corpus = load(&master)?;
            render(&corpus, &output, &render_config(branch, quiet))?;
        }
        Command::Split {
            master,
            output_dir,
            branch,
        } => {
            let corpus = load(&master)?;
            split(&corpus, &output_dir, &render_config(branch, quiet))?;
        }
        Command::Run {
            exports_dir,
            out_dir,
            branch,
        } => {
            let master = out_dir.join(MASTER_FILE);
            let config = IngestConfig::new().with_extract_dir(out_dir.join(EXTRACTED_DIR));
            merge(&exports_dir, &master, &config)?;
            println!();

            let corpus = load(&master)?;
            let config = render_config(branch, quiet);
            render(&corpus, &out_dir.join(READABLE_FILE), &config)?;
            println!();
            split(&corpus, &out_dir.join(SEPARATE_DIR), &config)?;
        }
    }

    println!();
    println!("⚡ Total time: {:.2}s", total_start.elapsed().as_secs_f64());
    Ok(())
}

fn merge(exports_dir: &Path, output: &Path, config: &IngestConfig) -> Result<(), ConvopackError> {
    println!("📂 Exports: {}", exports_dir.display());
    if let Some(dir) = &config.extract_dir {
        println!("🗃️  Extract: {}", dir.display());
    }
    println!("💾 Output:  {}", output.display());
    println!();

    println!("⏳ Merging archives...");
    let start = Instant::now();
    let summary = merge_exports(exports_dir, output, config)?;

    for archive in &summary.archives {
        match &archive.outcome {
            ArchiveOutcome::Processed { records } => {
                println!("   [OK] {} - {} conversations", archive.name, records);
            }
            ArchiveOutcome::Skipped { reason } => {
                println!("   [SKIP] {} - {}", archive.name, reason);
            }
            ArchiveOutcome::Failed { error } => {
                println!("   [ERROR] {}: {}", archive.name, error);
            }
        }
    }

    println!();
    println!(
        "✅ Done! Master corpus saved to {} ({:.2}s)",
        output.display(),
        start.elapsed().as_secs_f64()
    );
    println!();
    println!("📊 Summary:");
    println!("   Processed: {} archives", summary.processed);
    println!("   Skipped:   {} archives", summary.skipped);
    println!("   Errors:    {} archives", summary.errored);
    println!("   Before:    {} conversations", summary.dedup.original_count);
    println!(
        "   Unique:    {} conversations ({} duplicates removed)",
        summary.dedup.unique_count,
        summary.dedup.duplicates()
    );
    Ok(())
}

fn load(master: &Path) -> Result<Corpus, ConvopackError> {
    println!("📖 Loading {}...", master.display());
    let corpus = Corpus::load(master)?;
    println!("   Found {} conversations", corpus.len());
    Ok(corpus)
}

fn render_config(branch: Branch, quiet: bool) -> RenderConfig {
    let config = RenderConfig::new().with_flatten_mode(branch.into());
    if quiet {
        config
    } else {
        config.with_progress(stderr_progress())
    }
}

fn render(corpus: &Corpus, output: &Path, config: &RenderConfig) -> Result<(), ConvopackError> {
    println!("📝 Rendering combined document ({})...", config.flatten_mode);
    let start = Instant::now();
    write_combined_markdown(corpus, output, config)?;
    println!(
        "✅ Done! {} conversations written to {} ({:.2}s)",
        corpus.len(),
        output.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn split(corpus: &Corpus, output_dir: &Path, config: &RenderConfig) -> Result<(), ConvopackError> {
    println!("✂️  Splitting into {}...", output_dir.display());
    let start = Instant::now();
    let stats = write_separate(corpus, output_dir, config)?;

    println!("✅ Done! ({:.2}s)", start.elapsed().as_secs_f64());
    println!();
    println!("📊 Summary:");
    println!("   Exported: {} conversations", stats.exported);
    println!("   Failed:   {} conversations", stats.failed);
    println!("   Output:   {}", output_dir.display());
    Ok(())
}
