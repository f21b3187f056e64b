use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use dossier_aggregate::{aggregate, summarize};
use dossier_assembly::{assemble_and_write, parse_grouping, translate_letters};
use dossier_collaborator::{Collaborator, GeminiClient, TextRequest};
use dossier_pages::{build_listing, prompts::PROMPT_GROUPING, transcribe_missing, PageLoader};
use dotenv::dotenv;
use std::fs;
use std::path::{Path, PathBuf};

/// Raw collaborator grouping response, persisted next to the letters.
pub const GROUPING_FILENAME: &str = "grouping.json";
/// Audit copy of the exact payload sent to the grouping collaborator.
pub const GROUPING_INPUT_FILENAME: &str = "grouping_input.txt";
/// Strategic summary report.
pub const SUMMARY_FILENAME: &str = "summary.md";

#[derive(Parser)]
#[command(name = "dossier")]
#[command(about = "Reassemble scanned-document pages into letters and aggregate findings", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings and errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Group page texts into letters via the collaborator and assemble them
    Group(GroupArgs),

    /// Translate assembled letters to English
    Translate(TranslateArgs),

    /// Aggregate all analysis JSON and write the strategic summary
    Summarize(SummarizeArgs),

    /// Full sequence over a base directory: group, translate, summarize
    Run(RunArgs),
}

#[derive(Args)]
struct GroupArgs {
    /// Directory containing per-page text files (*.txt)
    #[arg(long, default_value = "pages")]
    pages_dir: PathBuf,

    /// Directory with original page images; enables transcription backfill
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// Directory with per-page English translations
    #[arg(long)]
    translations_dir: Option<PathBuf>,

    /// Letters output directory
    #[arg(long, default_value = "letters")]
    output_dir: PathBuf,

    /// Collection name prefixed to letter folders; defaults to the
    /// output directory's parent directory name
    #[arg(long)]
    collection: Option<String>,

    /// Write one folder per letter using the grouped pages
    #[arg(long)]
    assemble: bool,

    /// Save the constructed page listing for audit
    #[arg(long)]
    save_input: bool,

    /// Replay an existing grouping.json instead of calling the collaborator
    #[arg(long)]
    reuse_grouping: bool,
}

#[derive(Args)]
struct TranslateArgs {
    /// Directory containing assembled letter folders
    #[arg(long, default_value = "letters")]
    letters_dir: PathBuf,

    /// Re-translate even when en.txt already exists
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct SummarizeArgs {
    /// Corpus root to aggregate analysis JSON from
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Directory the summary report is written to; defaults to the root
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args)]
struct RunArgs {
    /// Base directory holding images/, pages/ and letters/
    #[arg(long)]
    base: PathBuf,

    /// Save the constructed page listing for audit
    #[arg(long, default_value_t = true)]
    save_input: bool,

    /// Re-translate letters even when en.txt already exists
    #[arg(long)]
    force_translate: bool,
}

pub fn main_entry() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    init_logging(&cli);

    match cli.command {
        Commands::Group(args) => run_group(&args),
        Commands::Translate(args) => run_translate(&args),
        Commands::Summarize(args) => run_summarize(&args),
        Commands::Run(args) => run_all(&args),
    }
}

fn init_logging(cli: &Cli) {
    let default_filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    builder.target(env_logger::Target::Stderr);
    let _ = builder.try_init();
}

fn run_group(args: &GroupArgs) -> Result<()> {
    // A pure replay run needs no credentials; everything else fails fast
    // before any work is attempted.
    let reuse_path = args.output_dir.join(GROUPING_FILENAME);
    let replay_only =
        args.reuse_grouping && reuse_path.is_file() && args.images_dir.is_none();
    let client = if replay_only {
        None
    } else {
        Some(GeminiClient::from_env()?)
    };

    fs::create_dir_all(&args.pages_dir)?;

    if let Some(images_dir) = &args.images_dir {
        if images_dir.is_dir() {
            let client = client
                .as_ref()
                .ok_or_else(|| anyhow!("transcription backfill needs credentials"))?;
            let written = transcribe_missing(images_dir, &args.pages_dir, client)?;
            log::info!("transcribed {written} missing pages");
        } else {
            log::warn!(
                "images directory {} not found; skipping transcription backfill",
                images_dir.display()
            );
        }
    }

    let mut loader = PageLoader::new(&args.pages_dir);
    if let Some(dir) = &args.translations_dir {
        loader = loader.with_translations_dir(dir);
    }
    let pages = loader.load()?;
    if pages.is_empty() {
        return Err(anyhow!(
            "no page text files found under {}",
            args.pages_dir.display()
        ));
    }

    let listing = build_listing(&pages);
    fs::create_dir_all(&args.output_dir)?;
    if args.save_input {
        fs::write(args.output_dir.join(GROUPING_INPUT_FILENAME), &listing)?;
    }

    let raw = if args.reuse_grouping && reuse_path.is_file() {
        log::info!("reusing existing grouping: {}", reuse_path.display());
        fs::read_to_string(&reuse_path)?
    } else {
        let client = client
            .as_ref()
            .ok_or_else(|| anyhow!("grouping needs credentials"))?;
        log::info!("submitting {} pages for grouping", pages.len());
        let raw = client.generate(&TextRequest {
            instructions: PROMPT_GROUPING,
            input: &listing,
            json_response: true,
        })?;
        fs::write(&reuse_path, &raw)
            .with_context(|| format!("writing {}", reuse_path.display()))?;
        log::info!("saved grouping response to {}", reuse_path.display());
        raw
    };

    let response = parse_grouping(&raw)?;
    log::info!(
        "grouping proposes {} letters, {} unassigned pages",
        response.letters.len(),
        response.unassigned_pages.len()
    );

    if args.assemble {
        let collection = args
            .collection
            .clone()
            .or_else(|| collection_from_output_dir(&args.output_dir));
        assemble_and_write(&args.output_dir, &response, &pages, collection.as_deref())?;
    }
    Ok(())
}

fn run_translate(args: &TranslateArgs) -> Result<()> {
    let client = GeminiClient::from_env()?;
    if !args.letters_dir.is_dir() {
        log::warn!(
            "letters directory {} not found; nothing to translate",
            args.letters_dir.display()
        );
        return Ok(());
    }
    let stats = translate_letters(&args.letters_dir, &client, args.force);
    log::info!(
        "translation done: {} translated, {} skipped, {} failed",
        stats.translated,
        stats.skipped,
        stats.failed
    );
    Ok(())
}

fn run_summarize(args: &SummarizeArgs) -> Result<()> {
    let client = GeminiClient::from_env()?;
    let snapshot = aggregate(&args.root)?;
    let report = summarize(&snapshot, &client);

    let output_dir = args.output_dir.as_deref().unwrap_or(&args.root);
    fs::create_dir_all(output_dir)?;
    let report_path = output_dir.join(SUMMARY_FILENAME);
    fs::write(&report_path, format!("{report}\n"))?;
    log::info!("wrote strategic summary to {}", report_path.display());
    Ok(())
}

fn run_all(args: &RunArgs) -> Result<()> {
    let base = &args.base;
    let pages_dir = base.join("pages");
    let images_dir = base.join("images");
    let letters_dir = base.join("letters");

    if pages_dir.is_dir() || images_dir.is_dir() {
        run_group(&GroupArgs {
            pages_dir,
            images_dir: images_dir.is_dir().then_some(images_dir),
            translations_dir: None,
            output_dir: letters_dir.clone(),
            collection: None,
            assemble: true,
            save_input: args.save_input,
            reuse_grouping: false,
        })?;
    } else {
        log::warn!(
            "no pages/ or images/ under {}; skipping grouping",
            base.display()
        );
    }

    if letters_dir.is_dir() {
        run_translate(&TranslateArgs {
            letters_dir,
            force: args.force_translate,
        })?;
    } else {
        log::warn!(
            "no letters/ under {}; skipping translation",
            base.display()
        );
    }

    if base.is_dir() {
        run_summarize(&SummarizeArgs {
            root: base.clone(),
            output_dir: None,
        })?;
    } else {
        log::warn!(
            "base directory {} not found; skipping summary",
            base.display()
        );
    }

    log::info!("all done");
    Ok(())
}

/// The collection name is the letters directory's parent directory,
/// e.g. `archives/SetE/letters` belongs to collection `SetE`.
fn collection_from_output_dir(output_dir: &Path) -> Option<String> {
    let name = output_dir.parent()?.file_name()?.to_str()?;
    if name.is_empty() || name == "." {
        return None;
    }
    Some(name.to_string())
}
