// src/main.rs
mod config;
mod extractors;
mod integration;
mod pipeline;
mod records;
mod source;
mod storage;
mod utils;

use std::path::{Path, PathBuf};

use clap::Parser;

use config::{LeftoverPolicy, PipelineConfig};
use integration::DocumentTree;
use storage::{RunSummary, StorageManager};
use utils::AppError;

/// Extracts tables from an academic document and splices them back into its
/// structured text tree.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Decoded document: a JSON page dump or an HTML export
    #[arg(short, long)]
    input: PathBuf,

    /// Document tree (JSON) to reintegrate the extracted tables into (optional)
    #[arg(short, long)]
    tree: Option<PathBuf>,

    /// Output directory for extracted content
    #[arg(short, long, default_value = "./output")]
    output_dir: String,

    /// Debug mode - save annotated HTML of every page's text
    #[arg(short, long)]
    debug: bool,

    /// Leading lines of a schedule page scanned for metadata
    /// (falls back to SCHEDULE_METADATA_LINES, then 15)
    #[arg(long)]
    metadata_lines: Option<usize>,

    /// What to do with extracted tables no paragraph asked for
    #[arg(long, value_enum, default_value_t = LeftoverPolicy::Drop)]
    leftovers: LeftoverPolicy,
}

fn document_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

fn write_debug_pages(
    source: &dyn source::TableSource,
    storage: &StorageManager,
    stem: &str,
) -> Result<(), AppError> {
    let debug_dir = storage.document_dir(stem)?.join("debug");
    std::fs::create_dir_all(&debug_dir)?;

    for page in 1..=source.page_count() {
        let text = match source.page_text(page) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Skipping debug output for page {}: {}", page, e);
                continue;
            }
        };
        let class = extractors::classify(&text);
        let path = debug_dir.join(format!("page_{}.html", page));
        if let Err(e) = utils::html_debug::create_debug_html(
            &text,
            &path,
            page,
            class,
            utils::html_debug::DEBUG_TERMS,
        ) {
            tracing::warn!("Failed to create debug HTML for page {}: {}", page, e);
        }
    }
    tracing::info!("Saved annotated pages to {}", debug_dir.display());
    Ok(())
}

fn main() -> Result<(), AppError> {
    // 1. Parse CLI arguments and set up logging (reads RUST_LOG env var)
    let args = Args::parse();
    utils::logging::setup_logging(args.debug);
    tracing::info!("Starting processing for args: {:?}", args);

    // 2. Resolve configuration: defaults, environment, then flags
    let config = PipelineConfig::resolve(args.metadata_lines, args.leftovers)?;
    tracing::debug!("Resolved configuration: {:?}", config);

    // 3. Open the decoded document
    let source = source::open_document(&args.input)?;
    let page_count = source.page_count();
    if page_count == 0 {
        return Err(AppError::Config(format!(
            "Document {} has no pages",
            args.input.display()
        )));
    }

    let storage = StorageManager::new(&args.output_dir)?;
    let stem = document_stem(&args.input);

    // 4. Extract tables page by page
    let results = pipeline::run_extraction(source.as_ref(), &config);
    storage.save_extraction(&stem, &results)?;

    if args.debug {
        write_debug_pages(source.as_ref(), &storage, &stem)?;
    }

    // 5. Reintegrate into the document tree, if one was given
    let report = match &args.tree {
        Some(tree_path) => {
            tracing::info!("Loading document tree from {}", tree_path.display());
            let tree: DocumentTree = serde_json::from_str(&std::fs::read_to_string(tree_path)?)?;
            let (merged, report) = integration::integrate(tree, &results, config.leftover_policy);
            storage.save_document(&stem, &merged)?;
            Some(report)
        }
        None => {
            tracing::info!("No document tree given; skipping reintegration");
            None
        }
    };

    storage.save_run_metadata(
        &stem,
        &RunSummary {
            input: &args.input,
            page_count,
            results: &results,
            integration: report.as_ref(),
        },
    )?;

    tracing::info!(
        "Processing finished. {} record(s) extracted from {} page(s)",
        results.total(),
        page_count
    );
    Ok(())
}
