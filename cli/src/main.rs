//! paperlode CLI - academic PDF structure inference tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use paperlode::{
    extract_structured_data, pdf_to_markdown, tree, DocumentPipeline, DocumentSource,
    ProcessingStatus, RemoteConfig,
};

#[derive(Parser)]
#[command(name = "paperlode")]
#[command(version)]
#[command(about = "Infer structure from academic PDFs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a PDF to academic markdown
    #[command(alias = "md")]
    Markdown {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Prefer the remote parsing service, falling back to local parsing
        #[arg(long)]
        remote: bool,

        /// Remote parsing service base URL
        #[arg(long, env = "PAPERLODE_BASE_URL")]
        base_url: Option<String>,

        /// Remote parsing service API key
        #[arg(long, env = "PAPERLODE_API_KEY")]
        api_key: Option<String>,
    },

    /// Extract structured document data as JSON
    Json {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Include the assembled section tree
        #[arg(long)]
        tree: bool,
    },

    /// Show inferred document structure at a glance
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Markdown {
            input,
            output,
            remote,
            base_url,
            api_key,
        } => cmd_markdown(&input, output.as_deref(), remote, base_url, api_key),
        Commands::Json {
            input,
            output,
            compact,
            tree,
        } => cmd_json(&input, output.as_deref(), compact, tree),
        Commands::Info { input } => cmd_info(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_markdown(
    input: &Path,
    output: Option<&Path>,
    remote: bool,
    base_url: Option<String>,
    api_key: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let markdown = if remote {
        let base_url =
            base_url.ok_or("remote parsing requires --base-url or PAPERLODE_BASE_URL")?;
        let api_key = api_key.ok_or("remote parsing requires --api-key or PAPERLODE_API_KEY")?;

        let pipeline = DocumentPipeline::with_remote(RemoteConfig::new(base_url, api_key))?;
        let rt = tokio::runtime::Runtime::new()?;
        let processed = rt.block_on(pipeline.process(DocumentSource::path(input)));

        if let ProcessingStatus::Failed { error } = &processed.status {
            log::warn!("remote and local parsing both failed: {error}");
        }
        processed.markdown
    } else {
        pdf_to_markdown(input)
    };

    write_or_print(output, &markdown)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    include_tree: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let markdown = pdf_to_markdown(input);
    let document = extract_structured_data(&markdown).into_document();

    let value = if include_tree {
        let forest = tree::assemble(&document.sections, &tree::LastSeenByLevel);
        serde_json::json!({
            "document": document,
            "tree": forest,
        })
    } else {
        serde_json::to_value(&document)?
    };

    let json = if compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };

    write_or_print(output, &json)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let markdown = pdf_to_markdown(input);
    let document = extract_structured_data(&markdown).into_document();

    println!("Document Information");
    println!("{}", "─".repeat(40));

    println!("File: {}", input.display());
    if let Some(ref title) = document.title {
        println!("Title: {}", title);
    }
    if !document.authors.is_empty() {
        println!("Authors: {}", document.authors.join(", "));
    }
    if let Some(ref abstract_text) = document.abstract_text {
        let words = abstract_text.split_whitespace().count();
        println!("Abstract: {} words", words);
    }
    if !document.keywords.is_empty() {
        println!("Keywords: {}", document.keywords.join(", "));
    }

    println!();
    println!("Structure");
    println!("{}", "─".repeat(40));
    println!("Sections: {}", document.section_count());
    println!("References: {}", document.references.len());
    println!("Figures/Tables: {}", document.figures.len());

    let forest = tree::assemble(&document.sections, &tree::LastSeenByLevel);
    if !forest.is_empty() {
        println!();
        println!("Section Tree");
        println!("{}", "─".repeat(40));
        for root in &forest {
            print_node(root, 0);
        }
    }

    Ok(())
}

fn print_node(node: &paperlode::SectionNode, depth: usize) {
    println!("{}{}", "  ".repeat(depth), node.title);
    for child in &node.children {
        print_node(child, depth + 1);
    }
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("Saved to {}", path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}
