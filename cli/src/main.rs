//! noteport CLI - note export tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use noteport::render;
use noteport::{
    DocumentStats, ExportFormat, ExportOptions, Exporter, FileSink, MarkdownStyle, Noteport,
    RenderOptions,
};

#[derive(Parser)]
#[command(name = "noteport")]
#[command(version)]
#[command(about = "Export rich-text notes to Markdown, PDF, DOCX, and CSV", long_about = None)]
struct Cli {
    /// Input note JSON file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a note to one format
    Export {
        /// Input note JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Target format
        #[arg(short, long, value_enum)]
        format: FormatArg,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Base file name (defaults to the input file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Document title for PDF and DOCX metadata
        #[arg(long)]
        title: Option<String>,

        /// Emit HTML without escaping text
        #[arg(long)]
        raw_html: bool,

        /// Markdown conversion strategy
        #[arg(long, value_enum, default_value = "structural")]
        markdown_style: StyleArg,
    },

    /// Export a note to every format
    All {
        /// Input note JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Base file name (defaults to the input file stem)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Render a note to HTML
    Html {
        /// Input note JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Emit HTML without escaping text
        #[arg(long)]
        raw: bool,
    },

    /// Render a note to Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input note JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Markdown conversion strategy
        #[arg(long, value_enum, default_value = "structural")]
        style: StyleArg,
    },

    /// Extract plain text from a note
    Text {
        /// Input note JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show note statistics
    Info {
        /// Input note JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// PDF document
    Pdf,
    /// Word document
    Docx,
    /// Single-column CSV
    Csv,
    /// Markdown text
    #[value(alias = "md")]
    Markdown,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Pdf => ExportFormat::Pdf,
            FormatArg::Docx => ExportFormat::Docx,
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Markdown => ExportFormat::Markdown,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum StyleArg {
    /// Convert the document tree directly
    Structural,
    /// Rewrite rendered HTML with regular expressions
    Rewrite,
}

impl From<StyleArg> for MarkdownStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Structural => MarkdownStyle::Structural,
            StyleArg::Rewrite => MarkdownStyle::HtmlRewrite,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Export {
            input,
            format,
            output,
            name,
            title,
            raw_html,
            markdown_style,
        }) => {
            let mut render_options =
                RenderOptions::new().with_markdown_style(markdown_style.into());
            if raw_html {
                render_options = render_options.raw_html();
            }
            let mut options = ExportOptions::new().with_render_options(render_options);
            if let Some(title) = title {
                options = options.with_title(title);
            }
            cmd_export(&input, format.into(), output.as_deref(), name.as_deref(), options)
        }
        Some(Commands::All {
            input,
            output,
            name,
        }) => cmd_all(&input, output.as_deref(), name.as_deref()),
        Some(Commands::Html { input, output, raw }) => cmd_html(&input, output.as_deref(), raw),
        Some(Commands::Markdown {
            input,
            output,
            style,
        }) => cmd_markdown(&input, output.as_deref(), style),
        Some(Commands::Text { input, output }) => cmd_text(&input, output.as_deref()),
        Some(Commands::Info { input, json }) => cmd_info(&input, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: export every format if input is provided
            if let Some(input) = cli.input {
                cmd_all(&input, cli.output.as_deref(), None)
            } else {
                println!("{}", "Usage: noteport <FILE> [OUTPUT]".yellow());
                println!("       noteport --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Base name for artifacts: explicit name, else the input file stem.
fn base_name(input: &Path, name: Option<&str>) -> String {
    match name {
        Some(name) => name.to_string(),
        None => input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default(),
    }
}

fn cmd_export(
    input: &Path,
    format: ExportFormat,
    output: Option<&Path>,
    name: Option<&str>,
    options: ExportOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = noteport::parse_file(input)?;
    let output_dir = output.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));

    let exporter = Exporter::with_defaults()
        .with_options(options)
        .with_sink(FileSink::new(&output_dir));
    let outcome = exporter.export(&doc, format, &base_name(input, name))?;

    println!(
        "{} {} ({} bytes)",
        "Saved to".green(),
        output_dir.join(&outcome.filename).display(),
        outcome.payload.len()
    );
    Ok(())
}

fn cmd_all(
    input: &Path,
    output: Option<&Path>,
    name: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.map(Path::to_path_buf).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_export", stem))
    });

    let pb = ProgressBar::new(ExportFormat::ALL.len() as u64 + 1);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Reading note...");
    let doc = noteport::parse_file(input)?;
    pb.inc(1);

    pb.set_message("Exporting...");
    let exporter = Exporter::with_defaults().with_sink(FileSink::new(&output_dir));
    let results = exporter.export_many(&doc, &ExportFormat::ALL, &base_name(input, name));
    pb.inc(results.len() as u64);
    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    let mut failures = 0;
    let last = results.len().saturating_sub(1);
    for (i, (format, result)) in results.iter().enumerate() {
        let branch = if i == last { "└─" } else { "├─" };
        match result {
            Ok(outcome) => println!("  {} {}", branch.dimmed(), outcome.filename),
            Err(e) => {
                failures += 1;
                println!("  {} {} {}", branch.dimmed(), format.to_string().red(), e);
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} of {} exports failed", failures, results.len()).into());
    }
    Ok(())
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_html(input: &Path, output: Option<&Path>, raw: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = Noteport::new();
    if raw {
        builder = builder.raw_html();
    }
    let note = builder.parse_file(input)?;
    write_or_print(output, &note.to_html())
}

fn cmd_markdown(
    input: &Path,
    output: Option<&Path>,
    style: StyleArg,
) -> Result<(), Box<dyn std::error::Error>> {
    let note = Noteport::new()
        .with_markdown_style(style.into())
        .parse_file(input)?;
    write_or_print(output, &note.to_markdown())
}

fn cmd_text(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let doc = noteport::parse_file(input)?;
    write_or_print(output, &render::to_text(&doc))
}

fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let doc = noteport::parse_file(input)?;
    let stats = DocumentStats::collect(&doc);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Note Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Nodes".bold(), doc.node_count());
    if doc.is_empty() {
        println!("{}", "Note has no content".yellow());
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!(
        "{}: {} ({} items)",
        "Lists".bold(),
        stats.list_count,
        stats.list_item_count
    );
    println!("{}: {}", "Images".bold(), stats.image_count);
    println!("{}: {}", "Code blocks".bold(), stats.code_block_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    if stats.unknown_count > 0 {
        log::warn!("{} node(s) of unrecognized type", stats.unknown_count);
        println!("{}: {}", "Unrecognized".yellow(), stats.unknown_count);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "noteport".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Rich-text note export tool");
    println!();
    println!("Formats: {}", "pdf, docx, csv, markdown".dimmed());
    println!("License: MIT");
}
