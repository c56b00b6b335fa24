//! CLI binary for pdf2img.
//!
//! A thin shim over the library crate: converts page 1 of a PDF, writes the
//! PNG next to the input (or to `--output`) and reports the result.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2img::{Converter, InputFile, LibrarySource};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Render page 1 next to the input (report.pdf → report.png)
  pdf2img report.pdf

  # Choose the output file or directory
  pdf2img scan.PDF -o thumbnails/

  # Machine-readable result
  pdf2img report.pdf --json

  # Print a data: URL instead of a summary
  pdf2img report.pdf --data-url > report.url

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH     Path to an existing libpdfium (otherwise: ./, next to the
                      executable, then the system library)
  RUST_LOG            Override the log filter (e.g. pdf2img=debug)
"#;

/// Render the first page of a PDF to a PNG image.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2img",
    version,
    about = "Render the first page of a PDF to a PNG image",
    long_about = "Render the first page of a PDF to a PNG image at 4× the page's native size. \
The output is named after the input with its .pdf extension replaced by .png.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file to convert.
    input: PathBuf,

    /// Output file, or an existing directory to place `<name>.png` in.
    #[arg(short, long, env = "PDF2IMG_OUTPUT")]
    output: Option<PathBuf>,

    /// Path to the pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Print the conversion result as JSON.
    #[arg(long)]
    json: bool,

    /// Print the image as a `data:image/png;base64,…` URL.
    #[arg(long, conflicts_with = "json")]
    data_url: bool,

    /// Disable the spinner.
    #[arg(long, env = "PDF2IMG_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2IMG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2IMG_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.data_url;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Convert ──────────────────────────────────────────────────────────
    let converter = Converter::pdfium(LibrarySource::from_option(cli.pdfium_lib.clone()));
    let file = InputFile::from_path(&cli.input);

    let spinner = show_progress.then(|| {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Rendering");
        bar.set_message(file.name().to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    });

    let result = converter.convert(&file).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    if let Some(err) = result.error() {
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&result).context("Failed to serialize result")?
            );
        } else {
            eprintln!("{} {}", red("✘"), err);
        }
        std::process::exit(1);
    }

    let image = result
        .file()
        .context("Conversion reported success without an image")?;

    // ── Write output ─────────────────────────────────────────────────────
    let out_path = output_path(&cli.input, cli.output.as_deref(), image.name());
    image
        .write_to(&out_path)
        .await
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    if cli.json {
        let json = serde_json::json!({
            "result": &result,
            "path": out_path,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json).context("Failed to serialize result")?
        );
    } else if cli.data_url {
        println!("{}", image.to_data_url());
    } else if !cli.quiet {
        eprintln!(
            "{} {}  →  {}  {}",
            green("✔"),
            cli.input.display(),
            bold(&out_path.display().to_string()),
            dim(&format!("{} bytes", image.bytes().len())),
        );
    }

    converter.release(&result);

    Ok(())
}

/// Where to write the PNG: inside `output` if it is a directory, at `output`
/// otherwise, or next to the input when no output was given.
fn output_path(input: &Path, output: Option<&Path>, image_name: &str) -> PathBuf {
    match output {
        Some(p) if p.is_dir() => p.join(image_name),
        Some(p) => p.to_path_buf(),
        None => input.with_file_name(image_name),
    }
}
