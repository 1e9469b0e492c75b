use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use pocket_jot::constants::DEFAULT_CONTENT;
use pocket_jot::fontdb::Database;
use pocket_jot::{ExportOptions, LayoutMeasurer, PageContent, Reflower, SvgRasterizer, Theme};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pjot", about = "Pocket booklet maker", version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter document
    Init {
        /// Markdown file to create
        #[arg(short, long, default_value = "pocket-jot.md")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show how a document is split into the 8 pages
    Pages {
        /// Input markdown file
        #[arg(short, long)]
        input: PathBuf,

        /// Split on separator lines instead of reflowing
        #[arg(long)]
        separators: bool,
    },

    /// Export a document as a printable booklet PDF
    Export {
        /// Input markdown file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file (defaults to the configured file name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export options JSON file; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Leave out the dashed fold guides
        #[arg(long)]
        no_fold_lines: bool,

        /// Draw a decorative border around the cover page
        #[arg(long)]
        highlight_cover: bool,

        /// Page color theme
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,

        /// Device pixels per CSS pixel when rasterizing pages
        #[arg(long)]
        pixel_ratio: Option<f32>,

        /// JPEG quality of the embedded page images (1-100)
        #[arg(long)]
        quality: Option<u8>,

        /// Split on separator lines instead of reflowing
        #[arg(long)]
        separators: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Self::Light,
            ThemeArg::Dark => Self::Dark,
        }
    }
}

/// Load system fonts off the async runtime
async fn load_fonts() -> Result<Arc<Database>> {
    Ok(tokio::task::spawn_blocking(pocket_jot::system_fonts).await?)
}

/// Read a document and split it into pages, measuring with `fonts`
async fn load_pages(
    input: &Path,
    separators: bool,
    fonts: &Arc<Database>,
) -> Result<Vec<PageContent>> {
    let text = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;

    if separators {
        let dropped = pocket_jot::overflow_sections(&text);
        if dropped > 0 {
            log::warn!("{} sections beyond page 8 were dropped", dropped);
        }
        return Ok(pocket_jot::parse_into_pages(&text));
    }

    let measurer = LayoutMeasurer::with_fonts(Arc::clone(fonts));
    let report = Reflower::new(measurer).reflow_report(&text)?;
    if report.dropped_lines > 0 {
        log::warn!(
            "{} lines did not fit in the booklet and were dropped",
            report.dropped_lines
        );
    }
    Ok(report.pages)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    match cli.command {
        Commands::Init { output, force } => {
            if !force && tokio::fs::try_exists(&output).await? {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    output.display()
                );
            }
            tokio::fs::write(&output, DEFAULT_CONTENT).await?;
            println!("Created {}", output.display());
        }

        Commands::Pages { input, separators } => {
            let fonts = load_fonts().await?;
            let pages = load_pages(&input, separators, &fonts).await?;
            for page in &pages {
                println!("=== Page {} ===", page.page_number);
                if page.is_empty() {
                    println!("(empty)");
                } else {
                    println!("{}", page.content);
                }
                println!();
            }
        }

        Commands::Export {
            input,
            output,
            config,
            no_fold_lines,
            highlight_cover,
            theme,
            pixel_ratio,
            quality,
            separators,
        } => {
            let mut options = match config {
                Some(path) => ExportOptions::load(&path)
                    .await
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => ExportOptions::default(),
            };
            if no_fold_lines {
                options.show_fold_lines = false;
            }
            if highlight_cover {
                options.highlight_cover = true;
            }
            if let Some(theme) = theme {
                options.theme = theme.into();
            }
            if let Some(ratio) = pixel_ratio {
                options.pixel_ratio = ratio;
            }
            if let Some(quality) = quality {
                options.jpeg_quality = quality;
            }

            let fonts = load_fonts().await?;
            let pages = load_pages(&input, separators, &fonts).await?;
            let output = output.unwrap_or_else(|| PathBuf::from(&options.file_name));

            let rasterizer = Arc::new(SvgRasterizer::with_fonts(fonts));
            let bytes = pocket_jot::generate_booklet(&pages, &options, rasterizer)
                .await
                .context("Failed to generate PDF")?;
            pocket_jot::save_pdf(&bytes, &output).await?;
            println!("Booklet → {}", output.display());
        }
    }

    Ok(())
}
