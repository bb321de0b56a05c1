//! mdpdf CLI - render markdown to PDF
//!
//! Usage:
//!   mdpdf notes.md                     # writes notes.pdf
//!   mdpdf notes.md -o out.pdf --page-size letter --margin wide
//!   cat notes.md | mdpdf - -o out.pdf
//!   mdpdf tree.json --tree -o out.pdf  # pre-parsed node tree

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use mdpdf::config::RenderConfig;
use mdpdf::error::{RenderError, Result};
use mdpdf::font::FontRole;
use mdpdf::layout::LayoutInfo;
use mdpdf::model::{DocumentNode, MarginSize, Orientation, PageSize};
use mdpdf::Renderer;

#[derive(Parser)]
#[command(name = "mdpdf")]
#[command(version)]
#[command(about = "Render markdown to paginated PDF", long_about = None)]
struct Cli {
    /// Input markdown file, or "-" for stdin
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output PDF file (defaults to the input name with a .pdf extension)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// JSON render config
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Page size
    #[arg(long, value_enum)]
    page_size: Option<PageSizeArg>,

    /// Margin preset (compact, normal, wide) or a number of points
    #[arg(long, value_parser = parse_margin)]
    margin: Option<MarginSize>,

    /// Landscape orientation
    #[arg(long)]
    landscape: bool,

    /// Document title for the PDF metadata
    #[arg(long)]
    title: Option<String>,

    /// TrueType font for code listings
    #[arg(long, value_name = "FILE")]
    code_font: Option<PathBuf>,

    /// Treat the input as a JSON document tree instead of markdown
    #[arg(long)]
    tree: bool,

    /// Print a JSON summary of the page layout to stdout
    #[arg(long)]
    layout_json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PageSizeArg {
    A3,
    A4,
    A5,
    Letter,
}

impl From<PageSizeArg> for PageSize {
    fn from(arg: PageSizeArg) -> Self {
        match arg {
            PageSizeArg::A3 => PageSize::A3,
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::A5 => PageSize::A5,
            PageSizeArg::Letter => PageSize::Letter,
        }
    }
}

fn parse_margin(value: &str) -> std::result::Result<MarginSize, String> {
    MarginSize::from_name(value).ok_or_else(|| format!("unknown margin '{value}'"))
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;
    let renderer = Renderer::from_config(&config)?;

    let source = read_input(&cli.input)?;
    let document = if cli.tree {
        DocumentNode::from_json(&source)?
    } else {
        mdpdf::parse_markdown(&source)?
    };

    // Lay out before touching the output so a failed render leaves no file.
    let pages = renderer.layout(&document)?;
    if cli.layout_json {
        let info = LayoutInfo::from_pages(&pages, &renderer.spec().geometry());
        let json = serde_json::to_string_pretty(&info)
            .map_err(|e| RenderError::Input(format!("cannot serialize layout: {e}")))?;
        println!("{}", json);
    }

    let output_path = output_path(&cli.input, cli.output.as_deref());
    renderer.write_file(&pages, &output_path)?;

    eprintln!(
        "Wrote {} page(s) to {}",
        pages.len(),
        output_path.display()
    );
    Ok(())
}

/// Config file values first, then command line flags on top.
fn build_config(cli: &Cli) -> Result<RenderConfig> {
    let mut config = match &cli.config {
        Some(path) => RenderConfig::from_file(path)?,
        None => RenderConfig::default(),
    };
    if let Some(size) = cli.page_size {
        config.page.page_size = size.into();
    }
    if let Some(margin) = cli.margin {
        config.page.margin = margin;
    }
    if cli.landscape {
        config.page.orientation = Orientation::Landscape;
    }
    if let Some(title) = &cli.title {
        config.metadata.title = Some(title.clone());
    }
    if let Some(font) = &cli.code_font {
        config.fonts.code = Some(font.clone());
    }
    log::debug!(
        "page {:?}, code font {:?}",
        config.page,
        config.fonts.get(FontRole::Code)
    );
    Ok(config)
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| RenderError::Input(format!("cannot read stdin: {e}")))?;
        return Ok(buf);
    }
    fs::read_to_string(path).map_err(|e| RenderError::Input(format!("cannot read {}: {e}", path.display())))
}

fn output_path(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None if input.as_os_str() == "-" => PathBuf::from("output.pdf"),
        None => input.with_extension("pdf"),
    }
}
