//! rfpdf – print HTML to PDF with headless Chrome.
//!
//! Usage:
//!   rfpdf render <input.html|-> [-o out.pdf] [--size legal] [--orientation landscape]
//!   rfpdf sizes
//!   rfpdf serve [--addr 127.0.0.1:8088]

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::info;
use rfpdf::{
    DocumentRequest, MarginsOverride, OptionsOverride, Orientation, PageFormat, PageSize, PdfConfig,
    PdfGenerator, TemplateRef, TemplateRegistry,
};

#[derive(Parser)]
#[command(name = "rfpdf", version, about = "Print HTML to PDF with headless Chrome")]
struct Cli {
    /// JSON configuration file with generator defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Chrome binary (auto-detected when omitted)
    #[arg(long, global = true)]
    chrome: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render an HTML file (or `-` for stdin) to PDF
    Render(RenderArgs),
    /// List the supported page sizes
    Sizes,
    /// Serve `POST /pdf` over HTTP
    #[cfg(feature = "server")]
    Serve {
        #[arg(long, default_value = "127.0.0.1:8088")]
        addr: String,
    },
}

#[derive(Args)]
struct RenderArgs {
    input: PathBuf,

    /// Output path; defaults to the input stem with a `.pdf` extension
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    size: Option<String>,

    #[arg(long)]
    orientation: Option<String>,

    #[arg(long)]
    margin_top: Option<f64>,
    #[arg(long)]
    margin_right: Option<f64>,
    #[arg(long)]
    margin_bottom: Option<f64>,
    #[arg(long)]
    margin_left: Option<f64>,

    #[arg(long)]
    scale: Option<f64>,

    /// Skip background graphics
    #[arg(long)]
    no_background: bool,

    /// Directory holding header/footer templates
    #[arg(long)]
    views: Option<PathBuf>,

    /// Header template name (looked up in --views)
    #[arg(long, requires = "views")]
    header: Option<String>,

    /// Footer template name (looked up in --views)
    #[arg(long, requires = "views")]
    footer: Option<String>,

    /// JSON file with the data context for header/footer templates
    #[arg(long)]
    data: Option<PathBuf>,
}

impl RenderArgs {
    fn overrides(&self) -> OptionsOverride {
        OptionsOverride {
            page: rfpdf::options::PageOverride {
                size: self.size.clone(),
                orientation: self.orientation.clone(),
            },
            margins: MarginsOverride {
                top: self.margin_top,
                right: self.margin_right,
                bottom: self.margin_bottom,
                left: self.margin_left,
            },
            scale: self.scale,
            print_background: self.no_background.then_some(false),
            ..Default::default()
        }
    }

    fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(p) => p.clone(),
            None if self.input.as_os_str() == "-" => PathBuf::from("document.pdf"),
            None => self.input.with_extension("pdf"),
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<PdfConfig> {
    let mut config = match &cli.config {
        Some(path) => PdfConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => PdfConfig::default(),
    };
    if let Some(chrome) = &cli.chrome {
        config.chrome_path = Some(chrome.clone());
    }
    Ok(config)
}

fn render(config: PdfConfig, args: &RenderArgs) -> anyhow::Result<()> {
    let html = if args.input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(&args.input)
            .with_context(|| format!("reading {}", args.input.display()))?
    };

    let data = match &args.data {
        Some(path) => {
            let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
        }
        None => serde_json::json!({}),
    };

    let mut request = DocumentRequest::new(html).with_options(args.overrides());
    if let Some(name) = &args.header {
        request = request.with_header(TemplateRef::new(name.clone(), data.clone()));
    }
    if let Some(name) = &args.footer {
        request = request.with_footer(TemplateRef::new(name.clone(), data));
    }

    let mut generator = PdfGenerator::chrome(config)?;
    if let Some(dir) = &args.views {
        generator = generator.with_templates(TemplateRegistry::with_views_dir(dir));
    }

    let pdf = generator.generate(&request)?;
    let output = args.output_path();
    pdf.write_to(&output)
        .with_context(|| format!("writing {}", output.display()))?;
    info!("Wrote {} ({} bytes)", output.display(), pdf.len());
    println!("{}", output.display());

    generator.close()?;
    Ok(())
}

fn print_sizes() {
    println!("{:<8} {:>14} {:>14}", "size", "portrait (pt)", "landscape (pt)");
    for size in PageSize::ALL {
        let p = PageFormat::new(size, Orientation::Portrait);
        let l = PageFormat::new(size, Orientation::Landscape);
        println!(
            "{:<8} {:>14} {:>14}",
            size,
            format!("{}x{}", p.width, p.height),
            format!("{}x{}", l.width, l.height)
        );
    }
}

#[cfg(feature = "server")]
fn serve(config: PdfConfig, addr: &str) -> anyhow::Result<()> {
    let server = tiny_http::Server::http(addr).map_err(|e| anyhow::anyhow!("binding {}: {}", addr, e))?;
    let generator = PdfGenerator::chrome(config)?;
    info!("Listening on http://{}", addr);

    rfpdf::server::serve(&generator, &server);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Command::Render(args) => render(config, args),
        Command::Sizes => {
            print_sizes();
            Ok(())
        }
        #[cfg(feature = "server")]
        Command::Serve { addr } => serve(config, addr),
    }
}
