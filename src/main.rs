use anyhow::Context;
use clap::Parser;
use docstage::{
    AppConfig, ConvertOptions, DocxPackage, EstimatingMeasurer, check_quality, convert_to_html, load_callouts,
    restyle_document,
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix appended to the input stem for default output names.
const OUTPUT_SUFFIX: &str = "_backstage";

#[derive(Parser, Debug)]
#[command(version, about = "Restyles a .docx report and renders it as paginated HTML", long_about = None)]
struct Args {
    /// The .docx document to convert
    input: PathBuf,

    /// Write the paginated HTML report here
    #[arg(long, value_name = "OUT.html")]
    html: Option<PathBuf>,

    /// Write the restyled document here
    #[arg(long, value_name = "OUT.docx")]
    docx: Option<PathBuf>,

    /// Cover title (defaults to the first Heading 1)
    #[arg(long)]
    title: Option<String>,

    /// Document type shown above the cover title
    #[arg(long, default_value = "RAPPORT")]
    caption: String,

    /// Short description for the cover
    #[arg(long)]
    description: Option<String>,

    /// Date shown on the cover, e.g. "Februar 2026"
    #[arg(long)]
    date: Option<String>,

    /// JSON array of paragraph openings to render as callout boxes
    #[arg(long, value_name = "FILE")]
    callouts: Option<PathBuf>,

    /// JSON configuration overriding page geometry, pagination and identity
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Append a back page after the content
    #[arg(long, default_value_t = false)]
    back_page: bool,

    /// Also write the quality report as JSON
    #[arg(long, value_name = "FILE")]
    qc_json: Option<PathBuf>,
}

fn default_output(input: &Path, extension: &str) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    input.with_file_name(format!("{stem}{OUTPUT_SUFFIX}.{extension}"))
}

fn main() -> anyhow::Result<()> {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    let args = Args::parse();

    let (html_out, docx_out) = match (&args.html, &args.docx) {
        (None, None) => (Some(default_output(&args.input, "html")), Some(default_output(&args.input, "docx"))),
        (html, docx) => (html.clone(), docx.clone()),
    };

    let config = match &args.config {
        Some(path) => AppConfig::from_file(path).with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::default(),
    };
    let callouts = match &args.callouts {
        Some(path) => load_callouts(path).with_context(|| format!("loading {}", path.display()))?,
        None => Vec::new(),
    };

    let package = DocxPackage::open(&args.input).with_context(|| format!("opening {}", args.input.display()))?;
    let blocks = package.read_blocks().with_context(|| format!("reading {}", args.input.display()))?;

    if let Some(path) = &html_out {
        let mut options = ConvertOptions::new()
            .with_caption(args.caption.as_str())
            .with_callouts(callouts)
            .with_back_page(args.back_page);
        options.title = args.title.clone();
        options.cover_description = args.description.clone();
        options.cover_date = args.date.clone();

        let measurer = EstimatingMeasurer::new(config.identity.clone());
        let output = convert_to_html(&blocks, &options, &measurer, &config);
        fs::write(path, &output.html).with_context(|| format!("writing {}", path.display()))?;
        println!("✓ HTML report: {} ({} pages)", path.display(), output.pages.len());

        let report = check_quality(&blocks, &output.html);
        println!("{report}");
        if let Some(qc_path) = &args.qc_json {
            let json = serde_json::to_string_pretty(&report)?;
            fs::write(qc_path, json).with_context(|| format!("writing {}", qc_path.display()))?;
        }
    }

    if let Some(path) = &docx_out {
        let bytes = restyle_document(&package, &config)?;
        fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        println!("✓ Restyled document: {}", path.display());
    }

    Ok(())
}
