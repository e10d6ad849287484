// catering-quote: Generate catering quotes, profit analyses and menus as PDF

use std::path::PathBuf;
use std::time::Duration;

use catering_quote::{
    fetch_logo, layout, render, CompanyProfile, DocumentKind, LayoutRecorder, QuoteError, QuoteFile,
    RenderOptions,
};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use env_logger::Env;

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate catering quotes as PDF")]
struct Args {
    /// Quote file (JSON with products, headcount, fixed costs and client data)
    #[arg(short, long)]
    input: PathBuf,

    /// Document kind
    #[arg(short, long, value_enum, default_value = "client")]
    kind: KindArg,

    /// File name for the document (defaults to a date-based name)
    #[arg(short, long)]
    name: Option<String>,

    /// Output path, overrides the suggested filename
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Logo image (file path or URL) to display in the header top-left
    #[arg(long)]
    logo: Option<String>,

    /// How long to wait for the logo before rendering without it
    #[arg(long, default_value = "2000")]
    logo_timeout_ms: u64,

    /// Company profile (JSON) replacing the built-in letterhead and boilerplate
    #[arg(long)]
    company: Option<PathBuf>,

    /// Date (YYYY-MM-DD format, defaults to today)
    #[arg(short, long)]
    date: Option<String>,

    /// Print the page layout instead of writing a PDF
    #[arg(long)]
    plan: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    /// Client-facing quote
    Client,
    /// Internal profit analysis
    Internal,
    /// Menu listing with prices
    Menu,
}

impl From<KindArg> for DocumentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Client => DocumentKind::ClientQuote,
            KindArg::Internal => DocumentKind::InternalAnalysis,
            KindArg::Menu => DocumentKind::MenuListing,
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), QuoteError> {
    let args = Args::parse();

    let date = parse_date(&args.date)?;
    let kind = DocumentKind::from(args.kind);
    let request = QuoteFile::load(&args.input)?.into_request(kind);
    // Fail before waiting on the logo.
    request.validate()?;

    let profile = match &args.company {
        Some(path) => CompanyProfile::load(path)?,
        None => CompanyProfile::default(),
    };

    let mut options = RenderOptions::new(date).profile(profile);
    if let Some(name) = &args.name {
        options = options.file_name(name);
    }

    if args.plan {
        let mut recorder = LayoutRecorder::new();
        layout(&request, &options, &mut recorder)?;
        print!("{}", recorder.describe());
        return Ok(());
    }

    if let Some(source) = &args.logo {
        let timeout = Duration::from_millis(args.logo_timeout_ms);
        options = options.logo(fetch_logo(source, timeout).into_logo());
    }

    let document = render(&request, &options)?;
    let output_file = args.output.unwrap_or_else(|| PathBuf::from(&document.filename));
    std::fs::write(&output_file, &document.bytes)?;

    println!("✓ Generated: {}", output_file.display());
    println!("  Document: {}", kind.title());
    println!("  Date: {}", date.format("%d/%m/%Y"));
    println!("  Items: {}", request.line_items.len());
    println!("  Pages: {}", document.page_count);

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_date(date_str: &Option<String>) -> Result<NaiveDate, QuoteError> {
    match date_str {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| QuoteError::Date(s.clone())),
        None => Ok(Local::now().date_naive()),
    }
}
