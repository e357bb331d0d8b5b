//! docsect CLI - section lookup and paging over document run streams

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use docsect::model::lines;
use docsect::{
    DocumentIndex, GateMarkers, JsonFileStore, JsonRunSource, Navigation, PageView, PaginatedText,
    RunSource, SessionOptions, SessionRegistry, SizeClass, StructureOptions, DEFAULT_PAGE_SIZE,
};

#[derive(Parser)]
#[command(name = "docsect")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Look up and page through sections of styled documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List detected headings
    Headings {
        /// Run stream JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Only titles containing this text (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,

        /// Maximum number of titles
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output as a JSON array
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        font: FontArgs,
    },

    /// Print a section
    Section {
        /// Run stream JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Exact section title
        #[arg(value_name = "TITLE")]
        title: String,

        /// Only print this page (1-based)
        #[arg(short, long)]
        page: Option<usize>,

        /// Page size in characters
        #[arg(long, env = "DOCSECT_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,

        #[command(flatten)]
        font: FontArgs,
    },

    /// Page through a section interactively
    Browse {
        /// Run stream JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Exact section title
        #[arg(value_name = "TITLE")]
        title: String,

        /// User the session belongs to
        #[arg(short, long, env = "DOCSECT_USER", default_value = "local")]
        user: String,

        /// Session state file
        #[arg(long, env = "DOCSECT_STATE", default_value = ".docsect-sessions.json")]
        state: PathBuf,

        /// Page size in characters
        #[arg(long, env = "DOCSECT_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,

        /// Seconds without input before the session closes
        #[arg(long, default_value_t = 60)]
        idle_timeout: u64,

        #[command(flatten)]
        font: FontArgs,
    },

    /// Show run stream statistics
    Info {
        /// Run stream JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        font: FontArgs,
    },
}

/// Font heuristics shared by every command.
#[derive(Args)]
struct FontArgs {
    /// Rounded font size of section headings
    #[arg(long, env = "DOCSECT_PRIMARY_SIZE", default_value_t = 30)]
    primary_size: u32,

    /// Rounded font size of glossary headings
    #[arg(long, env = "DOCSECT_SECONDARY_SIZE", default_value_t = 14)]
    secondary_size: u32,

    /// Heading font family must contain this (case-insensitive)
    #[arg(long, env = "DOCSECT_FONT_MATCH", default_value = "Arial")]
    font_match: String,

    /// Rounded font size of subheadings rendered in bold
    #[arg(long, env = "DOCSECT_SUBHEADING_SIZE", default_value_t = 14)]
    subheading_size: u32,

    /// Line that switches heading collection on
    #[arg(long, requires = "glossary_marker")]
    start_marker: Option<String>,

    /// Line that switches to glossary headings
    #[arg(long, requires = "start_marker")]
    glossary_marker: Option<String>,

    /// Rounded font size of the marker lines
    #[arg(long, default_value_t = 30)]
    marker_size: u32,
}

impl FontArgs {
    fn options(&self) -> StructureOptions {
        let options = StructureOptions::new()
            .with_primary_size(self.primary_size)
            .with_secondary_size(self.secondary_size)
            .with_font_match(self.font_match.as_str())
            .with_subheading_size(self.subheading_size);

        match (&self.start_marker, &self.glossary_marker) {
            (Some(start), Some(glossary)) => options.gated(GateMarkers::new(
                start.as_str(),
                glossary.as_str(),
                self.marker_size,
            )),
            _ => options,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Headings {
            input,
            filter,
            limit,
            json,
            font,
        } => cmd_headings(&input, filter.as_deref(), limit, json, &font),
        Commands::Section {
            input,
            title,
            page,
            page_size,
            font,
        } => cmd_section(&input, &title, page, page_size, &font),
        Commands::Browse {
            input,
            title,
            user,
            state,
            page_size,
            idle_timeout,
            font,
        } => cmd_browse(
            &input,
            &title,
            &user,
            &state,
            SessionOptions::new()
                .with_page_size(page_size)
                .with_idle_timeout(Duration::from_secs(idle_timeout)),
            &font,
        ),
        Commands::Info { input, font } => cmd_info(&input, &font),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn open_document(
    input: &Path,
    font: &FontArgs,
) -> Result<DocumentIndex, Box<dyn std::error::Error>> {
    let id = input
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let source: Arc<dyn RunSource> = Arc::new(JsonRunSource::new(input));
    Ok(DocumentIndex::try_load(id, source, font.options())?)
}

fn cmd_headings(
    input: &Path,
    filter: Option<&str>,
    limit: Option<usize>,
    json: bool,
    font: &FontArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = open_document(input, font)?;
    let titles = doc.suggestions(filter.unwrap_or_default(), limit.unwrap_or(usize::MAX));

    if json {
        println!("{}", serde_json::to_string_pretty(&titles)?);
        return Ok(());
    }

    if titles.is_empty() {
        println!("{}", "No headings found".yellow());
        return Ok(());
    }
    for title in &titles {
        let marker = match doc.headings().get(title).map(|h| h.size_class) {
            Some(SizeClass::Secondary) => "glossary".dimmed(),
            _ => "section".dimmed(),
        };
        println!("{} {}", title, marker);
    }
    println!(
        "\n{} of {} headings",
        titles.len().to_string().bold(),
        doc.headings().len()
    );

    Ok(())
}

fn cmd_section(
    input: &Path,
    title: &str,
    page: Option<usize>,
    page_size: usize,
    font: &FontArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = open_document(input, font)?;
    let Some(section) = doc.try_section(title)? else {
        report_missing(&doc, title);
        return Ok(());
    };

    println!("{}", section.display_title().cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let pages = PaginatedText::new(&section.body, page_size)?;
    match page {
        Some(number) => {
            let index = number
                .checked_sub(1)
                .ok_or("Page numbers start at 1")?;
            println!("{}", pages.page(index)?);
            println!("{}", format!("Page {}/{}", number, pages.page_count()).dimmed());
        }
        None => println!("{}", pages.text()),
    }

    Ok(())
}

fn cmd_browse(
    input: &Path,
    title: &str,
    user: &str,
    state: &Path,
    options: SessionOptions,
    font: &FontArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = open_document(input, font)?;
    let Some(section) = doc.try_section(title)? else {
        report_missing(&doc, title);
        return Ok(());
    };

    // A new revision of the document starts a new interaction
    let created_at: DateTime<Utc> = fs::metadata(input)?.modified()?.into();

    let store = Arc::new(JsonFileStore::open(state)?);
    let registry = SessionRegistry::new(options).with_store(store);
    let mut view = registry.open(user, title, &section.body, created_at)?;
    registry.touch(view.session, Utc::now())?;

    println!("{}", section.display_title().cyan().bold());
    print_page(&view);
    if !view.is_multi_page() {
        return Ok(());
    }

    let stdin = io::stdin();
    let mut input_lines = stdin.lock().lines();
    loop {
        print!("{} ", "[n]ext [p]rev [q]uit >".dimmed());
        io::stdout().flush()?;

        let Some(line) = input_lines.next() else {
            break;
        };
        let line = line?;

        if registry.expire_idle(Utc::now()).contains(&view.session) {
            println!("{}", "Session expired".yellow());
            break;
        }

        let navigation = match line.trim() {
            "n" | "next" => Navigation::Advance,
            "p" | "prev" => Navigation::Retreat,
            "q" | "quit" => break,
            other => {
                println!("{} {}", "Unknown command:".yellow(), other);
                registry.touch(view.session, Utc::now())?;
                continue;
            }
        };
        view = registry.navigate(view.session, navigation, Utc::now())?;
        print_page(&view);
    }

    registry.close(view.session);
    Ok(())
}

fn cmd_info(input: &Path, font: &FontArgs) -> Result<(), Box<dyn std::error::Error>> {
    let doc = open_document(input, font)?;
    let runs = doc.source().read_runs()?;

    println!("{}", "Run Stream Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let pages: BTreeSet<u32> = runs.iter().map(|r| r.page).collect();
    let line_count = lines(&runs).filter(|l| !l.is_blank()).count();

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Runs".bold(), runs.len());
    println!("{}: {}", "Lines".bold(), line_count);
    println!("{}: {}", "Pages".bold(), pages.len());

    println!();
    println!("{}", "Headings".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let headings = doc.headings().headings();
    let primary = headings
        .iter()
        .filter(|h| h.size_class == SizeClass::Primary)
        .count();

    println!("{}: {}", "Sections".bold(), primary);
    println!("{}: {}", "Glossary".bold(), headings.len() - primary);

    Ok(())
}

fn print_page(view: &PageView) {
    println!("{}", "─".repeat(40).dimmed());
    println!("{}", view.text);
    println!("{}", view.footer.dimmed());
}

fn report_missing(doc: &DocumentIndex, title: &str) {
    println!("{} '{}'", "No section titled".yellow(), title);
    let similar = doc.suggestions(title, 5);
    if !similar.is_empty() {
        println!("{}", "Did you mean:".dimmed());
        for s in similar {
            println!("  {} {}", "─".dimmed(), s);
        }
    }
}
