use std::io::Read;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use seo_analyzer::{AnalysisInput, FetchConfig, HttpFetcher, Report, UrlAnalysis};

#[derive(Parser)]
#[command(
    name = "seo-analyzer",
    about = "Check content against simple SEO heuristics for a primary keyword",
    version
)]
struct Cli {
    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze text given inline, from a file, or on stdin
    Text {
        /// Primary keyword
        #[arg(short, long, default_value = "")]
        keyword: String,

        /// Content to analyze
        #[arg(long, conflicts_with = "file")]
        content: Option<String>,

        /// File to analyze (reads stdin if neither this nor --content is given)
        file: Option<String>,
    },
    /// Fetch a web page and analyze its text
    Url {
        /// Primary keyword
        #[arg(short, long, default_value = "")]
        keyword: String,

        url: String,

        /// Request timeout in seconds
        #[arg(long, env = "SEO_ANALYZER_TIMEOUT")]
        timeout: Option<u64>,

        /// User-Agent header sent with the request
        #[arg(long, env = "SEO_ANALYZER_USER_AGENT")]
        user_agent: Option<String>,
    },
}

fn read_content(content: Option<String>, file: Option<String>) -> anyhow::Result<String> {
    if let Some(content) = content {
        return Ok(content);
    }
    match file {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("reading {path}")),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("reading stdin")?;
            Ok(input)
        }
    }
}

fn print_report(heading: &str, report: &Report) {
    println!("{heading}");
    for finding in &report.findings {
        println!("{finding}");
    }
}

fn print_url_analysis(analysis: &UrlAnalysis) {
    print_report("SEO Optimization Report (Web URL content):", &analysis.report);
    if analysis.suggestions.is_empty() {
        return;
    }
    println!();
    println!("SEO Suggestions:");
    for suggestion in &analysis.suggestions {
        println!("{suggestion}");
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    seo_analyzer::init_sentiment();

    match cli.command {
        Command::Text {
            keyword,
            content,
            file,
        } => {
            let text = read_content(content, file)?;
            let report = seo_analyzer::analyze_text(&AnalysisInput::new(text, keyword))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report("SEO Optimization Report (User-provided text):", &report);
            }
        }
        Command::Url {
            keyword,
            url,
            timeout,
            user_agent,
        } => {
            let mut config = FetchConfig::default();
            config.timeout = timeout.map(Duration::from_secs);
            if let Some(user_agent) = user_agent {
                config.user_agent = user_agent;
            }
            let fetcher = HttpFetcher::new(&config)?;
            let analysis = seo_analyzer::analyze_url(&fetcher, &url, &keyword);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_url_analysis(&analysis);
            }
        }
    }

    Ok(())
}
