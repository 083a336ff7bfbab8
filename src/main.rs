use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;

use relnotes::{extract_entries, PageContent, Strategy};

#[derive(Parser)]
#[command(name = "relnotes", about = "Extract normalized changelog entries from release-notes pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract entries from a local file (or stdin when no file is given)
    Extract {
        /// Page content; reads stdin when omitted
        file: Option<PathBuf>,
        /// Treat the input as raw HTML needing the fallback conversion
        #[arg(long)]
        html: bool,
        /// Segmentation strategy for the page's shape
        #[arg(short, long, value_enum, default_value_t = StrategyArg::Generic)]
        strategy: StrategyArg,
    },
    /// Fetch a page over HTTP and extract entries from it
    Fetch {
        /// Release-notes page URL
        url: String,
        /// Treat the response body as markdown instead of raw HTML
        #[arg(long)]
        markdown: bool,
        #[arg(short, long, value_enum, default_value_t = StrategyArg::Generic)]
        strategy: StrategyArg,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Generic,
    Anchor,
    Wildcard,
    Plain,
    WhatsNew,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Generic => Strategy::Generic,
            StrategyArg::Anchor => Strategy::AnchorHeadings,
            StrategyArg::Wildcard => Strategy::WildcardAnchor,
            StrategyArg::Plain => Strategy::PlainVersionHeadings,
            StrategyArg::WhatsNew => Strategy::DatedWhatsNew,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { file, html, strategy } => {
            let text = read_input(file.as_deref())?;
            let content = if html {
                PageContent::RawHtml(text)
            } else {
                PageContent::Markdown(text)
            };
            print_entries(&content, strategy.into())
        }
        Commands::Fetch { url, markdown, strategy } => {
            let body = reqwest::get(&url)
                .await
                .and_then(|r| r.error_for_status())
                .with_context(|| format!("fetching {url}"))?
                .text()
                .await
                .context("reading response body")?;
            let content = if markdown {
                PageContent::Markdown(body)
            } else {
                PageContent::RawHtml(body)
            };
            print_entries(&content, strategy.into())
        }
    }
}

fn read_input(file: Option<&std::path::Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn print_entries(content: &PageContent, strategy: Strategy) -> anyhow::Result<()> {
    let entries = extract_entries(content, strategy);
    if entries.is_empty() {
        // Normal outcome, not an error: the page just did not match.
        warn!("extraction found nothing");
    }
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
