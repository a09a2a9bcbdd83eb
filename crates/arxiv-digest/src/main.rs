//! arxiv-digest - Entry Point
//!
//! `fetch` collects papers and writes the dated digest, `publish` splits it
//! into topic folders on the publish branch, `page` renders the static page.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use arxiv_digest::{
    ArxivClient, Config,
    pipeline::{run_fetch, run_page},
    publish::{CommitOutcome, Publisher, SystemRunner},
};

#[derive(Parser, Debug)]
#[command(name = "arxiv-digest")]
#[command(about = "Topic-based arXiv digest with per-topic publishing")]
#[command(version)]
struct Cli {
    /// Repository root holding topics.yml, topic.json and the digests
    #[arg(long, global = true, env = "ARXIV_DIGEST_ROOT")]
    root: Option<PathBuf>,

    /// Run date (YYYY-MM-DD), defaults to today
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search arXiv for every profile and write the dated digest
    Fetch {
        /// Topic profile file
        #[arg(long)]
        topics: Option<PathBuf>,

        /// arXiv query endpoint
        #[arg(long, env = "ARXIV_API_URL")]
        api_url: Option<String>,

        /// Where to write the merged paper collection
        #[arg(long)]
        papers: Option<PathBuf>,
    },

    /// Write each topic's section of the latest digest and push it
    Publish {
        /// Publish branch
        #[arg(long, env = "ARXIV_DIGEST_BRANCH")]
        branch: Option<String>,

        /// Remote to pull from and push to
        #[arg(long)]
        remote: Option<String>,

        /// Branch to read the topic registry from
        #[arg(long, conflicts_with = "no_source_branch")]
        source_branch: Option<String>,

        /// Read the topic registry from the current working tree
        #[arg(long)]
        no_source_branch: bool,

        /// Topic registry file
        #[arg(long)]
        registry: Option<PathBuf>,
    },

    /// Render index.html from the latest digest
    Page {
        /// Output directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn base_config(root: Option<PathBuf>) -> anyhow::Result<Config> {
    match root {
        Some(root) => Ok(Config::new(root).with_env_overrides()),
        None => Config::from_env(),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = base_config(cli.root)?;
    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());

    match cli.command {
        Command::Fetch { topics, api_url, papers } => {
            if let Some(topics) = topics {
                config.topics_path = topics;
            }
            if let Some(url) = api_url {
                config.api_url = url;
            }
            if let Some(papers) = papers {
                config.papers_path = papers;
            }

            let client = ArxivClient::new(&config)?;
            let report = run_fetch(&config, &client, date).await?;
            for (topic, count) in &report.per_topic {
                tracing::info!(topic = %topic, papers = count, "Topic collected");
            }
            tracing::info!(
                unique = report.unique_papers,
                papers = %report.papers_path.display(),
                digest = %report.digest_path.display(),
                "Fetch complete"
            );
        }
        Command::Publish { branch, remote, source_branch, no_source_branch, registry } => {
            if let Some(branch) = branch {
                config.publish_branch = branch;
            }
            if let Some(remote) = remote {
                config.remote = remote;
            }
            if no_source_branch {
                config.source_branch = None;
            } else if source_branch.is_some() {
                config.source_branch = source_branch;
            }
            if let Some(registry) = registry {
                config.registry_path = registry;
            }

            let report = Publisher::new(config, SystemRunner).run(date).await?;
            let missing: Vec<&str> = report.missing_topics().collect();
            tracing::info!(
                branch = %report.branch,
                created = report.branch_created,
                digest = %report.digest_path.display(),
                topics = report.topics.len(),
                missing = ?missing,
                committed = report.commit == CommitOutcome::Committed,
                "Publish complete"
            );
        }
        Command::Page { out } => {
            if let Some(out) = out {
                config.page_dir = out;
            }
            let path = run_page(&config, Local::now().naive_local())?;
            tracing::info!(path = %path.display(), "Page complete");
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        command = ?cli.command,
        "Starting arxiv-digest"
    );

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            ExitCode::FAILURE
        }
    }
}
