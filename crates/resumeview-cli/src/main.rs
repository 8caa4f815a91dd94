//! resumeview: terminal client for the resume analysis service.

mod display;
mod shell;

#[cfg(test)]
mod testing;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use resumeview_client::http::DEFAULT_BASE_URL;
use resumeview_client::{ClientConfig, HttpRepository, RecordRepository};
use resumeview_core::{RecordId, ViewState};
use resumeview_flow::{DetailController, DetailView, HistoryController, UploadController};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "resumeview", version, about = "Upload resumes for analysis and browse the results")]
struct Cli {
    /// Base URL of the analysis service
    #[arg(long, global = true, env = "RESUMEVIEW_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Give up on a request after this many seconds
    #[arg(long, global = true, env = "RESUMEVIEW_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Log at info level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a PDF resume and print the result
    Upload {
        /// Path to the resume
        path: PathBuf,
    },
    /// List every analyzed resume
    History {
        /// Also show the details of this resume
        #[arg(long)]
        open: Option<RecordId>,
    },
    /// Show the details of one resume
    Show { id: RecordId },
    /// Check that the service is reachable
    Ping,
    /// Interactive session with upload and history tabs
    Shell,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    info!(api_url = %cli.api_url, "resumeview v{}", env!("CARGO_PKG_VERSION"));

    let http = Arc::new(HttpRepository::new(cli.client_config()).context("building HTTP client")?);
    let repo: Arc<dyn RecordRepository> = http.clone();

    match cli.command {
        Command::Upload { path } => {
            let upload = UploadController::new(repo);
            if let Some(task) = upload.accept_path(&path).await {
                task.await.context("upload task")?;
            }
            match upload.state() {
                ViewState::Ready(record) => display::print_record_card("Analysis Complete!", &record),
                ViewState::Failed(message) => bail!("Upload Failed: {message}"),
                state => bail!("upload did not finish: {state:?}"),
            }
        }
        Command::History { open } => {
            let history = HistoryController::new(repo);
            show_history(&history, open).await?;
        }
        Command::Show { id } => {
            let detail = DetailController::new(repo);
            detail.load(id).await.context("detail task")?;
            print_detail(detail.view())?;
        }
        Command::Ping => {
            let status = http
                .health()
                .await
                .with_context(|| format!("contacting {}", http.base_url()))?;
            println!("{} is {status}", http.base_url());
        }
        Command::Shell => shell::run(repo).await?,
    }
    Ok(())
}

/// Print the list, then the detail for `open` whatever became of the list.
async fn show_history(history: &HistoryController, open: Option<RecordId>) -> anyhow::Result<()> {
    let detail = open.map(|id| history.select_detail(id));
    if let Some(task) = history.ensure_loaded() {
        task.await.context("history task")?;
    }
    let list_failure = match history.state() {
        ViewState::Ready(summaries) => {
            display::print_history(&summaries);
            None
        }
        ViewState::Failed(message) => Some(message),
        state => Some(format!("history did not finish: {state:?}")),
    };
    if let Some(task) = detail {
        task.await.context("detail task")?;
        println!();
        print_detail(history.detail().view())?;
    }
    match list_failure {
        Some(message) => bail!("{message}"),
        None => Ok(()),
    }
}

fn print_detail(view: DetailView) -> anyhow::Result<()> {
    match view.state {
        ViewState::Ready(record) => {
            display::print_record_card("Resume Details", &record);
            Ok(())
        }
        ViewState::Failed(message) => bail!("Error Loading Details: {message}"),
        state => bail!("detail did not finish: {state:?}"),
    }
}
