//! Interactive session: the upload and history tabs behind one prompt.
//!
//! Commands only start work on the controllers. Output is driven by the
//! controllers' watch channels, so a result is printed when it is published
//! and a superseded result is never printed at all.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use resumeview_client::RecordRepository;
use resumeview_core::{Record, RecordId, Summary, ViewState};
use resumeview_flow::{DetailView, HistoryController, UploadController};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::display;

const HELP: &str = "\
Commands:
  tab [upload|history]   switch view (no argument toggles)
  drop <path>            analyze a PDF resume
  refresh                reload the history list
  open <id>              show the details of one resume
  close                  close the details
  retry                  repeat the last failed fetch
  help                   show this message
  quit                   leave the session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Upload,
    History,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Tab(Option<Tab>),
    Drop(PathBuf),
    Refresh,
    Open(RecordId),
    Close,
    Retry,
    Help,
    Quit,
}

/// Parse one input line. Blank lines parse to `None`.
fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let command = match (word, rest) {
        ("", _) => return Ok(None),
        ("tab", "") => Command::Tab(None),
        ("tab", "upload") => Command::Tab(Some(Tab::Upload)),
        ("tab", "history") => Command::Tab(Some(Tab::History)),
        ("tab", other) => return Err(format!("unknown tab: {other}")),
        ("drop", "") => return Err("usage: drop <path>".to_string()),
        ("drop", path) => Command::Drop(PathBuf::from(path)),
        ("refresh", "") => Command::Refresh,
        ("open", id) => match id.parse() {
            Ok(id) => Command::Open(id),
            Err(_) => return Err("usage: open <id>".to_string()),
        },
        ("close", "") => Command::Close,
        ("retry", "") => Command::Retry,
        ("help", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        _ => return Err(format!("unknown command: {line} (type `help`)")),
    };
    Ok(Some(command))
}

struct Session {
    tab: Tab,
    upload: UploadController,
    history: HistoryController,
}

impl Session {
    fn new(repo: Arc<dyn RecordRepository>) -> Self {
        Self {
            tab: Tab::Upload,
            upload: UploadController::new(Arc::clone(&repo)),
            history: HistoryController::new(repo),
        }
    }

    /// Show `tab`. The first history display starts the list fetch and
    /// returns its task.
    fn switch(&mut self, tab: Tab) -> Option<JoinHandle<()>> {
        self.tab = tab;
        println!("-- {} --", tab_name(tab));
        match tab {
            Tab::Upload => {
                print!("{}", upload_view(&self.upload.state()));
                None
            }
            Tab::History => {
                let task = self.history.ensure_loaded();
                if task.is_none() {
                    print!("{}", history_view(&self.history.state()));
                    print!("{}", detail_view(&self.history.detail().view()));
                }
                task
            }
        }
    }

    fn show(&mut self, tab: Tab) -> Option<JoinHandle<()>> {
        if self.tab == tab { None } else { self.switch(tab) }
    }

    /// Start the work for `command`, returning the task it spawned.
    ///
    /// Results reach the terminal through the watch channels, never through
    /// the task, so callers are free to drop it.
    async fn apply(&mut self, command: Command) -> Option<JoinHandle<()>> {
        match command {
            Command::Tab(tab) => {
                let next = tab.unwrap_or(match self.tab {
                    Tab::Upload => Tab::History,
                    Tab::History => Tab::Upload,
                });
                self.switch(next)
            }
            Command::Drop(path) => {
                self.show(Tab::Upload);
                self.upload.accept_path(&path).await
            }
            Command::Refresh => {
                // The fetch of a first display stands in for the refresh.
                self.show(Tab::History)
                    .or_else(|| Some(self.history.refresh()))
            }
            Command::Open(id) => {
                // The list fetch started by a first display runs on its own.
                drop(self.show(Tab::History));
                Some(self.history.select_detail(id))
            }
            Command::Close => {
                self.history.close_detail();
                None
            }
            Command::Retry => self
                .history
                .detail()
                .retry()
                .or_else(|| Some(self.history.refresh())),
            Command::Help => {
                println!("{HELP}");
                None
            }
            Command::Quit => None,
        }
    }
}

/// Run the session until `quit` or end of input.
pub async fn run(repo: Arc<dyn RecordRepository>) -> anyhow::Result<()> {
    let mut session = Session::new(repo);
    let mut upload_rx = session.upload.subscribe();
    let mut history_rx = session.history.subscribe();
    let mut detail_rx = session.history.detail().subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    session.switch(Tab::Upload);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading input")? else {
                    break;
                };
                match parse(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => drop(session.apply(command).await),
                    Ok(None) => {}
                    Err(message) => println!("{message}"),
                }
            }
            Ok(()) = upload_rx.changed() => {
                let state = upload_rx.borrow_and_update().clone();
                if session.tab == Tab::Upload {
                    print!("{}", upload_view(&state));
                }
            }
            Ok(()) = history_rx.changed() => {
                let state = history_rx.borrow_and_update().clone();
                if session.tab == Tab::History {
                    print!("{}", history_view(&state));
                }
            }
            Ok(()) = detail_rx.changed() => {
                let view = detail_rx.borrow_and_update().clone();
                if session.tab == Tab::History {
                    print!("{}", detail_view(&view));
                }
            }
        }
    }
    debug!("shell session ended");
    Ok(())
}

fn tab_name(tab: Tab) -> &'static str {
    match tab {
        Tab::Upload => "Upload Resume",
        Tab::History => "History",
    }
}

fn upload_view(state: &ViewState<Record>) -> String {
    match state {
        ViewState::Idle => {
            "Drop your resume here with `drop <path>` (PDF files only, max 10MB)\n".to_string()
        }
        ViewState::Loading => "Analyzing your resume...\n".to_string(),
        ViewState::Ready(record) => display::record_card("Analysis Complete!", record),
        ViewState::Failed(message) => format!("Upload Failed: {message}\n"),
    }
}

fn history_view(state: &ViewState<Vec<Summary>>) -> String {
    match state {
        ViewState::Idle => String::new(),
        ViewState::Loading => "Loading resume history...\n".to_string(),
        ViewState::Ready(summaries) => display::history_table(summaries),
        ViewState::Failed(message) => format!("{message}\nType `refresh` to try again.\n"),
    }
}

fn detail_view(view: &DetailView) -> String {
    let Some(id) = view.id else {
        return String::new();
    };
    match &view.state {
        ViewState::Idle => String::new(),
        ViewState::Loading => format!("Loading details for resume {id}...\n"),
        ViewState::Ready(record) => display::record_card("Resume Details", record),
        ViewState::Failed(message) if view.not_found() => {
            format!("Error Loading Details: {message} (id {id})\n")
        }
        ViewState::Failed(message) => {
            format!("Error Loading Details: {message}\nType `retry` to try again.\n")
        }
    }
}
