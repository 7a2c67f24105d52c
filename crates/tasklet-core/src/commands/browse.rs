use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use tasklet_shared::view::{FetchOutcome, StatusFilter};
use tasklet_shared::{FETCH_TASK_FAILED, SEARCH_DEBOUNCE_MS, UPDATE_STATUS_FAILED};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, instrument};

use super::Context;
use crate::debounce::Debounced;
use crate::error::GatewayError;
use crate::gateway::HttpGateway;
use crate::sync::TaskViewSync;

const HELP: &str = "\
commands:
  / TEXT        search (applied after a short pause)
  filter F      all, active or completed
  next, prev    change page
  toggle N      flip the task in row N
  clear         remove all completed tasks
  refresh       fetch the page again
  help          show this text
  quit          leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseInput {
    Search(String),
    Filter(StatusFilter),
    Next,
    Prev,
    Toggle(usize),
    ClearCompleted,
    Refresh,
    Help,
    Quit,
    Invalid(String),
}

pub fn parse_browse_input(line: &str) -> BrowseInput {
    if let Some(text) = line.trim_start().strip_prefix('/') {
        return BrowseInput::Search(text.trim().to_string());
    }

    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    match word.to_ascii_lowercase().as_str() {
        "filter" | "f" => match StatusFilter::from_key(rest) {
            Some(filter) => BrowseInput::Filter(filter),
            None => BrowseInput::Invalid(format!("unknown filter `{rest}`")),
        },
        "next" | "n" => BrowseInput::Next,
        "prev" | "p" => BrowseInput::Prev,
        "toggle" | "t" => match rest.parse::<usize>() {
            Ok(row) if row > 0 => BrowseInput::Toggle(row),
            _ => BrowseInput::Invalid(format!("expected a row number, got `{rest}`")),
        },
        "clear" => BrowseInput::ClearCompleted,
        "refresh" | "r" | "" => BrowseInput::Refresh,
        "help" | "?" => BrowseInput::Help,
        "quit" | "q" | "exit" => BrowseInput::Quit,
        other => BrowseInput::Invalid(format!("unknown command `{other}`; try `help`")),
    }
}

/// Interactive task list driven by stdin lines. Search text goes through
/// the debouncer; everything else acts immediately.
#[instrument(skip(ctx))]
pub(super) async fn cmd_browse(ctx: &mut Context) -> anyhow::Result<()> {
    let token = ctx.token()?;
    let sync = TaskViewSync::new(Arc::clone(&ctx.gateway), Some(token));
    let (mut search, mut settled_search) =
        Debounced::new(String::new(), Duration::from_millis(SEARCH_DEBOUNCE_MS));

    report(sync.refresh().await.map(Some), FETCH_TASK_FAILED);
    render(ctx, &sync)?;
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                let input = parse_browse_input(&line);
                debug!(?input, "browse input");
                match input {
                    BrowseInput::Search(text) => search.set(text),
                    BrowseInput::Filter(filter) => {
                        sync.set_filter(filter);
                        render(ctx, &sync)?;
                    }
                    BrowseInput::Next => {
                        if report(sync.next_page().await, FETCH_TASK_FAILED) {
                            render(ctx, &sync)?;
                        } else {
                            println!("Already on the last page.");
                        }
                    }
                    BrowseInput::Prev => {
                        if report(sync.prev_page().await, FETCH_TASK_FAILED) {
                            render(ctx, &sync)?;
                        } else {
                            println!("Already on the first page.");
                        }
                    }
                    BrowseInput::Toggle(row) => {
                        toggle_row(&sync, row).await;
                        render(ctx, &sync)?;
                    }
                    BrowseInput::ClearCompleted => {
                        println!("Removing completed tasks...");
                        match sync.remove_completed().await {
                            Ok(summary) => {
                                println!("Removed {} completed task(s).", summary.removed());
                            }
                            Err(err) => eprintln!("error: {}", err.user_message(FETCH_TASK_FAILED)),
                        }
                        render(ctx, &sync)?;
                    }
                    BrowseInput::Refresh => {
                        report(sync.refresh().await.map(Some), FETCH_TASK_FAILED);
                        render(ctx, &sync)?;
                    }
                    BrowseInput::Help => println!("{HELP}"),
                    BrowseInput::Quit => break,
                    BrowseInput::Invalid(message) => eprintln!("{message}"),
                }
            }
            changed = settled_search.changed() => {
                if changed.is_err() {
                    break;
                }
                let text = settled_search.borrow_and_update().clone();
                if report(sync.set_search(&text).await, FETCH_TASK_FAILED) {
                    render(ctx, &sync)?;
                }
            }
        }
    }

    Ok(())
}

async fn toggle_row(sync: &TaskViewSync<HttpGateway>, row: usize) {
    let id = sync.inspect(|state| {
        state
            .visible()
            .get(row - 1)
            .map(|task| task.id.clone())
    });
    let Some(id) = id else {
        eprintln!("No task in row {row}.");
        return;
    };
    if let Err(err) = sync.toggle(&id).await {
        eprintln!("error: {}", err.user_message(UPDATE_STATUS_FAILED));
    }
}

/// Prints an inline error and returns whether the list should be redrawn.
fn report(result: Result<Option<FetchOutcome>, GatewayError>, fallback: &str) -> bool {
    match result {
        Ok(Some(FetchOutcome::Applied)) => true,
        Ok(Some(FetchOutcome::Stale | FetchOutcome::Skipped)) | Ok(None) => false,
        Err(err) => {
            eprintln!("error: {}", err.user_message(fallback));
            true
        }
    }
}

fn render(ctx: &Context, sync: &TaskViewSync<HttpGateway>) -> anyhow::Result<()> {
    println!();
    sync.inspect(|state| ctx.renderer.print_task_list(state))
}
