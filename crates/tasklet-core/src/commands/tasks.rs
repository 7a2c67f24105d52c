use std::sync::Arc;

use anyhow::{Context as _, anyhow};
use tasklet_shared::stats::TaskStats;
use tasklet_shared::view::{StatusFilter, TaskListState};
use tasklet_shared::{
    CREATE_TASK_FAILED, DELETE_TASK_FAILED, FETCH_TASK_FAILED, TaskCreate, UPDATE_STATUS_FAILED,
    UPDATE_TASK_FAILED, validate,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, instrument};

use super::{Context, inline_error};
use crate::gateway::TaskGateway;
use crate::staging::DeletionStager;
use crate::sync::TaskViewSync;

#[instrument(skip(ctx))]
pub(super) async fn cmd_list(
    ctx: &mut Context,
    search: &str,
    filter: StatusFilter,
    page: u32,
) -> anyhow::Result<()> {
    let token = ctx.token()?;

    let mut state = TaskListState::default();
    state.set_search(search);
    state.set_filter(filter);
    state.set_page(page);

    let sync = TaskViewSync::with_state(Arc::clone(&ctx.gateway), Some(token), state);
    sync.refresh()
        .await
        .map_err(|err| inline_error(err, FETCH_TASK_FAILED))?;

    sync.inspect(|state| ctx.renderer.print_task_list(state))
}

#[instrument(skip(ctx))]
pub(super) async fn cmd_show(ctx: &mut Context, id: &str) -> anyhow::Result<()> {
    let token = ctx.token()?;
    let task = ctx
        .gateway
        .get(token, id)
        .await
        .map_err(|err| inline_error(err, FETCH_TASK_FAILED))?;
    ctx.renderer.print_task_info(&task)
}

#[instrument(skip(ctx, description))]
pub(super) async fn cmd_add(
    ctx: &mut Context,
    name: &str,
    description: &str,
) -> anyhow::Result<()> {
    let draft = validate::task_draft(name, description)?;
    let token = ctx.token()?;

    ctx.gateway
        .create(token, &TaskCreate::from(draft))
        .await
        .map_err(|err| {
            let fallback = err.gateway_message().unwrap_or(CREATE_TASK_FAILED).to_string();
            inline_error(err, &fallback)
        })?;

    info!("task created");
    println!("Task created.");
    Ok(())
}

#[instrument(skip(ctx, name, description))]
pub(super) async fn cmd_edit(
    ctx: &mut Context,
    id: &str,
    name: Option<&str>,
    description: Option<&str>,
) -> anyhow::Result<()> {
    if name.is_none() && description.is_none() {
        return Err(anyhow!("nothing to change; pass --name and/or --description"));
    }
    let token = ctx.token()?;

    let current = ctx
        .gateway
        .get(token, id)
        .await
        .map_err(|err| inline_error(err, FETCH_TASK_FAILED))?;

    let draft = validate::task_draft(
        name.unwrap_or(&current.name),
        description.unwrap_or(&current.description),
    )?;
    let updated = current.with_details(&draft);

    ctx.gateway
        .update(token, &updated)
        .await
        .map_err(|err| inline_error(err, UPDATE_TASK_FAILED))?;

    info!("task updated");
    ctx.renderer.print_task_info(&updated)
}

#[instrument(skip(ctx))]
pub(super) async fn cmd_toggle(ctx: &mut Context, id: &str) -> anyhow::Result<()> {
    let token = ctx.token()?;
    let current = ctx
        .gateway
        .get(token, id)
        .await
        .map_err(|err| inline_error(err, FETCH_TASK_FAILED))?;

    let toggled = current.toggled();
    ctx.gateway
        .update(token, &toggled)
        .await
        .map_err(|err| inline_error(err, UPDATE_STATUS_FAILED))?;

    info!(status = toggled.status, "task status toggled");
    println!("{} is now {}.", toggled.name, toggled.status_label());
    Ok(())
}

/// Stages the delete, then waits for Enter (undo), Ctrl-C or the end of the
/// undo window. Ctrl-C after the window waits for the request to finish.
#[instrument(skip(ctx))]
pub(super) async fn cmd_delete(ctx: &mut Context, id: &str) -> anyhow::Result<()> {
    let token = ctx.token()?;
    let task = ctx
        .gateway
        .get(token, id)
        .await
        .map_err(|err| inline_error(err, FETCH_TASK_FAILED))?;

    let mut stager = DeletionStager::new(Arc::clone(&ctx.gateway), Some(token));
    stager.stage(&task.id)?;
    println!(
        "Deleting \"{}\" in {}s. Press Enter to undo.",
        task.name,
        stager.window().as_secs()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    loop {
        tokio::select! {
            staging = stager.settled() => {
                if staging.is_committed() {
                    println!("Task deleted.");
                    return Ok(());
                }
                return Err(anyhow!(
                    staging.error().unwrap_or(DELETE_TASK_FAILED).to_string()
                ));
            }
            line = lines.next_line(), if stdin_open => {
                match line.context("failed to read stdin")? {
                    Some(_) => {
                        if stager.undo() {
                            println!("Deletion undone.");
                            return Ok(());
                        }
                        println!("Too late to undo; the delete is already in flight.");
                    }
                    None => stdin_open = false,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                let staging = stager.close().await;
                if staging.is_committed() {
                    println!("Interrupted after the undo window; task deleted.");
                    return Ok(());
                }
                if let Some(error) = staging.error() {
                    return Err(anyhow!(error.to_string()));
                }
                println!("Interrupted; deletion cancelled.");
                return Ok(());
            }
        }
    }
}

#[instrument(skip(ctx))]
pub(super) async fn cmd_clear_completed(ctx: &mut Context) -> anyhow::Result<()> {
    let token = ctx.token()?;
    let sync = TaskViewSync::new(Arc::clone(&ctx.gateway), Some(token));
    let summary = sync
        .remove_completed()
        .await
        .map_err(|err| inline_error(err, FETCH_TASK_FAILED))?;

    println!("Removed {} completed task(s).", summary.removed());
    if summary.failed > 0 {
        println!("{} could not be removed.", summary.failed);
    }
    Ok(())
}

#[instrument(skip(ctx))]
pub(super) async fn cmd_stats(ctx: &mut Context) -> anyhow::Result<()> {
    let token = ctx.token()?;
    let tasks = ctx
        .gateway
        .list(token, None)
        .await
        .map_err(|err| inline_error(err, FETCH_TASK_FAILED))?;

    ctx.renderer.print_stats(&TaskStats::from_tasks(&tasks))
}
