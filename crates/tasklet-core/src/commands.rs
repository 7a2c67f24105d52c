mod account;
mod browse;
mod tasks;

use std::sync::Arc;

use anyhow::anyhow;
use tracing::{debug, instrument};

use crate::cli::Command;
use crate::error::GatewayError;
use crate::gateway::HttpGateway;
use crate::render::Renderer;
use crate::session::{Session, SessionStore};

pub use browse::{BrowseInput, parse_browse_input};

/// Everything a command needs, loaded once per invocation.
pub struct Context {
    pub store: SessionStore,
    pub session: Option<Session>,
    pub gateway: Arc<HttpGateway>,
    pub renderer: Renderer,
    pub api_url: String,
}

impl Context {
    fn token(&self) -> anyhow::Result<&str> {
        self.session
            .as_ref()
            .and_then(Session::token)
            .ok_or_else(|| anyhow!(GatewayError::Unauthenticated))
    }
}

#[instrument(skip(ctx, command))]
pub async fn dispatch(ctx: &mut Context, command: Command) -> anyhow::Result<()> {
    debug!(?command, signed_in = ctx.session.is_some(), "dispatching command");

    match command {
        Command::Login { email, password } => account::cmd_login(ctx, &email, password).await,
        Command::Signup {
            name,
            email,
            password,
        } => account::cmd_signup(ctx, &name, &email, password).await,
        Command::Logout => account::cmd_logout(ctx),
        Command::Whoami => account::cmd_whoami(ctx),
        Command::List {
            search,
            filter,
            page,
        } => tasks::cmd_list(ctx, &search, filter, page).await,
        Command::Browse => browse::cmd_browse(ctx).await,
        Command::Show { id } => tasks::cmd_show(ctx, &id).await,
        Command::Add { name, description } => tasks::cmd_add(ctx, &name, &description).await,
        Command::Edit {
            id,
            name,
            description,
        } => tasks::cmd_edit(ctx, &id, name.as_deref(), description.as_deref()).await,
        Command::Toggle { id } => tasks::cmd_toggle(ctx, &id).await,
        Command::Delete { id } => tasks::cmd_delete(ctx, &id).await,
        Command::ClearCompleted => tasks::cmd_clear_completed(ctx).await,
        Command::Stats => tasks::cmd_stats(ctx).await,
    }
}

/// Logs the full error and turns it into the line a view would show.
fn inline_error(err: GatewayError, fallback: &str) -> anyhow::Error {
    tracing::error!(error = %err, status = ?err.status(), "command failed");
    anyhow!(err.user_message(fallback))
}
