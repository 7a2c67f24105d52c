use anyhow::{Context as _, anyhow};
use tasklet_shared::{LOGIN_FAILED, SIGNUP_FAILED, validate};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, instrument, warn};

use super::Context;
use crate::session::Session;

#[instrument(skip(ctx, password))]
pub(super) async fn cmd_login(
    ctx: &mut Context,
    email: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => read_password().await?,
    };
    let request = validate::login(email, &password)?;

    let user = match ctx.gateway.login(&request).await {
        Ok(user) if user.bearer().is_some() => user,
        Ok(_) => {
            warn!("login answer carried no token");
            return Err(anyhow!(LOGIN_FAILED));
        }
        Err(err) => {
            warn!(error = %err, "login rejected");
            return Err(anyhow!(LOGIN_FAILED));
        }
    };

    let session = Session::new(user, &ctx.api_url);
    ctx.store.save(&session)?;
    let display = if session.user.name.is_empty() {
        session.user.email.clone()
    } else {
        session.user.name.clone()
    };
    ctx.session = Some(session);

    info!("signed in");
    println!("Signed in as {display}.");
    Ok(())
}

#[instrument(skip(ctx, password))]
pub(super) async fn cmd_signup(
    ctx: &mut Context,
    name: &str,
    email: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => read_password().await?,
    };
    let request = validate::signup(name, email, &password)?;

    match ctx.gateway.register(&request).await {
        Ok(message) => {
            info!("account created");
            println!(
                "{}",
                message.unwrap_or_else(|| "User registered successfully".to_string())
            );
            println!("Sign in with `tasklet login --email {email}`.");
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, "signup rejected");
            let message = err.gateway_message().unwrap_or(SIGNUP_FAILED);
            Err(anyhow!(message.to_string()))
        }
    }
}

pub(super) fn cmd_logout(ctx: &mut Context) -> anyhow::Result<()> {
    if ctx.store.clear()? {
        println!("Signed out.");
    } else {
        println!("Not signed in.");
    }
    ctx.session = None;
    Ok(())
}

pub(super) fn cmd_whoami(ctx: &mut Context) -> anyhow::Result<()> {
    match &ctx.session {
        Some(session) => {
            println!("{} <{}>", session.user.name, session.user.email);
            println!("gateway {}", session.api_url);
            println!("since   {}", session.created.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        None => println!("Not signed in."),
    }
    Ok(())
}

async fn read_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
