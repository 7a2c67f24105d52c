pub mod cli;
pub mod commands;
pub mod config;
pub mod debounce;
pub mod error;
pub mod gateway;
pub mod render;
pub mod session;
pub mod staging;
pub mod sync;
pub mod timer;

use std::ffi::OsString;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let pre = cli::preprocess_args(&raw_args)?;
    let cli = cli::GlobalCli::parse_from(pre.cleaned_args);

    let _log_guard = cli::init_tracing(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        "starting tasklet CLI"
    );
    debug!(?pre.rc_overrides, "preprocessed rc overrides");

    let mut cfg = config::Config::load(cli.tasklet_rc.as_deref())?;
    cfg.apply_overrides(
        pre.rc_overrides
            .into_iter()
            .chain(cli.rc_overrides.into_iter().map(|kv| (kv.key, kv.value))),
    );

    let data_dir = config::resolve_data_dir(&cfg, cli.data.as_deref())
        .context("failed to resolve data directory")?;
    let store = session::SessionStore::open(&data_dir)
        .with_context(|| format!("failed to open session store at {}", data_dir.display()))?;
    let session = store.load()?;

    let api_url = cfg.api_url(cli.api_url.as_deref());
    let gateway = gateway::HttpGateway::new(&api_url, cfg.http_timeout()?)?;
    let renderer = render::Renderer::new(&cfg)?;

    let mut ctx = commands::Context {
        store,
        session,
        gateway: Arc::new(gateway),
        renderer,
        api_url,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(commands::dispatch(
        &mut ctx,
        cli.command.unwrap_or_default(),
    ))?;

    info!("done");
    Ok(())
}
