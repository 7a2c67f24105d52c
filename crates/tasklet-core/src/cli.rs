use std::ffi::OsString;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use tasklet_shared::view::StatusFilter;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Clone)]
pub struct PreprocessedArgs {
    pub cleaned_args: Vec<OsString>,
    pub rc_overrides: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tasklet",
    version,
    about = "Tasklet: a terminal client for the tasklet task gateway",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append,
        global = true
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "tasklet-rc", global = true)]
    pub tasklet_rc: Option<PathBuf>,

    #[arg(long = "data", global = true)]
    pub data: Option<PathBuf>,

    /// Gateway base URL; overrides `api.url`.
    #[arg(long = "api-url", env = "TASKLET_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Also write logs to this file.
    #[arg(long = "log-file", env = "TASKLET_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Sign in and store the session token.
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session.
    Logout,
    Whoami,
    /// Print one page of tasks.
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, value_parser = parse_filter, default_value = "all")]
        filter: StatusFilter,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Interactive task list.
    Browse,
    Show {
        id: String,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Flip a task between active and completed.
    Toggle {
        id: String,
    },
    /// Delete a task after a short undo window.
    Delete {
        id: String,
    },
    /// Delete every completed task.
    ClearCompleted,
    Stats,
}

impl Default for Command {
    fn default() -> Self {
        Self::List {
            search: String::new(),
            filter: StatusFilter::All,
            page: 1,
        }
    }
}

pub fn parse_filter(raw: &str) -> Result<StatusFilter, String> {
    StatusFilter::from_key(raw)
        .ok_or_else(|| format!("unknown filter `{raw}`; expected all, active or completed"))
}

/// Installs the stderr subscriber and, with `log_file`, a non-blocking file
/// layer. The returned guard must live until exit so the file is flushed.
pub fn init_tracing(
    verbose: u8,
    quiet: u8,
    log_file: Option<&Path>,
) -> anyhow::Result<Option<WorkerGuard>> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let layer = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let init_result = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .with(file_layer)
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(guard)
}

fn file_writer(
    path: &Path,
) -> anyhow::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("log file path has no file name: {}", path.display()))?;
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

/// Pulls positional `rc.key=value` / `rc.key:value` overrides out of the
/// argument list before clap sees it.
#[tracing::instrument(skip_all)]
pub fn preprocess_args(raw: &[OsString]) -> anyhow::Result<PreprocessedArgs> {
    let mut cleaned = Vec::with_capacity(raw.len());
    let mut overrides: Vec<(String, String)> = Vec::new();

    let mut iter = raw.iter().cloned();
    if let Some(bin) = iter.next() {
        cleaned.push(bin);
    }

    for arg in iter {
        let s = arg.to_string_lossy();
        if let Some(rest) = s.strip_prefix("rc.") {
            let parsed = rest.split_once('=').or_else(|| rest.split_once(':'));
            if let Some((k, v)) = parsed {
                if k.trim().is_empty() {
                    return Err(anyhow!("empty key in override: {s}"));
                }
                debug!(key = %k, value = %v, "captured positional rc override");
                overrides.push((format!("rc.{k}"), v.to_string()));
                continue;
            }
        }

        cleaned.push(arg);
    }

    Ok(PreprocessedArgs {
        cleaned_args: cleaned,
        rc_overrides: overrides,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<OsString> {
        raw.iter().map(OsString::from).collect()
    }

    #[test]
    fn positional_rc_overrides_are_extracted() {
        let pre = preprocess_args(&args(&[
            "tasklet",
            "rc.color=off",
            "list",
            "rc.api.url:http://h:1",
            "--page",
            "2",
        ]))
        .expect("preprocess");

        assert_eq!(pre.cleaned_args, args(&["tasklet", "list", "--page", "2"]));
        assert_eq!(
            pre.rc_overrides,
            vec![
                ("rc.color".to_string(), "off".to_string()),
                ("rc.api.url".to_string(), "http://h:1".to_string()),
            ]
        );
    }

    #[test]
    fn parses_list_flags_and_defaults() {
        let cli = GlobalCli::parse_from(args(&[
            "tasklet",
            "list",
            "--filter",
            "Done",
            "--search",
            "milk",
        ]));
        assert_eq!(
            cli.command,
            Some(Command::List {
                search: "milk".to_string(),
                filter: StatusFilter::Completed,
                page: 1,
            })
        );

        let bare = GlobalCli::parse_from(args(&["tasklet"]));
        assert_eq!(bare.command, None);
        assert_eq!(bare.command.unwrap_or_default(), Command::default());
    }

    #[test]
    fn rejects_unknown_filter() {
        let err = GlobalCli::try_parse_from(args(&["tasklet", "list", "--filter", "later"]))
            .expect_err("invalid filter");
        assert!(err.to_string().contains("unknown filter"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = GlobalCli::parse_from(args(&[
            "tasklet",
            "delete",
            "66f0c1",
            "--rc",
            "color=off",
            "-vv",
        ]));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.rc_overrides.len(), 1);
        assert_eq!(
            cli.command,
            Some(Command::Delete {
                id: "66f0c1".to_string()
            })
        );
    }
}
