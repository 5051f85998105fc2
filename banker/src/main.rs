//! Deadlock-avoidance resource allocator CLI.
//!
//! Loads an allocation state (`banker-state.json` or the classic example),
//! then checks safety or evaluates requests, either one-shot or from an
//! interactive shell. Mutated state lives only for the process lifetime.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use banker::bank::Bank;
use banker::core::request::request;
use banker::core::safety::check_safety;
use banker::core::state::SystemState;
use banker::exit_codes;
use banker::io::config::{BankerConfig, CONFIG_FILE, load_config, write_config};
use banker::io::state_store::{load_state, write_state_file};
use banker::logging;
use banker::preset;
use banker::render::{render_outcome, render_safety, render_state, render_trace};
use banker::shell::run_shell;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(
    name = "banker",
    version,
    about = "Deadlock-avoidance resource allocator (banker's algorithm)"
)]
struct Cli {
    /// Config file (TOML). Defaults apply when it does not exist.
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// State file (JSON). Overrides `state_path` from the config.
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the classic example state file and a default config if missing.
    Init {
        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },
    /// Print total, available and the per-process matrices.
    Show,
    /// Run the safety algorithm and print the completion order.
    Check {
        /// Print the structured report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Evaluate one request against the loaded state.
    Request {
        /// Requesting process id.
        pid: usize,
        /// Units requested per resource type.
        #[arg(allow_negative_numbers = true)]
        units: Vec<i64>,
        /// Print the structured outcome as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Interactive shell: show-state, check-safety, request, exit.
    Shell,
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            err.print().context("print usage")?;
            return Ok(if err.use_stderr() {
                exit_codes::INVALID
            } else {
                exit_codes::OK
            });
        }
    };
    let config = load_config(&cli.config).context("load config")?;
    logging::init(&config.log_level);
    debug!(config = %cli.config.display(), "starting");

    match cli.command {
        Command::Init { force } => cmd_init(&cli.config, cli.state.as_deref(), &config, force),
        Command::Show => cmd_show(cli.state.as_deref(), &config),
        Command::Check { json } => cmd_check(cli.state.as_deref(), &config, json),
        Command::Request { pid, units, json } => {
            cmd_request(cli.state.as_deref(), &config, pid, &units, json)
        }
        Command::Shell => cmd_shell(cli.state.as_deref(), &config),
    }
}

fn cmd_init(
    config_path: &Path,
    state_override: Option<&Path>,
    config: &BankerConfig,
    force: bool,
) -> Result<i32> {
    let state_path = state_override.unwrap_or(config.state_path.as_path());
    if force || !state_path.exists() {
        write_state_file(state_path, &preset::classic_matrices())
            .with_context(|| format!("write {}", state_path.display()))?;
        println!("init: wrote {}", state_path.display());
    }
    if force || !config_path.exists() {
        let mut new_config = config.clone();
        new_config.state_path = state_path.to_path_buf();
        write_config(config_path, &new_config)
            .with_context(|| format!("write {}", config_path.display()))?;
        println!("init: wrote {}", config_path.display());
    }
    Ok(exit_codes::OK)
}

fn cmd_show(state_override: Option<&Path>, config: &BankerConfig) -> Result<i32> {
    let state = resolve_state(state_override, config)?;
    print!("{}", render_state(&state)?);
    Ok(exit_codes::OK)
}

fn cmd_check(state_override: Option<&Path>, config: &BankerConfig, json: bool) -> Result<i32> {
    let state = resolve_state(state_override, config)?;
    let report = check_safety(&state);
    if json {
        print_json(&report)?;
    } else {
        if config.show_trace {
            print_lines(&render_trace(&report.trace));
        }
        println!("{}", render_safety(&report, state.process_count()));
    }
    Ok(if report.safe {
        exit_codes::OK
    } else {
        exit_codes::UNSAFE
    })
}

fn cmd_request(
    state_override: Option<&Path>,
    config: &BankerConfig,
    pid: usize,
    units: &[i64],
    json: bool,
) -> Result<i32> {
    let mut state = resolve_state(state_override, config)?;
    let outcome = request(&mut state, pid, units);
    if json {
        print_json(&outcome)?;
    } else {
        if config.show_trace {
            print_lines(&render_trace(outcome.trace()));
        }
        println!("{}", render_outcome(&outcome));
    }
    Ok(if outcome.is_granted() {
        exit_codes::OK
    } else {
        exit_codes::REJECTED
    })
}

fn cmd_shell(state_override: Option<&Path>, config: &BankerConfig) -> Result<i32> {
    let bank = Bank::new(resolve_state(state_override, config)?);
    let stdin = io::stdin();
    run_shell(&bank, config, stdin.lock(), io::stdout().lock())?;
    Ok(exit_codes::OK)
}

/// Load the state named by `--state`, else the configured state file, else
/// fall back to the classic example.
fn resolve_state(state_override: Option<&Path>, config: &BankerConfig) -> Result<SystemState> {
    let schema_path = config.schema_path.as_deref().filter(|path| {
        let exists = path.exists();
        if !exists {
            warn!(path = %path.display(), "schema file missing, using embedded schema");
        }
        exists
    });

    if let Some(path) = state_override {
        return load_state(schema_path, path);
    }
    if config.state_path.exists() {
        return load_state(schema_path, &config.state_path);
    }
    warn!(
        path = %config.state_path.display(),
        "state file missing, using the classic example"
    );
    Ok(preset::classic())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value).context("serialize json")?;
    println!("{}", payload);
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
