pub mod catalog;
pub mod cli;
pub mod engine;
pub mod error;
pub mod insights;
pub mod render;
pub mod shell;
pub mod state;
pub mod types;
pub mod util;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use catalog::Catalog;
use cli::{parse_command, Cli, ReplCommand, REPL_HELP};
use insights::InsightGateway;
use shell::Shell;
use state::ShellAction;
use types::Config;

pub fn run(cli: Cli) -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("astra: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run_dashboard(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("astra: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_dashboard(cli: Cli) -> Result<(), String> {
    let config = load_settings(cli.config.as_deref())?;
    let catalog = load_catalog(cli.catalog.as_deref(), &config)?;

    let gateway = if cli.no_insights {
        InsightGateway::disabled()
    } else {
        InsightGateway::from_config(&config.insights)
    };

    let mut shell = Shell::new(
        Arc::new(catalog),
        Arc::new(gateway),
        cli.role.unwrap_or(config.default_role),
    );
    if cli.no_insights {
        shell = shell.without_auto_insights();
    }

    // Selection flags are applied before the first frame; a category flag
    // dispatches the startup insight request itself.
    let mut pending = None;
    if let Some(category) = cli.category {
        pending = shell.dispatch(ShellAction::SelectCategory(category));
    }
    if let Some(metric) = cli.metric {
        shell.dispatch(ShellAction::SelectMetric(metric));
    }
    if let Some(id) = &cli.project {
        if !shell.catalog().contains(id) {
            log::warn!("Unknown project id '{}', detail view not opened", id);
        }
        shell.dispatch(ShellAction::OpenProject(id.clone()));
    }
    if !cli.no_insights && pending.is_none() {
        pending = Some(shell.refresh_insights());
    }

    if cli.interactive {
        return run_interactive(&shell, cli.json).await;
    }

    if let Some(handle) = pending {
        if let Err(e) = handle.await {
            log::warn!("Insight task failed: {}", e);
        }
    }
    print_view(&shell, cli.json)
}

async fn run_interactive(shell: &Shell, json: bool) -> Result<(), String> {
    print_view(shell, json)?;
    println!("{}", REPL_HELP);

    let updates = shell.updates();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => return Ok(()),
                    Err(e) => return Err(format!("Failed to read stdin: {}", e)),
                };
                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(ReplCommand::Quit)) => return Ok(()),
                    Ok(Some(ReplCommand::Help)) => println!("{}", REPL_HELP),
                    Ok(Some(ReplCommand::Show)) => print_view(shell, json)?,
                    Ok(Some(ReplCommand::Action(action))) => {
                        shell.dispatch(action);
                        print_view(shell, json)?;
                    }
                    Err(e) => eprintln!("{}", e),
                }
            }
            _ = updates.notified() => print_view(shell, json)?,
        }
    }
}

fn print_view(shell: &Shell, json: bool) -> Result<(), String> {
    let view = shell.view();
    if json {
        let text = serde_json::to_string_pretty(&view)
            .map_err(|e| format!("Failed to serialize view: {}", e))?;
        println!("{}", text);
    } else {
        println!("{}", render::render_dashboard(&view));
    }
    Ok(())
}

/// Explicit `--config` paths must load; the default location may be absent.
fn load_settings(explicit: Option<&Path>) -> Result<Config, String> {
    if let Some(path) = explicit {
        let config = state::load_config_from(path)?;
        log::info!("Loaded config from {}", path.display());
        return Ok(config);
    }

    match state::load_config() {
        Ok(config) => {
            log::info!("Loaded config from default location");
            Ok(config)
        }
        Err(e) => {
            log::info!("{}", e);
            Ok(Config::default())
        }
    }
}

/// `--catalog` wins over `catalogPath`; neither means the built-in seed.
fn load_catalog(explicit: Option<&Path>, config: &Config) -> Result<Catalog, String> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| config.catalog_path.as_ref().map(PathBuf::from));
    match path {
        Some(path) => Catalog::load(&path).map_err(|e| e.to_string()),
        None => {
            log::info!("Using built-in project catalog");
            Ok(Catalog::builtin())
        }
    }
}
