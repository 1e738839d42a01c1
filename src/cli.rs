use std::path::PathBuf;

use clap::Parser;

use crate::state::ShellAction;
use crate::types::{CategoryView, DashboardMetric, UserRole};

/// ASTRA mission command dashboard.
#[derive(Parser, Debug, Default)]
#[command(name = "astra", version)]
pub struct Cli {
    /// Category view: all, launch-vehicles, satellite-infra, user-funded.
    #[arg(long, short = 'c', value_name = "VIEW")]
    pub category: Option<CategoryView>,

    /// Active KPI card: projects, budget, expenditure.
    #[arg(long, short = 'm', value_name = "METRIC")]
    pub metric: Option<DashboardMetric>,

    /// Open the detail view for this project id.
    #[arg(long, short = 'p', value_name = "ID")]
    pub project: Option<String>,

    /// Viewer role shown in the header.
    #[arg(long, value_name = "ROLE")]
    pub role: Option<UserRole>,

    /// Skip the automated insight request.
    #[arg(long = "no-insights", default_value_t = false)]
    pub no_insights: bool,

    /// Print the view as JSON instead of text.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// JSON project catalog to load instead of the built-in seed.
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Config file (defaults to ~/.astra/config.json).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Read commands from stdin and re-render after each one.
    #[arg(long, short = 'i', default_value_t = false)]
    pub interactive: bool,
}

/// A line typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Action(ShellAction),
    Show,
    Help,
    Quit,
}

pub const REPL_HELP: &str = "\
commands:
  category <all|lv|si|uf>            switch category view
  metric <projects|budget|expenditure>  switch KPI card
  open <id>                          open project detail
  close                              close project detail
  role <chairman|officer|director>   switch viewer role
  show                               re-render
  help                               this text
  quit                               exit";

/// Parse one prompt line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ReplCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, arg) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "category" | "cat" | "c" => {
            ReplCommand::Action(ShellAction::SelectCategory(required(verb, arg, "a category")?.parse()?))
        }
        "metric" | "m" => {
            ReplCommand::Action(ShellAction::SelectMetric(required(verb, arg, "a metric")?.parse()?))
        }
        "open" | "o" => {
            ReplCommand::Action(ShellAction::OpenProject(required(verb, arg, "a project id")?.to_string()))
        }
        "close" => ReplCommand::Action(ShellAction::CloseProject),
        "role" => ReplCommand::Action(ShellAction::SelectRole(required(verb, arg, "a role")?.parse()?)),
        "show" | "s" => ReplCommand::Show,
        "help" | "h" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => return Err(format!("unknown command '{}' (try 'help')", other)),
    };
    Ok(Some(command))
}

fn required<'a>(verb: &str, arg: &'a str, what: &str) -> Result<&'a str, String> {
    if arg.is_empty() {
        Err(format!("'{}' needs {}", verb, what))
    } else {
        Ok(arg)
    }
}
