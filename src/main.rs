use std::{path::PathBuf, process::exit};

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use compact_str::format_compact;
use serde_json::{json, Value};

use jira_fetch::{
    client::{ClientConfig, JiraService, Record},
    config::{default_config_path, load_config, save_config, JiraConfig},
    logging::{init_logging, LoggingConfig},
    result::{AppError, Result},
};

/// Fetch issues, boards and other resources from a Jira instance as JSON
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Alternate path to the configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print the path to the configuration file and exit.
    #[arg(short, long)]
    print_config_path: bool,
    /// Dump every HTTP response body into the response log directory.
    #[arg(short, long)]
    debug: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write connection settings to the configuration file.
    Configure {
        #[arg(long)]
        url: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        api_token: String,
        #[arg(long)]
        log_level: Option<String>,
    },
    /// Check that the configured credentials are accepted.
    Validate,
    /// All agile boards.
    Boards,
    Board { id: u64 },
    BoardEpics { board_id: u64 },
    BoardIssues { board_id: u64 },
    BoardEpicIssues { board_id: u64, epic_id: u64 },
    Dashboards,
    Dashboard { id: String },
    /// One issue with changelog and transitions.
    Issue { key: String },
    IssueWorklogs { key: String },
    /// Issues matching a JQL query.
    Search { jql: String },
    OpenIssues,
    ClosedIssues,
    IssueTypes,
    IssueType { id: String },
    Priorities,
    Priority { id: String },
    Projects,
    Project { id: String },
    ProjectProperties { id: String },
    ProjectTypes,
    ProjectType { key: String },
    ProjectCategories,
    ProjectCategory { id: String },
    Statuses,
    Status { id: String },
    StatusCategories,
    StatusCategory { id: String },
    Fields,
    /// Users matching a search string.
    Users { query: String },
    User { username: String },
    /// Worklog ids updated since an RFC 3339 timestamp.
    WorklogsSince { since: DateTime<Utc> },
    TempoWorklog { id: String },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(default_config_path);

    if args.print_config_path {
        println!("{}", config_path.display());
        exit(0);
    }

    run(args, config_path)?;
    Ok(())
}

fn run(args: Args, config_path: PathBuf) -> Result<()> {
    let command = args
        .command
        .ok_or_else(|| AppError::GeneralError("No command given, see --help".into()))?;

    if let Command::Configure { url, username, api_token, log_level } = command {
        let config = JiraConfig { jira_url: url, username, api_token, log_level };
        config.validate().map_err(AppError::InvalidConfig)?;
        save_config(&config_path, &config)?;
        println!("Configuration written to {}", config_path.display());
        return Ok(());
    }

    let config = load_config(&config_path)?;
    config.validate().map_err(AppError::InvalidConfig)?;

    let logging = LoggingConfig::default()
        .with_level(config.log_level.as_deref())
        .with_env_overrides();
    let _log_guard = init_logging(logging)
        .map_err(|e| AppError::GeneralError(format_compact!("Failed to initialize logging: {e}")))?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "jira-fetch starting up");

    let client_config = ClientConfig::from(config).with_debug_logging(args.debug);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| AppError::GeneralError(format_compact!("Failed to create runtime: {e}")))?;

    let service = JiraService::new(client_config)?;
    let output = rt.block_on(execute(&service, command))?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn execute(service: &JiraService, command: Command) -> Result<Value> {
    let api = service.api();

    let value = match command {
        Command::Configure { .. } => {
            return Err(AppError::GeneralError("configure does not query the server".into()))
        },
        Command::Validate => {
            api.validate_connection().await?;
            json!({ "valid": true })
        },
        Command::Boards => records(service.boards().await?),
        Command::Board { id } => api.board(id).await?,
        Command::BoardEpics { board_id } => records(service.board_epics(board_id).await?),
        Command::BoardIssues { board_id } => records(service.board_issues(board_id).await?),
        Command::BoardEpicIssues { board_id, epic_id } => {
            records(service.board_epic_issues(board_id, epic_id).await?)
        },
        Command::Dashboards => records(service.dashboards().await?),
        Command::Dashboard { id } => api.dashboard(&id).await?,
        Command::Issue { key } => api.issue(&key).await?,
        Command::IssueWorklogs { key } => records(service.issue_worklogs(&key).await?),
        Command::Search { jql } => records(service.search(&jql).await?),
        Command::OpenIssues => records(service.open_issues().await?),
        Command::ClosedIssues => records(service.closed_issues().await?),
        Command::IssueTypes => api.issue_types().await?,
        Command::IssueType { id } => api.issue_type(&id).await?,
        Command::Priorities => api.priorities().await?,
        Command::Priority { id } => api.priority(&id).await?,
        Command::Projects => api.projects().await?,
        Command::Project { id } => api.project(&id).await?,
        Command::ProjectProperties { id } => api.project_properties(&id).await?,
        Command::ProjectTypes => api.project_types().await?,
        Command::ProjectType { key } => api.project_type(&key).await?,
        Command::ProjectCategories => api.project_categories().await?,
        Command::ProjectCategory { id } => api.project_category(&id).await?,
        Command::Statuses => api.statuses().await?,
        Command::Status { id } => api.status(&id).await?,
        Command::StatusCategories => api.status_categories().await?,
        Command::StatusCategory { id } => api.status_category(&id).await?,
        Command::Fields => api.fields().await?,
        Command::Users { query } => api.find_users(&query).await?,
        Command::User { username } => api.user(&username).await?,
        Command::WorklogsSince { since } => api.worklogs_updated_since(since).await?,
        Command::TempoWorklog { id } => api.tempo_worklog(&id).await?,
    };

    Ok(value)
}

fn records(records: Vec<Record>) -> Value {
    Value::Array(records)
}
