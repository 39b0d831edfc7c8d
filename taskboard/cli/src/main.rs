use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use taskboard_cli::{
    CredentialFile, default_credentials_path, describe_error, parse_due_date, render_page,
    render_statistics, render_summary, render_task_detail, render_task_line, render_user,
};
use taskboard_core::{
    ApiClient, ApiError, AuthService, ClientConfig, SessionStore, TaskDraft, TaskPriority,
    TaskQuery, TaskRepository, TaskStatus,
};
use tracing_subscriber::EnvFilter;

/// Manage your Taskboard tasks from the terminal.
#[derive(Parser, Debug)]
#[command(name = "taskboard", version)]
struct Cli {
    /// Base address of the API
    #[arg(long, global = true, env = "TASKBOARD_API_BASE_URL")]
    api_url: Option<String>,

    /// File the login tokens are kept in [default: <config dir>/taskboard/credentials.json]
    #[arg(long, global = true, env = "TASKBOARD_CREDENTIALS")]
    credentials: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        email: String,
        #[arg(long, env = "TASKBOARD_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Log out and forget the session
    Logout,
    /// Show who is logged in
    Whoami,
    /// List tasks
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        priority: Option<TaskPriority>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        /// Field to sort by, prefix with `-` for descending
        #[arg(long, allow_hyphen_values = true)]
        ordering: Option<String>,
    },
    /// Show one task
    Show { id: u64 },
    /// Create a task
    Add {
        title: String,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Change a task
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: TaskFields,
        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
    },
    /// Delete a task
    Delete {
        id: u64,
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
    /// Counts of tasks per state
    Summary,
    /// Completion rate and breakdowns
    Stats,
}

#[derive(Debug, Clone, Args)]
struct TaskFields {
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    status: Option<TaskStatus>,
    #[arg(long)]
    priority: Option<TaskPriority>,
    #[arg(long)]
    category: Option<String>,
    /// Due date as YYYY-MM-DD
    #[arg(long, value_parser = parse_due_date)]
    due: Option<NaiveDate>,
}

impl TaskFields {
    fn apply(self, draft: &mut TaskDraft) {
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
        if let Some(priority) = self.priority {
            draft.priority = priority;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if self.due.is_some() {
            draft.due_date = self.due;
        }
    }
}

fn explain(err: ApiError) -> anyhow::Error {
    anyhow!(describe_error(&err))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env().context("invalid TASKBOARD_* configuration")?;
    if let Some(url) = cli.api_url {
        config = config.with_api_base_url(url);
    }
    let credentials =
        CredentialFile::new(cli.credentials.unwrap_or_else(default_credentials_path));
    let stored = credentials.load()?;

    let client = ApiClient::new(config, Arc::new(SessionStore::new())).map_err(explain)?;
    client.set_credential(stored.clone());
    let outcome = run(cli.command, &client).await;

    let current = client.credential();
    if current != stored {
        credentials.store(&current)?;
    }
    outcome
}

async fn run(command: Commands, client: &ApiClient) -> anyhow::Result<()> {
    let auth = AuthService::new(client.clone());
    let tasks = TaskRepository::new(client.clone());

    match command {
        Commands::Login { email, password } => {
            let Some(password) = password else {
                bail!("pass --password or set TASKBOARD_PASSWORD");
            };
            let user = auth.login(&email, &password).await.map_err(explain)?;
            if client.credential().is_empty() {
                tracing::warn!("server issued no tokens, the session will not outlive this run");
            }
            println!("Logged in as {}", render_user(&user));
        }
        Commands::Logout => {
            auth.logout().await;
            println!("Logged out");
        }
        Commands::Whoami => {
            let user = auth.profile().await.map_err(explain)?;
            println!("{}", render_user(&user));
        }
        Commands::List {
            page,
            page_size,
            status,
            priority,
            category,
            search,
            ordering,
        } => {
            let page_size = page_size.unwrap_or_else(|| client.config().effective_page_size());
            let query = TaskQuery {
                status,
                priority,
                category,
                search,
                ordering,
                ..TaskQuery::page(page, page_size)
            };
            let results = tasks.query(&query).await.map_err(explain)?;
            println!("{}", render_page(&results, page, page_size));
        }
        Commands::Show { id } => {
            let task = tasks.get(id).await.map_err(explain)?;
            println!("{}", render_task_detail(&task));
        }
        Commands::Add { title, fields } => {
            let mut draft = TaskDraft::new(title);
            fields.apply(&mut draft);
            let task = tasks.create(&draft).await.map_err(explain)?;
            println!("Created {}", render_task_line(&task));
        }
        Commands::Edit {
            id,
            title,
            fields,
            clear_due,
        } => {
            let mut draft = tasks.get(id).await.map_err(explain)?.draft();
            if let Some(title) = title {
                draft.title = title;
            }
            fields.apply(&mut draft);
            if clear_due {
                draft.due_date = None;
            }
            let task = tasks.update(id, &draft).await.map_err(explain)?;
            println!("Updated {}", render_task_line(&task));
        }
        Commands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete task #{id}?"))? {
                println!("Kept task #{id}");
                return Ok(());
            }
            tasks.delete(id).await.map_err(explain)?;
            println!("Deleted task #{id}");
        }
        Commands::Summary => {
            let summary = tasks.summary().await.map_err(explain)?;
            println!("{}", render_summary(&summary));
        }
        Commands::Stats => {
            let statistics = tasks.statistics().await.map_err(explain)?;
            println!("{}", render_statistics(&statistics));
        }
    }
    Ok(())
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
