use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use taskboard_core::task::DATE_FORMAT;
use taskboard_core::{ApiError, Credential, Page, Task, TaskStatistics, TaskSummary, User};

/// Used when the platform has no per-user config directory.
pub const FALLBACK_CREDENTIALS_FILE: &str = "taskboard-credentials.json";

/// `<config dir>/taskboard/credentials.json`, e.g.
/// `~/.config/taskboard/credentials.json` on Linux.
pub fn default_credentials_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("taskboard").join("credentials.json"),
        None => PathBuf::from(FALLBACK_CREDENTIALS_FILE),
    }
}

/// Login tokens kept on disk between invocations.
#[derive(Debug, Clone)]
pub struct CredentialFile {
    path: PathBuf,
}

impl CredentialFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored credential, or an empty one when nothing was saved yet.
    pub fn load(&self) -> anyhow::Result<Credential> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("cannot parse {}", self.path.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Credential::default()),
            Err(err) => Err(err).with_context(|| format!("cannot read {}", self.path.display())),
        }
    }

    /// Writes `credential`, or removes the file when it is empty.
    pub fn store(&self, credential: &Credential) -> anyhow::Result<()> {
        if credential.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(err) if err.kind() != ErrorKind::NotFound => {
                    Err(err).with_context(|| format!("cannot remove {}", self.path.display()))
                }
                _ => Ok(()),
            };
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(credential)?;
        fs::write(&self.path, json)
            .with_context(|| format!("cannot write {}", self.path.display()))?;

        // Owner read/write only.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot restrict {}", self.path.display()))?;
        }
        Ok(())
    }
}

pub fn parse_due_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| format!("invalid date {raw:?}, expected YYYY-MM-DD"))
}

/// What to print for a failed API call: field messages for rejected input,
/// the generic notification otherwise.
pub fn describe_error(err: &ApiError) -> String {
    match err.field_errors() {
        Some(errors) if !errors.is_empty() => errors.messages().join("\n"),
        _ => err.user_message(),
    }
}

pub fn render_user(user: &User) -> String {
    if user.username.is_empty() {
        user.email.clone()
    } else {
        format!("{} <{}>", user.username, user.email)
    }
}

pub fn render_task_line(task: &Task) -> String {
    let due = task
        .due_date
        .map(|date| format!(" (due {date})"))
        .unwrap_or_default();
    format!(
        "#{:<4} [{:<11}] {:<6} {}{}",
        task.id,
        task.status.label(),
        task.priority.label(),
        task.title,
        due
    )
}

pub fn render_task_detail(task: &Task) -> String {
    let mut lines = vec![
        format!("#{} {}", task.id, task.title),
        format!("Status:   {}", task.status),
        format!("Priority: {}", task.priority),
    ];
    if !task.category.is_empty() {
        lines.push(format!("Category: {}", task.category));
    }
    if let Some(due) = task.due_date {
        lines.push(format!("Due:      {due}"));
    }
    if let Some(created) = task.created_at {
        lines.push(format!("Created:  {}", created.format("%Y-%m-%d %H:%M")));
    }
    if !task.description.is_empty() {
        lines.push(String::new());
        lines.push(task.description.clone());
    }
    lines.join("\n")
}

pub fn render_page(page: &Page<Task>, number: u32, page_size: u32) -> String {
    if page.results.is_empty() {
        return "No tasks.".to_string();
    }
    let mut lines: Vec<String> = page.results.iter().map(render_task_line).collect();
    lines.push(format!(
        "Page {} of {} ({} tasks)",
        number.max(1),
        page.total_pages(page_size),
        page.count
    ));
    lines.join("\n")
}

pub fn render_summary(summary: &TaskSummary) -> String {
    [
        ("Total", summary.total),
        ("Open", summary.open),
        ("In progress", summary.in_progress),
        ("Done", summary.done),
        ("Cancelled", summary.cancelled),
        ("Overdue", summary.overdue),
    ]
    .iter()
    .map(|(label, count)| format!("{label:<12} {count}"))
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn render_statistics(statistics: &TaskStatistics) -> String {
    let mut lines = vec![format!(
        "{} tasks, {:.0}% done",
        statistics.total, statistics.completion_rate
    )];
    let groups = [
        ("By status", &statistics.by_status),
        ("By priority", &statistics.by_priority),
        ("By category", &statistics.by_category),
    ];
    for (title, counts) in groups {
        if counts.is_empty() {
            continue;
        }
        lines.push(format!("{title}:"));
        lines.extend(counts.iter().map(|(name, count)| format!("  {name:<12} {count}")));
    }
    lines.join("\n")
}
