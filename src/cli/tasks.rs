// ABOUTME: CLI tasks commands - list open tasks and post new ones
//
// Posting goes through the same task form validation as the TUI

use super::output::{emit, truncate};
use super::{api_failure, form_failure, require_session, CreateTaskArgs, OutputFormat};
use crate::api::ApiClient;
use crate::app::form::SubmitBlocked;
use crate::app::task_form::{TaskField, TaskForm, TaskTransition};
use crate::components::task_list::deadline_label;
use crate::models::Task;
use anyhow::{anyhow, Result};
use chrono::Local;
use serde_json::json;
use tracing::info;

/// Execute `tasks list`
pub async fn list(api: &ApiClient, format: OutputFormat) -> Result<()> {
    require_session(api)?;
    let tasks = api.list_tasks().await.map_err(api_failure)?;
    emit(format, tasks.as_slice(), output_text)
}

/// Execute `tasks create`
pub async fn create(api: &ApiClient, args: CreateTaskArgs, format: OutputFormat) -> Result<()> {
    require_session(api)?;

    let mut form = TaskForm::new();
    form.title = args.title;
    form.description = args.description;
    form.budget = args.budget;
    form.deadline = args.deadline;
    form.skills = args.skills;

    let submission = match form.begin_submit() {
        Ok(submission) => submission,
        Err(SubmitBlocked::Invalid) => return Err(form_failure(&form.status, TaskField::label)),
        Err(SubmitBlocked::InFlight) => return Err(anyhow!("A submission is already in progress.")),
    };

    let title = submission.task.title.clone();
    let result = api.create_task(&submission.task).await;
    if let Err(e) = &result {
        if e.is_unauthenticated() {
            return Err(api_failure(e.clone()));
        }
    }
    let created = result.as_ref().ok().cloned().flatten();

    match form.finish_submit(submission.ticket, result) {
        TaskTransition::Created => {
            info!("Posted task {}", title);
            let value = json!({ "status": "created", "title": title, "task": &created });
            emit(format, &value, |_| match &created {
                Some(task) => println!("Task posted (#{}): {}", task.id, task.title),
                None => println!("Task posted: {title}"),
            })
        }
        _ => Err(form_failure(&form.status, TaskField::label)),
    }
}

fn output_text(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let today = Local::now().date_naive();
    println!(
        "{:<6} {:<32} {:>12} {:<12} {:<14} AUTHOR",
        "ID", "TITLE", "BUDGET", "DEADLINE", "DUE"
    );
    println!("{}", "-".repeat(92));
    for task in tasks {
        println!(
            "{:<6} {:<32} {:>12} {:<12} {:<14} {}",
            task.id,
            truncate(&task.title, 32),
            task.budget.to_string(),
            task.deadline_display(),
            deadline_label(task.days_left(today)),
            task.author()
        );
    }
}
