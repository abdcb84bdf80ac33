//! crates/collab_core/src/board.rs
//!
//! The task board state machine: task lifecycle across the three board
//! columns, plus the derived project progress figure.
//!
//! Transitions are deliberately permissive. The board mirrors free-form
//! drag-and-drop, so every status is reachable from every other status and
//! `done` is not terminal.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, Project, Task, TaskPriority, TaskStatus};

/// The three board columns, each in task insertion order.
#[derive(Debug, Clone, Default)]
pub struct BoardColumns {
    pub todo: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub done: Vec<Task>,
}

/// Creates a new task in the `todo` column, assigned to its creator with
/// `medium` priority. Fails with a validation error when the title is empty
/// or whitespace-only.
pub fn add_task(
    project: &mut Project,
    title: &str,
    description: &str,
    created_by: Uuid,
) -> DomainResult<Task> {
    if title.trim().is_empty() {
        return Err(DomainError::Validation("Task title is required".into()));
    }

    let task = Task {
        id: Uuid::new_v4(),
        title: title.trim().to_string(),
        description: description.trim().to_string(),
        status: TaskStatus::Todo,
        assigned_to: created_by,
        priority: TaskPriority::Medium,
        created_at: Utc::now(),
    };
    project.tasks.push(task.clone());
    Ok(task)
}

/// Overwrites the task's status with `target`. Unknown task ids are a
/// silent no-op (a stale drag after a concurrent delete is not an error).
pub fn move_task(project: &mut Project, task_id: Uuid, target: TaskStatus) {
    if let Some(task) = project.tasks.iter_mut().find(|t| t.id == task_id) {
        task.status = target;
    }
}

/// Removes the task if present; deleting an unknown id is a no-op.
pub fn delete_task(project: &mut Project, task_id: Uuid) {
    project.tasks.retain(|t| t.id != task_id);
}

/// Completion percentage: `round(100 * done / total)`, 0 for an empty board.
/// Derived on demand so it can never drift from the task sequence.
pub fn progress(project: &Project) -> u8 {
    let total = project.tasks.len();
    if total == 0 {
        return 0;
    }
    let done = project
        .tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Done)
        .count();
    ((done as f64 / total as f64) * 100.0).round() as u8
}

/// Partitions the project's tasks into the three board columns, keeping
/// insertion order within each column.
pub fn columns(project: &Project) -> BoardColumns {
    let mut board = BoardColumns::default();
    for task in &project.tasks {
        match task.status {
            TaskStatus::Todo => board.todo.push(task.clone()),
            TaskStatus::InProgress => board.in_progress.push(task.clone()),
            TaskStatus::Done => board.done.push(task.clone()),
        }
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn project_with_creator() -> (Project, Uuid) {
        let creator = Uuid::new_v4();
        let project = Project::new(
            "Board Test",
            "Task board behavior",
            vec!["Rust".to_string()],
            NaiveDate::from_ymd_opt(2027, 3, 1).unwrap(),
            3,
            creator,
        )
        .unwrap();
        (project, creator)
    }

    #[test]
    fn new_tasks_default_to_todo_medium_and_creator() {
        let (mut project, creator) = project_with_creator();

        let task = add_task(&mut project, "Write parser", "", creator).unwrap();
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.assigned_to, creator);
    }

    #[test]
    fn blank_titles_are_rejected() {
        let (mut project, creator) = project_with_creator();

        assert!(matches!(
            add_task(&mut project, "   ", "desc", creator),
            Err(DomainError::Validation(_))
        ));
        assert!(project.tasks.is_empty());
    }

    #[test]
    fn progress_tracks_done_count() {
        let (mut project, creator) = project_with_creator();
        assert_eq!(progress(&project), 0);

        for title in ["a", "b", "c", "d"] {
            add_task(&mut project, title, "", creator).unwrap();
        }
        let ids: Vec<Uuid> = project.tasks.iter().map(|t| t.id).collect();

        // 1 of 4 done -> 25%, then 2 of 4 -> 50%.
        move_task(&mut project, ids[0], TaskStatus::Done);
        assert_eq!(progress(&project), 25);
        move_task(&mut project, ids[1], TaskStatus::Done);
        assert_eq!(progress(&project), 50);
    }

    #[test]
    fn every_status_is_reachable_from_every_status() {
        let (mut project, creator) = project_with_creator();
        add_task(&mut project, "task", "", creator).unwrap();
        let id = project.tasks[0].id;

        move_task(&mut project, id, TaskStatus::Done);
        assert_eq!(project.tasks[0].status, TaskStatus::Done);
        // Done is not terminal: drag it straight back.
        move_task(&mut project, id, TaskStatus::Todo);
        assert_eq!(project.tasks[0].status, TaskStatus::Todo);
        move_task(&mut project, id, TaskStatus::InProgress);
        assert_eq!(project.tasks[0].status, TaskStatus::InProgress);
    }

    #[test]
    fn moving_to_the_current_status_changes_nothing() {
        let (mut project, creator) = project_with_creator();
        add_task(&mut project, "task", "", creator).unwrap();
        let id = project.tasks[0].id;
        let before = progress(&project);

        move_task(&mut project, id, TaskStatus::Todo);
        assert_eq!(project.tasks.len(), 1);
        assert_eq!(progress(&project), before);
    }

    #[test]
    fn moving_or_deleting_a_missing_task_is_a_no_op() {
        let (mut project, creator) = project_with_creator();
        add_task(&mut project, "task", "", creator).unwrap();

        move_task(&mut project, Uuid::new_v4(), TaskStatus::Done);
        assert_eq!(project.tasks[0].status, TaskStatus::Todo);

        delete_task(&mut project, Uuid::new_v4());
        assert_eq!(project.tasks.len(), 1);
    }

    #[test]
    fn columns_group_by_status_in_insertion_order() {
        let (mut project, creator) = project_with_creator();
        for title in ["first", "second", "third"] {
            add_task(&mut project, title, "", creator).unwrap();
        }
        let ids: Vec<Uuid> = project.tasks.iter().map(|t| t.id).collect();
        move_task(&mut project, ids[1], TaskStatus::Done);

        let board = columns(&project);
        assert_eq!(
            board.todo.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(),
            vec!["first", "third"]
        );
        assert!(board.in_progress.is_empty());
        assert_eq!(board.done[0].title, "second");
    }
}
