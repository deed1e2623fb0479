//! Mutations over a [`Board`].
//!
//! Every operation resolves and validates all of its indices and names
//! before touching the board, so a failing call leaves it exactly as it was.
//! Batch removals run from the highest position down, which keeps the
//! remaining positions of the same batch valid while items disappear.

use chrono::NaiveDate;
use itertools::Itertools;
use tracing::debug;

use crate::error::{Error, Level, Result};
use crate::model::{position, Board, Group, Status, Subtask, Task};

/// One requested change to the board, with user-facing 1-based indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CreateGroup {
        name: String,
        task: String,
        subtasks: Vec<String>,
    },
    AssignTask {
        group: usize,
        task: String,
        subtasks: Vec<String>,
    },
    RenameGroup {
        group: usize,
        name: String,
    },
    RenameTask {
        group: usize,
        task: usize,
        name: String,
    },
    DeleteGroups {
        groups: Vec<usize>,
    },
    DeleteTasks {
        group: usize,
        tasks: Vec<usize>,
    },
    SetStatus {
        group: usize,
        tasks: Vec<usize>,
        status: Status,
    },
    ToggleMark {
        group: usize,
        task: usize,
    },
    TickSubtasks {
        group: usize,
        task: usize,
        subtasks: Vec<usize>,
    },
    AddSubtasks {
        group: usize,
        task: usize,
        names: Vec<String>,
    },
    RenameSubtask {
        group: usize,
        task: usize,
        subtask: usize,
        name: String,
    },
    DeleteSubtasks {
        group: usize,
        task: usize,
        subtasks: Vec<usize>,
    },
    Reset,
}

impl Board {
    /// Applies `op`, stamping dates with `today` where the operation records one.
    pub fn apply(&mut self, op: Operation, today: NaiveDate) -> Result<()> {
        debug!(?op, "applying operation");
        match op {
            Operation::CreateGroup {
                name,
                task,
                subtasks,
            } => self.create_group(&name, &task, &subtasks, today),
            Operation::AssignTask {
                group,
                task,
                subtasks,
            } => self.assign_task(group, &task, &subtasks, today),
            Operation::RenameGroup { group, name } => self.rename_group(group, &name),
            Operation::RenameTask { group, task, name } => self.rename_task(group, task, &name),
            Operation::DeleteGroups { groups } => self.delete_groups(&groups),
            Operation::DeleteTasks { group, tasks } => self.delete_tasks(group, &tasks),
            Operation::SetStatus {
                group,
                tasks,
                status,
            } => self.set_status(group, &tasks, status, today),
            Operation::ToggleMark { group, task } => self.toggle_mark(group, task),
            Operation::TickSubtasks {
                group,
                task,
                subtasks,
            } => self.tick_subtasks(group, task, &subtasks),
            Operation::AddSubtasks { group, task, names } => {
                self.add_subtasks(group, task, &names)
            }
            Operation::RenameSubtask {
                group,
                task,
                subtask,
                name,
            } => self.rename_subtask(group, task, subtask, &name),
            Operation::DeleteSubtasks {
                group,
                task,
                subtasks,
            } => self.delete_subtasks(group, task, &subtasks),
            Operation::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    /// Appends a new group holding one fresh task.
    pub fn create_group(
        &mut self,
        name: &str,
        task: &str,
        subtasks: &[String],
        today: NaiveDate,
    ) -> Result<()> {
        let name = clean_name(name)?;
        let task = new_task(task, subtasks, today)?;

        let mut group = Group::new(name);
        group.tasks.push(task);
        self.groups_mut().push(group);
        Ok(())
    }

    pub fn assign_task(
        &mut self,
        group: usize,
        task: &str,
        subtasks: &[String],
        today: NaiveDate,
    ) -> Result<()> {
        let task = new_task(task, subtasks, today)?;
        self.group_mut(group)?.tasks.push(task);
        Ok(())
    }

    pub fn rename_group(&mut self, group: usize, name: &str) -> Result<()> {
        let name = clean_name(name)?;
        self.group_mut(group)?.name = name;
        Ok(())
    }

    pub fn rename_task(&mut self, group: usize, task: usize, name: &str) -> Result<()> {
        let name = clean_name(name)?;
        self.task_mut(group, task)?.name = name;
        Ok(())
    }

    pub fn delete_groups(&mut self, groups: &[usize]) -> Result<()> {
        let positions = unique_positions(Level::Group, groups, self.groups().len())?;
        remove_positions(self.groups_mut(), &positions);
        Ok(())
    }

    pub fn delete_tasks(&mut self, group: usize, tasks: &[usize]) -> Result<()> {
        let group = self.group_mut(group)?;
        let positions = unique_positions(Level::Task, tasks, group.tasks.len())?;
        remove_positions(&mut group.tasks, &positions);
        Ok(())
    }

    /// Writes `status` to every named task. Done tasks get `today` as their end date.
    pub fn set_status(
        &mut self,
        group: usize,
        tasks: &[usize],
        status: Status,
        today: NaiveDate,
    ) -> Result<()> {
        let group = self.group_mut(group)?;
        let positions = unique_positions(Level::Task, tasks, group.tasks.len())?;
        for pos in positions {
            let task = &mut group.tasks[pos];
            task.status = status;
            task.end = (status == Status::Done).then_some(today);
        }
        Ok(())
    }

    pub fn toggle_mark(&mut self, group: usize, task: usize) -> Result<()> {
        let task = self.task_mut(group, task)?;
        task.important = !task.important;
        Ok(())
    }

    /// Flips `done` on each named subtask. Subtasks of a done task are locked.
    pub fn tick_subtasks(&mut self, group: usize, task: usize, subtasks: &[usize]) -> Result<()> {
        let task = self.task_mut(group, task)?;
        if task.is_done() {
            return Err(Error::TaskLocked {
                task: task.name.clone(),
            });
        }
        let positions = unique_positions(Level::Subtask, subtasks, task.subtasks.len())?;
        for pos in positions {
            let subtask = &mut task.subtasks[pos];
            subtask.done = !subtask.done;
        }
        Ok(())
    }

    pub fn add_subtasks(&mut self, group: usize, task: usize, names: &[String]) -> Result<()> {
        let names = clean_names(names)?;
        let task = self.task_mut(group, task)?;
        task.subtasks.extend(names.into_iter().map(Subtask::new));
        Ok(())
    }

    pub fn rename_subtask(
        &mut self,
        group: usize,
        task: usize,
        subtask: usize,
        name: &str,
    ) -> Result<()> {
        let name = clean_name(name)?;
        let task = self.task_mut(group, task)?;
        let pos = position(Level::Subtask, subtask, task.subtasks.len())?;
        task.subtasks[pos].name = name;
        Ok(())
    }

    pub fn delete_subtasks(&mut self, group: usize, task: usize, subtasks: &[usize]) -> Result<()> {
        let task = self.task_mut(group, task)?;
        let positions = unique_positions(Level::Subtask, subtasks, task.subtasks.len())?;
        remove_positions(&mut task.subtasks, &positions);
        Ok(())
    }

    /// Drops every group.
    pub fn reset(&mut self) {
        self.groups_mut().clear();
    }
}

fn new_task(name: &str, subtasks: &[String], today: NaiveDate) -> Result<Task> {
    let name = clean_name(name)?;
    let subtasks = clean_names(subtasks)?;
    Ok(Task::new(name).started(today).with_subtasks(subtasks))
}

/// Collapses every run of whitespace, tabs and newlines included, to one space.
fn clean_name(name: &str) -> Result<String> {
    let name = name.split_whitespace().join(" ");
    if name.is_empty() {
        return Err(Error::EmptyNameNotAllowed);
    }
    Ok(name)
}

fn clean_names(names: &[String]) -> Result<Vec<String>> {
    names.iter().map(|name| clean_name(name)).collect()
}

/// Resolves a whole batch up front. Positions come back deduplicated and in
/// descending order; any bad index fails the batch.
fn unique_positions(level: Level, indices: &[usize], len: usize) -> Result<Vec<usize>> {
    let positions = indices
        .iter()
        .map(|&index| position(level, index, len))
        .collect::<Result<Vec<_>>>()?;
    Ok(positions.into_iter().sorted_unstable().rev().dedup().collect())
}

fn remove_positions<T>(items: &mut Vec<T>, descending: &[usize]) {
    for &pos in descending {
        items.remove(pos);
    }
}
