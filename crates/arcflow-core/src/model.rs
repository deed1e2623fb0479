//! In-memory board: groups own tasks, tasks own subtasks.
//!
//! Nothing here stores an index. Every 1-based reference a user types is
//! resolved against the current order of the containing sequence, so the
//! numbers shown on screen are always whatever position an item holds now.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::{Error, Level, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    #[strum(serialize = "TODO")]
    Todo,
    #[strum(serialize = "IN-PROGRESS")]
    InProgress,
    #[strum(serialize = "DONE")]
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub name: String,
    #[serde(default)]
    pub done: bool,
}

impl Subtask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub important: bool,
    /// Day the task was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    /// Day the task was last set to done; cleared when it leaves that state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: Status::Todo,
            important: false,
            start: None,
            end: None,
            subtasks: Vec::new(),
        }
    }

    pub fn started(mut self, day: NaiveDate) -> Self {
        self.start = Some(day);
        self
    }

    pub fn with_subtasks<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subtasks.extend(names.into_iter().map(Subtask::new));
        self
    }

    pub fn subtask(&self, index: usize) -> Result<&Subtask> {
        let pos = position(Level::Subtask, index, self.subtasks.len())?;
        Ok(&self.subtasks[pos])
    }

    pub fn is_done(&self) -> bool {
        self.status == Status::Done
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn task(&self, index: usize) -> Result<&Task> {
        let pos = position(Level::Task, index, self.tasks.len())?;
        Ok(&self.tasks[pos])
    }

    pub fn tally(&self) -> Tally {
        self.tasks.iter().map(|task| task.status).collect()
    }
}

/// The whole persisted collection. Serializes as a bare JSON array of groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    groups: Vec<Group>,
}

impl From<Vec<Group>> for Board {
    fn from(groups: Vec<Group>) -> Self {
        Self { groups }
    }
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, group: usize) -> Result<&Group> {
        let pos = position(Level::Group, group, self.groups.len())?;
        Ok(&self.groups[pos])
    }

    pub fn task(&self, group: usize, task: usize) -> Result<&Task> {
        self.group(group)?.task(task)
    }

    pub fn subtask(&self, group: usize, task: usize, subtask: usize) -> Result<&Subtask> {
        self.task(group, task)?.subtask(subtask)
    }

    pub fn tally(&self) -> Tally {
        self.groups
            .iter()
            .flat_map(|group| group.tasks.iter())
            .map(|task| task.status)
            .collect()
    }

    pub(crate) fn groups_mut(&mut self) -> &mut Vec<Group> {
        &mut self.groups
    }

    pub(crate) fn group_mut(&mut self, group: usize) -> Result<&mut Group> {
        let pos = position(Level::Group, group, self.groups.len())?;
        Ok(&mut self.groups[pos])
    }

    pub(crate) fn task_mut(&mut self, group: usize, task: usize) -> Result<&mut Task> {
        let group = self.group_mut(group)?;
        let pos = position(Level::Task, task, group.tasks.len())?;
        Ok(&mut group.tasks[pos])
    }
}

/// Task counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.done
    }

    /// Share of done tasks, rounded to the nearest whole percent.
    pub fn percent_done(&self) -> usize {
        match self.total() {
            0 => 0,
            total => (self.done * 100 + total / 2) / total,
        }
    }
}

impl FromIterator<Status> for Tally {
    fn from_iter<I: IntoIterator<Item = Status>>(iter: I) -> Self {
        iter.into_iter().fold(Tally::default(), |mut tally, status| {
            match status {
                Status::Todo => tally.todo += 1,
                Status::InProgress => tally.in_progress += 1,
                Status::Done => tally.done += 1,
            }
            tally
        })
    }
}

/// Turns a 1-based index into a 0-based position within `len` items.
pub(crate) fn position(level: Level, index: usize, len: usize) -> Result<usize> {
    if index == 0 || index > len {
        return Err(Error::IndexOutOfRange { level, index, len });
    }
    Ok(index - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Board {
        Board::from(vec![
            Group {
                name: "Home".to_string(),
                tasks: vec![Task::new("Buy milk").with_subtasks(["2 liters", "lactose free"])],
            },
            Group::new("Work"),
        ])
    }

    #[test]
    fn test_lookup_resolves_one_based_indices() {
        let board = sample();
        assert_eq!(board.group(1).unwrap().name, "Home");
        assert_eq!(board.group(2).unwrap().name, "Work");
        assert_eq!(board.task(1, 1).unwrap().name, "Buy milk");
        assert_eq!(board.subtask(1, 1, 2).unwrap().name, "lactose free");
    }

    #[test]
    fn test_lookup_out_of_range() {
        let board = sample();
        let before = board.clone();

        match board.group(5) {
            Err(Error::IndexOutOfRange { level, index, len }) => {
                assert_eq!(level, Level::Group);
                assert_eq!(index, 5);
                assert_eq!(len, 2);
            }
            other => panic!("expected IndexOutOfRange, got {:?}", other),
        }
        assert!(matches!(
            board.group(0),
            Err(Error::IndexOutOfRange { index: 0, .. })
        ));
        assert!(matches!(
            board.task(2, 1),
            Err(Error::IndexOutOfRange {
                level: Level::Task,
                len: 0,
                ..
            })
        ));
        assert!(matches!(
            board.subtask(1, 1, 3),
            Err(Error::IndexOutOfRange {
                level: Level::Subtask,
                ..
            })
        ));
        assert_eq!(board, before);
    }

    #[test]
    fn test_tally_counts_statuses() {
        let mut board = sample();
        let tasks = &mut board.groups_mut()[0].tasks;
        tasks.push(Task::new("Laundry"));
        tasks.push(Task::new("Dishes"));
        tasks[1].status = Status::Done;
        tasks[2].status = Status::InProgress;

        let tally = board.tally();
        assert_eq!(tally.todo, 1);
        assert_eq!(tally.in_progress, 1);
        assert_eq!(tally.done, 1);
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.percent_done(), 33);
        assert_eq!(Tally::default().percent_done(), 0);
    }

    #[test]
    fn test_json_shape_has_no_indices() {
        let board = sample();
        let value = serde_json::to_value(&board).unwrap();

        let groups = value.as_array().expect("board is a JSON array");
        assert_eq!(groups.len(), 2);
        assert!(groups[0].get("idx").is_none());
        assert_eq!(groups[0]["tasks"][0]["status"], "todo");
        assert_eq!(groups[0]["tasks"][0]["important"], false);
        assert_eq!(groups[0]["tasks"][0]["subtasks"][1]["done"], false);
        assert!(groups[0]["tasks"][0].get("start").is_none());
    }

    #[test]
    fn test_status_wire_and_display_names() {
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(Status::InProgress.to_string(), "IN-PROGRESS");
        assert_eq!(Status::default(), Status::Todo);
    }
}
