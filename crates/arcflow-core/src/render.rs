//! Plain-text views of the board.
//!
//! Rows are laid out column by column: margin, index, status glyph, the
//! optional date columns, then the name. Names never get cut short; they wrap
//! onto continuation lines indented to the column where the name began.
//! Layout is computed on plain text and ANSI styling is added afterwards, so
//! escape codes never count towards the width.

use chrono::NaiveDate;
use crossterm::style::Stylize;
use itertools::Itertools;
use textwrap::{Options, WordSeparator, WordSplitter};
use unicode_width::UnicodeWidthStr;

use crate::error::Result;
use crate::model::{Board, Group, Status, Subtask, Task, Tally};

const MARGIN: &str = "    ";
const MIN_TEXT_WIDTH: usize = 10;
const DATE_FORMAT: &str = "%d-%b-%Y";
const DATE_WIDTH: usize = 11;
const IMPORTANT: &str = "[!] ";

/// Narrowest terminal that still gets the start/end date columns.
pub const DATES_MIN_WIDTH: usize = 72;

pub const EMPTY_BOARD: &str = "No tasks assigned, create one with 'add --new' command.";
pub const NO_SUBTASKS: &str = "No subtasks assigned to the task.";

pub fn status_glyph(status: Status) -> &'static str {
    match status {
        Status::Todo => "☐",
        Status::InProgress => "…",
        Status::Done => "✔",
    }
}

pub fn check_glyph(done: bool) -> &'static str {
    if done {
        "✔"
    } else {
        "☐"
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    width: usize,
    ansi: bool,
    dates: bool,
}

impl Renderer {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            ansi: false,
            dates: true,
        }
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    pub fn with_dates(mut self, dates: bool) -> Self {
        self.dates = dates;
        self
    }

    fn shows_dates(&self) -> bool {
        self.dates && self.width >= DATES_MIN_WIDTH
    }

    /// Every group and task, followed by the overall statistics.
    pub fn board(&self, board: &Board, with_subtasks: bool) -> String {
        if board.is_empty() {
            return finish(vec![EMPTY_BOARD.to_string()]);
        }

        let mut lines = Vec::new();
        for (pos, group) in board.groups().iter().enumerate() {
            self.group_lines(&mut lines, pos + 1, group, with_subtasks);
        }
        self.summary_lines(&mut lines, board.tally());
        finish(lines)
    }

    /// One group with all of its tasks and subtasks.
    pub fn group(&self, board: &Board, group: usize) -> Result<String> {
        let mut lines = Vec::new();
        self.group_lines(&mut lines, group, board.group(group)?, true);
        Ok(finish(lines))
    }

    pub fn task(&self, board: &Board, group: usize, task: usize) -> Result<String> {
        let found = board.task(group, task)?;
        let mut lines = vec![self.headline()];
        self.task_lines(&mut lines, task, found, true);
        Ok(finish(lines))
    }

    pub fn subtask(
        &self,
        board: &Board,
        group: usize,
        task: usize,
        subtask: usize,
    ) -> Result<String> {
        let found = board.subtask(group, task, subtask)?;
        let mut lines = Vec::new();
        let prefix = format!("{MARGIN}{subtask:>2}. {} ", check_glyph(found.done));
        self.wrap_into(&mut lines, &prefix, None, &found.name, found.done);
        Ok(finish(lines))
    }

    /// Numbered subtasks of one task, ready to be referenced by index.
    pub fn subtask_list(&self, board: &Board, group: usize, task: usize) -> Result<String> {
        let found = board.task(group, task)?;
        if found.subtasks.is_empty() {
            return Ok(finish(vec![NO_SUBTASKS.to_string()]));
        }

        let mut lines = Vec::new();
        for (pos, subtask) in found.subtasks.iter().enumerate() {
            let prefix = format!("{MARGIN}{:>2}. {} ", pos + 1, check_glyph(subtask.done));
            self.wrap_into(&mut lines, &prefix, None, &subtask.name, subtask.done);
        }
        Ok(finish(lines))
    }

    fn group_lines(
        &self,
        lines: &mut Vec<String>,
        index: usize,
        group: &Group,
        with_subtasks: bool,
    ) {
        let tally = group.tally();
        let title = format!("{} [{}/{}]", group.name, tally.done, tally.total());

        lines.push(String::new());
        self.wrap_into(lines, &format!("{MARGIN}#{index} "), None, &title, false);
        if group.tasks.is_empty() {
            return;
        }
        lines.push(self.headline());
        for (pos, task) in group.tasks.iter().enumerate() {
            self.task_lines(lines, pos + 1, task, with_subtasks);
        }
    }

    fn headline(&self) -> String {
        let mut head = format!("{:>3} {} ", "id", "s");
        if self.shows_dates() {
            head.push_str(&format!("{:<w$} {:<w$} ", "start", "end", w = DATE_WIDTH));
        }
        head.push_str("task");

        let span = self.width.saturating_sub(MARGIN.len());
        let head = format!("{head:<span$}");
        if self.ansi {
            format!("{MARGIN}{}", head.as_str().reverse())
        } else {
            format!("{MARGIN}{head}")
        }
    }

    fn task_lines(&self, lines: &mut Vec<String>, index: usize, task: &Task, with_subtasks: bool) {
        let mut prefix = format!("{MARGIN}{index:>3} {} ", status_glyph(task.status));
        if self.shows_dates() {
            prefix.push_str(&format!(
                "{:<w$} {:<w$} ",
                format_date(task.start),
                format_date(task.end),
                w = DATE_WIDTH
            ));
        }
        let name_column = prefix.width();
        if task.important {
            prefix.push_str(IMPORTANT);
        }

        self.wrap_into(lines, &prefix, None, &task.name, task.is_done());
        if with_subtasks {
            self.subtask_tree(lines, name_column, &task.subtasks);
        }
    }

    fn subtask_tree(&self, lines: &mut Vec<String>, column: usize, subtasks: &[Subtask]) {
        let pad = " ".repeat(column);
        let last = subtasks.len().saturating_sub(1);
        for (pos, subtask) in subtasks.iter().enumerate() {
            let (branch, guide) = if pos == last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            let first = format!("{pad}{branch}{} ", check_glyph(subtask.done));
            let rest = format!("{pad}{guide}  ");
            self.wrap_into(lines, &first, Some(&rest), &subtask.name, subtask.done);
        }
    }

    fn summary_lines(&self, lines: &mut Vec<String>, tally: Tally) {
        lines.push(String::new());
        lines.push(format!(
            "{MARGIN}[{}/{}] - {}% of all tasks complete.",
            tally.done,
            tally.total(),
            tally.percent_done()
        ));
        lines.push(format!(
            "{MARGIN}{} • {} • {}",
            self.underline(format!("[{}] {}", tally.done, Status::Done)),
            self.underline(format!("[{}] {}", tally.in_progress, Status::InProgress)),
            self.underline(format!("[{}] {}", tally.todo, Status::Todo)),
        ));
    }

    /// Wraps `text` into the space left of the terminal after `first`.
    /// Continuation lines start with `rest`, or blanks as wide as `first`.
    fn wrap_into(
        &self,
        lines: &mut Vec<String>,
        first: &str,
        rest: Option<&str>,
        text: &str,
        done: bool,
    ) {
        let indent = first.width();
        let blank;
        let rest = match rest {
            Some(rest) => rest,
            None => {
                blank = " ".repeat(indent);
                &blank
            }
        };

        let available = self.width.saturating_sub(indent).max(MIN_TEXT_WIDTH);
        let options = Options::new(available)
            .word_separator(WordSeparator::AsciiSpace)
            .word_splitter(WordSplitter::NoHyphenation)
            .break_words(true);

        // Stored names may carry tabs or newlines from a hand-edited file.
        let text = text.split_whitespace().join(" ");
        for (pos, piece) in textwrap::wrap(&text, options).iter().enumerate() {
            let prefix = if pos == 0 { first } else { rest };
            lines.push(format!("{prefix}{}", self.strike(piece, done)));
        }
    }

    fn strike(&self, text: &str, done: bool) -> String {
        if self.ansi && done {
            text.crossed_out().to_string()
        } else {
            text.to_string()
        }
    }

    fn underline(&self, text: String) -> String {
        if self.ansi {
            text.underlined().to_string()
        } else {
            text
        }
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format(DATE_FORMAT).to_string().to_uppercase(),
        None => "-".to_string(),
    }
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
