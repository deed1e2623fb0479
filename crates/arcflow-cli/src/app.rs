use std::io::{IsTerminal, Write};

use anyhow::{bail, Context, Result};
use arcflow_core::{AppPaths, Board, Renderer, Settings, Store};
use chrono::Local;
use dialoguer::Confirm;
use tracing::{debug, info};

use crate::cli::Request;

const FALLBACK_WIDTH: usize = 80;

/// One invocation: load the board, serve the request, save if it changed.
pub struct App {
    settings: Settings,
    store: Store,
    assume_yes: bool,
}

impl App {
    pub fn new(paths: &AppPaths, assume_yes: bool) -> Result<Self> {
        let settings_file = paths.settings_file();
        let settings = Settings::load(&settings_file)
            .with_context(|| format!("failed to load {}", settings_file.display()))?;
        debug!(?settings, dir = %paths.dir().display(), "settings loaded");

        Ok(Self {
            settings,
            store: Store::new(paths.store_file()),
            assume_yes,
        })
    }

    pub fn run(&self, request: Request, out: &mut impl Write) -> Result<()> {
        let board = self.store.load()?;
        let renderer = self.renderer();

        let text = match request {
            Request::Board { with_subtasks } => renderer.board(&board, with_subtasks),
            Request::ShowGroup(group) => renderer.group(&board, group)?,
            Request::ShowTask(group, task) => renderer.task(&board, group, task)?,
            Request::ShowSubtask(group, task, subtask) => {
                renderer.subtask(&board, group, task, subtask)?
            }
            Request::ListSubtasks(group, task) => renderer.subtask_list(&board, group, task)?,
            Request::Change { op, confirm } => {
                // Bad indices fail before anyone is asked to confirm.
                let mut changed = board.clone();
                changed.apply(op, Local::now().date_naive())?;
                if confirm && !self.confirm(&board)? {
                    bail!("aborted");
                }
                self.store.save(&changed)?;
                info!("board updated");
                renderer.board(&changed, false)
            }
        };

        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    fn renderer(&self) -> Renderer {
        let width = self
            .settings
            .width
            .map(usize::from)
            .or_else(|| crossterm::terminal::size().ok().map(|(cols, _)| usize::from(cols)))
            .filter(|&cols| cols > 0)
            .unwrap_or(FALLBACK_WIDTH);
        let ansi = self.settings.use_ansi(std::io::stdout().is_terminal());
        debug!(width, ansi, "renderer configured");

        Renderer::new(width)
            .with_ansi(ansi)
            .with_dates(self.settings.dates)
    }

    fn confirm(&self, board: &Board) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        eprintln!(
            "You are about to remove objective(s) from a board of {} group(s).",
            board.groups().len()
        );
        Confirm::new()
            .with_prompt("Do you want to proceed?")
            .default(false)
            .interact()
            .context("confirmation needs an interactive terminal, pass --yes to skip it")
    }
}
