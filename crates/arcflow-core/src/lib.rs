//! # arcflow core
//!
//! Board model, mutations and text rendering for the arcflow task board.
//! Nothing in here touches the terminal or the process; the binary crate
//! wires these pieces to the command line.
//!
//! ## Modules
//!
//! - `model`: groups, tasks and subtasks, with lookup by 1-based index
//! - `engine`: operations that change the board, all-or-nothing per call
//! - `render`: terminal text views with width-aware wrapping
//! - `storage`: loading and saving the JSON board file
//! - `settings`: optional `config.toml` with display preferences
//! - `paths`: the per-user data directory

pub mod engine;
pub mod error;
pub mod model;
pub mod paths;
pub mod render;
pub mod settings;
pub mod storage;

pub use engine::Operation;
pub use error::{Error, Level, Result};
pub use model::{Board, Group, Status, Subtask, Task, Tally};
pub use paths::AppPaths;
pub use render::Renderer;
pub use settings::{AnsiMode, Settings};
pub use storage::Store;
