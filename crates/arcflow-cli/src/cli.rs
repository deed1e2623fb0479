use std::path::PathBuf;

use arcflow_core::{Operation, Status};
use clap::error::ErrorKind;
use clap::{ArgGroup, Args, CommandFactory, Parser, Subcommand};

/// arcflow: short-term task objectives, one terminal command away.
///
/// Groups, tasks and subtasks are addressed by the 1-based numbers shown on
/// the board. Only one command runs per invocation.
#[derive(Debug, Parser)]
#[command(name = "arcflow", version, about)]
#[command(group(
    ArgGroup::new("view")
        .args(["board", "reset", "mark", "show", "tick", "ls_sub"])
        .multiple(false)
))]
pub struct Cli {
    /// Show board with subtasks
    #[arg(short, long)]
    pub board: bool,

    /// Reset tasks board
    #[arg(short, long)]
    pub reset: bool,

    /// Mark/unmark task as important
    #[arg(long, num_args = 2, value_names = ["GROUP", "TASK"])]
    pub mark: Option<Vec<usize>>,

    /// Show group, task or subtask
    #[arg(long, num_args = 1..=3, value_name = "IDX")]
    pub show: Option<Vec<usize>>,

    /// Tick/untick subtask(s) as done: GROUP TASK SUBTASK...
    #[arg(long, num_args = 3.., value_name = "IDX")]
    pub tick: Option<Vec<usize>>,

    /// List numbered subtasks
    #[arg(long = "ls-sub", num_args = 2, value_names = ["GROUP", "TASK"])]
    pub ls_sub: Option<Vec<usize>>,

    /// Do not ask before destructive commands
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Log to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use DIR instead of ~/.arcflow
    #[arg(long, global = true, hide = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create group/task or assign task
    Add(AddArgs),
    /// Rename group or task
    Rename(RenameArgs),
    /// Delete group(s) or task(s)
    Delete(DeleteArgs),
    /// Set task(s) progress
    Set(SetArgs),
    /// Add/rename/delete subtask(s)
    Sub(SubArgs),
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("target").args(["new", "assign"]).required(true)))]
pub struct AddArgs {
    /// Select group (in conjunction with --assign)
    #[arg(short, long, value_name = "IDX", requires = "assign")]
    pub group: Option<usize>,

    /// Create new group: GROUP TASK [SUBTASK...]
    #[arg(long, num_args = 2.., value_name = "NAME", conflicts_with = "group")]
    pub new: Option<Vec<String>>,

    /// Assign task to the group: TASK [SUBTASK...]
    #[arg(long, num_args = 1.., value_name = "NAME", requires = "group")]
    pub assign: Option<Vec<String>>,
}

#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Group to rename, or the group holding the task
    #[arg(short, long, value_name = "IDX")]
    pub group: usize,

    /// Task to rename
    #[arg(short, long, value_name = "IDX")]
    pub task: Option<usize>,

    /// New name
    #[arg(required = true, num_args = 1..)]
    pub name: Vec<String>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Groups to delete, or the single group holding the tasks
    #[arg(short, long, num_args = 1.., required = true, value_name = "IDX")]
    pub group: Vec<usize>,

    /// Tasks to delete
    #[arg(short, long, num_args = 1.., value_name = "IDX")]
    pub task: Vec<usize>,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("progress").args(["done", "inprog", "todo"]).required(true)))]
pub struct SetArgs {
    /// Select group
    #[arg(short, long, value_name = "IDX")]
    pub group: usize,

    /// Change task(s) progress to done
    #[arg(long, num_args = 1.., value_name = "IDX")]
    pub done: Option<Vec<usize>>,

    /// Change task(s) progress to in-progress
    #[arg(long, num_args = 1.., value_name = "IDX")]
    pub inprog: Option<Vec<usize>>,

    /// Change task(s) progress back to todo
    #[arg(long, num_args = 1.., value_name = "IDX")]
    pub todo: Option<Vec<usize>>,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("change").args(["add", "rename", "delete"]).required(true)))]
pub struct SubArgs {
    /// GROUP TASK, plus SUBTASK when renaming
    #[arg(long, num_args = 2..=3, required = true, value_name = "IDX")]
    pub idx: Vec<usize>,

    /// Add subtask(s)
    #[arg(long, num_args = 1.., value_name = "NAME")]
    pub add: Option<Vec<String>>,

    /// Rename subtask
    #[arg(long, num_args = 1.., value_name = "NAME")]
    pub rename: Option<Vec<String>>,

    /// Delete subtask(s)
    #[arg(long, num_args = 1.., value_name = "IDX")]
    pub delete: Option<Vec<usize>>,
}

/// What a single invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Board { with_subtasks: bool },
    ShowGroup(usize),
    ShowTask(usize, usize),
    ShowSubtask(usize, usize, usize),
    ListSubtasks(usize, usize),
    Change { op: Operation, confirm: bool },
}

impl Cli {
    /// Checks the combinations clap cannot express and turns the arguments
    /// into a [`Request`].
    pub fn request(&self) -> Result<Request, clap::Error> {
        let has_view = self.board
            || self.reset
            || self.mark.is_some()
            || self.show.is_some()
            || self.tick.is_some()
            || self.ls_sub.is_some();
        if has_view && self.command.is_some() {
            return Err(usage(
                ErrorKind::ArgumentConflict,
                "only one command allowed per execution",
            ));
        }

        if let Some(command) = &self.command {
            return command.request();
        }

        let request = if self.reset {
            Request::Change {
                op: Operation::Reset,
                confirm: true,
            }
        } else if let Some(mark) = &self.mark {
            change(Operation::ToggleMark {
                group: mark[0],
                task: mark[1],
            })
        } else if let Some(tick) = &self.tick {
            change(Operation::TickSubtasks {
                group: tick[0],
                task: tick[1],
                subtasks: tick[2..].to_vec(),
            })
        } else if let Some(show) = &self.show {
            match show.as_slice() {
                [group] => Request::ShowGroup(*group),
                [group, task] => Request::ShowTask(*group, *task),
                [group, task, subtask] => Request::ShowSubtask(*group, *task, *subtask),
                _ => unreachable!("clap limits --show to 1..=3 values"),
            }
        } else if let Some(ls_sub) = &self.ls_sub {
            Request::ListSubtasks(ls_sub[0], ls_sub[1])
        } else {
            Request::Board {
                with_subtasks: self.board,
            }
        };
        Ok(request)
    }
}

impl Command {
    fn request(&self) -> Result<Request, clap::Error> {
        let request = match self {
            Command::Add(args) => match (&args.new, &args.assign, args.group) {
                (Some(new), _, _) => change(Operation::CreateGroup {
                    name: new[0].clone(),
                    task: new[1].clone(),
                    subtasks: new[2..].to_vec(),
                }),
                (None, Some(assign), Some(group)) => change(Operation::AssignTask {
                    group,
                    task: assign[0].clone(),
                    subtasks: assign[1..].to_vec(),
                }),
                _ => {
                    return Err(usage(
                        ErrorKind::MissingRequiredArgument,
                        "--assign must be used together with -g/--group",
                    ))
                }
            },
            Command::Rename(args) => {
                let name = args.name.join(" ");
                match args.task {
                    Some(task) => change(Operation::RenameTask {
                        group: args.group,
                        task,
                        name,
                    }),
                    None => change(Operation::RenameGroup {
                        group: args.group,
                        name,
                    }),
                }
            }
            Command::Delete(args) => {
                let op = if args.task.is_empty() {
                    Operation::DeleteGroups {
                        groups: args.group.clone(),
                    }
                } else if let [group] = args.group.as_slice() {
                    Operation::DeleteTasks {
                        group: *group,
                        tasks: args.task.clone(),
                    }
                } else {
                    return Err(usage(
                        ErrorKind::WrongNumberOfValues,
                        "-g/--group takes exactly one value together with -t/--task",
                    ));
                };
                Request::Change { op, confirm: true }
            }
            Command::Set(args) => {
                let (tasks, status) = match (&args.done, &args.inprog, &args.todo) {
                    (Some(tasks), _, _) => (tasks, Status::Done),
                    (_, Some(tasks), _) => (tasks, Status::InProgress),
                    (_, _, Some(tasks)) => (tasks, Status::Todo),
                    _ => unreachable!("clap requires one of --done, --inprog or --todo"),
                };
                change(Operation::SetStatus {
                    group: args.group,
                    tasks: tasks.clone(),
                    status,
                })
            }
            Command::Sub(args) => sub_request(args)?,
        };
        Ok(request)
    }
}

fn sub_request(args: &SubArgs) -> Result<Request, clap::Error> {
    let op = match (args.idx.as_slice(), &args.rename) {
        ([group, task, subtask], Some(name)) => Operation::RenameSubtask {
            group: *group,
            task: *task,
            subtask: *subtask,
            name: name.join(" "),
        },
        (_, Some(_)) => {
            return Err(usage(
                ErrorKind::WrongNumberOfValues,
                "--idx takes GROUP TASK SUBTASK together with --rename",
            ))
        }
        ([group, task], None) => match (&args.add, &args.delete) {
            (Some(names), _) => Operation::AddSubtasks {
                group: *group,
                task: *task,
                names: names.clone(),
            },
            (_, Some(subtasks)) => Operation::DeleteSubtasks {
                group: *group,
                task: *task,
                subtasks: subtasks.clone(),
            },
            _ => unreachable!("clap requires one of --add, --rename or --delete"),
        },
        _ => {
            return Err(usage(
                ErrorKind::WrongNumberOfValues,
                "--idx takes GROUP TASK together with --add/--delete",
            ))
        }
    };
    Ok(change(op))
}

fn change(op: Operation) -> Request {
    Request::Change { op, confirm: false }
}

fn usage(kind: ErrorKind, message: &str) -> clap::Error {
    Cli::command().error(kind, message)
}
