//! Line-oriented command loop over a [`ProjectBoard`].

use std::io::{BufRead, Write};

use thiserror::Error;

use projboard_projects::{Project, ProjectStatus};
use projboard_ui::{BoardError, Document, ProjectBoard, persons_phrase};

const HELP: &str = "\
commands:
  add <title> | <description> | <people>   submit the project form
  move <id-or-prefix> <active|finished>    drag a project onto a list and drop it
  hover <id-or-prefix> <active|finished>   drag a project over a list and leave
  list [active|finished]                   list projects
  show                                     print the rendered board
  dump                                     print all projects as JSON
  help                                     show this text
  quit                                     leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        title: String,
        description: String,
        people: String,
    },
    Move {
        project: String,
        status: ProjectStatus,
    },
    Hover {
        project: String,
        status: ProjectStatus,
    },
    List(Option<ProjectStatus>),
    Show,
    Dump,
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unknown status `{0}` (expected active or finished)")]
    Status(String),
}

fn parse_status(raw: &str) -> Result<ProjectStatus, ParseError> {
    raw.parse().map_err(|_| ParseError::Status(raw.to_string()))
}

fn parse_target(rest: &str, usage: &'static str) -> Result<(String, ProjectStatus), ParseError> {
    let mut words = rest.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some(project), Some(status), None) => Ok((project.to_string(), parse_status(status)?)),
        _ => Err(ParseError::Usage(usage)),
    }
}

impl Command {
    /// Parse one input line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match word.to_ascii_lowercase().as_str() {
            "add" => {
                let parts: Vec<&str> = rest.split('|').map(str::trim).collect();
                match parts.as_slice() {
                    [title, description, people] => Command::Add {
                        title: title.to_string(),
                        description: description.to_string(),
                        people: people.to_string(),
                    },
                    _ => return Err(ParseError::Usage("add <title> | <description> | <people>")),
                }
            }
            "move" => {
                let (project, status) = parse_target(rest, "move <id-or-prefix> <active|finished>")?;
                Command::Move { project, status }
            }
            "hover" => {
                let (project, status) =
                    parse_target(rest, "hover <id-or-prefix> <active|finished>")?;
                Command::Hover { project, status }
            }
            "list" if rest.is_empty() => Command::List(None),
            "list" => Command::List(Some(parse_status(rest)?)),
            "show" => Command::Show,
            "dump" => Command::Dump,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }

    fn mutates(&self) -> bool {
        matches!(self, Command::Add { .. } | Command::Move { .. })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    board: ProjectBoard<Document>,
    quiet: bool,
}

impl Shell {
    pub fn new(quiet: bool) -> Result<Self, BoardError> {
        Ok(Self {
            board: ProjectBoard::in_memory()?,
            quiet,
        })
    }

    pub fn board(&self) -> &ProjectBoard<Document> {
        &self.board
    }

    /// Run commands until `quit` or end of input.
    ///
    /// Command failures are reported on `out` and the loop carries on; only
    /// I/O failures end the session early.
    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> anyhow::Result<()> {
        for (number, line) in input.lines().enumerate() {
            let line = line?;
            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    tracing::debug!(line = number + 1, error = %err, "unparsable command");
                    writeln!(out, "error: {err}")?;
                    continue;
                }
            };

            if self.execute(&command, &mut out)? == Flow::Quit {
                break;
            }
        }
        out.flush()?;
        Ok(())
    }

    pub fn execute(&mut self, command: &Command, out: &mut impl Write) -> anyhow::Result<Flow> {
        match self.apply(command, out) {
            Ok(flow) => {
                self.flush_alerts(out)?;
                if command.mutates() && !self.quiet {
                    self.show(out)?;
                }
                Ok(flow)
            }
            Err(ShellError::Board(BoardError::Input(_))) => {
                self.flush_alerts(out)?;
                Ok(Flow::Continue)
            }
            Err(ShellError::Board(err)) => {
                writeln!(out, "error: {err}")?;
                Ok(Flow::Continue)
            }
            Err(ShellError::Io(err)) => Err(err.into()),
            Err(ShellError::Json(err)) => Err(err.into()),
        }
    }

    fn apply(&mut self, command: &Command, out: &mut impl Write) -> Result<Flow, ShellError> {
        match command {
            Command::Add {
                title,
                description,
                people,
            } => {
                let id = self.board.submit(title, description, people)?;
                writeln!(out, "added {id}")?;
            }
            Command::Move { project, status } => {
                let id = self.board.resolve(project)?;
                if self.board.drag_project(id, *status)? {
                    writeln!(out, "moved {id} to {status}")?;
                } else {
                    writeln!(out, "{id} already {status}")?;
                }
            }
            Command::Hover { project, status } => {
                let id = self.board.resolve(project)?;
                self.board.hover_project(id, *status)?;
                let list = self.board.list(*status);
                writeln!(out, "hovered {id} over {status} ({:?})", list.drag_state())?;
            }
            Command::List(filter) => {
                let snapshot = self.board.state().snapshot()?;
                for project in snapshot
                    .iter()
                    .filter(|p| filter.is_none_or(|status| p.status() == status))
                {
                    writeln!(out, "{}", summary_line(project))?;
                }
            }
            Command::Show => self.show(out)?,
            Command::Dump => {
                let snapshot = self.board.state().snapshot()?;
                let json = serde_json::to_string_pretty(snapshot.items())?;
                writeln!(out, "{json}")?;
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn show(&self, out: &mut impl Write) -> Result<(), ShellError> {
        let outline = self.board.with_host(|doc| doc.outline())?;
        write!(out, "{outline}")?;
        Ok(())
    }

    fn flush_alerts(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let alerts = self.board.with_host(|doc| doc.take_alerts())?;
        for alert in alerts {
            writeln!(out, "alert: {alert}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
enum ShellError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<projboard_state::StateError> for ShellError {
    fn from(err: projboard_state::StateError) -> Self {
        ShellError::Board(err.into())
    }
}

fn summary_line(project: &Project) -> String {
    format!(
        "{}  {:<8}  {}  ({} assigned)",
        project.id_typed(),
        project.status().as_str(),
        project.title(),
        persons_phrase(project.people())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(script: &str) -> (Shell, String) {
        let mut shell = Shell::new(true).unwrap();
        let mut out = Vec::new();
        shell.run(script.as_bytes(), &mut out).unwrap();
        (shell, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            Command::parse("add Build API | Design REST endpoints | 3").unwrap(),
            Some(Command::Add {
                title: "Build API".into(),
                description: "Design REST endpoints".into(),
                people: "3".into(),
            })
        );
        assert_eq!(
            Command::parse("  MOVE 0190 Finished ").unwrap(),
            Some(Command::Move {
                project: "0190".into(),
                status: ProjectStatus::Finished,
            })
        );
        assert_eq!(
            Command::parse("list active").unwrap(),
            Some(Command::List(Some(ProjectStatus::Active)))
        );
        assert_eq!(Command::parse("list").unwrap(), Some(Command::List(None)));
        assert_eq!(Command::parse("# comment").unwrap(), None);
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn rejects_malformed_commands() {
        assert!(matches!(Command::parse("add only a title"), Err(ParseError::Usage(_))));
        assert!(matches!(Command::parse("move abc"), Err(ParseError::Usage(_))));
        assert_eq!(
            Command::parse("move abc archived"),
            Err(ParseError::Status("archived".into()))
        );
        assert_eq!(Command::parse("fly"), Err(ParseError::Unknown("fly".into())));
    }

    #[test]
    fn add_then_move_by_prefix() {
        let (shell, _) = run("add Build API | Design REST endpoints | 3\n");
        let id = shell.board().state().snapshot().unwrap().items()[0].id_typed();

        let mut shell = shell;
        let mut out = Vec::new();
        let script = format!("move {} finished\nlist finished\n", &id.to_string()[..13]);
        shell.run(script.as_bytes(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains(&format!("moved {id} to finished")));
        assert!(out.contains("Build API  (3 Persons assigned)"));
        assert_eq!(
            shell.board().state().get(id).unwrap().unwrap().status(),
            ProjectStatus::Finished
        );
    }

    #[test]
    fn invalid_add_prints_the_alert() {
        let (shell, out) = run("add API | Design REST endpoints | 3\n");
        assert_eq!(out, "alert: Invalid input, please try again!\n");
        assert!(shell.board().state().is_empty());
    }

    #[test]
    fn unknown_project_is_reported_and_the_session_continues() {
        let (_, out) = run("move nope active\nhelp\n");
        assert!(out.starts_with("error: no project matches 'nope'\n"));
        assert!(out.contains("commands:"));
    }

    #[test]
    fn quit_stops_reading() {
        let (shell, _) = run("quit\nadd Build API | Design REST endpoints | 3\n");
        assert!(shell.board().state().is_empty());
    }

    #[test]
    fn dump_prints_json() {
        let (_, out) = run("add Build API | Design REST endpoints | 1\ndump\n");
        let json_start = out.find('[').unwrap();
        let value: serde_json::Value = serde_json::from_str(&out[json_start..]).unwrap();
        assert_eq!(value[0]["title"], "Build API");
        assert_eq!(value[0]["status"], "active");
        assert_eq!(value[0]["people"], 1);
    }

    #[test]
    fn mutations_print_the_board_unless_quiet() {
        let mut shell = Shell::new(false).unwrap();
        let mut out = Vec::new();
        shell
            .run("add Build API | Design REST endpoints | 1\n".as_bytes(), &mut out)
            .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("ul#active-project-list"));
        assert!(out.contains("\"1 Person assigned\""));
    }
}
