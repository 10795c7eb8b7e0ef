//! Messages exchanged with the foreground loop: completion events posted by the
//! background walk, and commands typed by the user.

use std::path::PathBuf;

use crate::core::NodeTree;

/// Events sent from the background walk to the foreground thread.
#[derive(Debug)]
pub enum AppEvent {
    /// A walk finished; `tree` replaces the current tree wholesale.
    WalkCompleted { root: PathBuf, tree: NodeTree },
    /// The walk task itself failed (panicked or was cancelled).
    WalkFailed { root: PathBuf, error: String },
}

/// A command read from the interactive shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Tree,
    Toggle(Vec<usize>),
    CheckAll,
    UncheckAll,
    Generate,
    Save(PathBuf),
    Preview(usize),
    Refresh,
    Wait,
    Open(PathBuf),
    Recent(Option<usize>),
    ListPatterns,
    AddPattern(String),
    RemovePattern(String),
    MaxLines(usize),
    ExportConfig(PathBuf),
    ImportConfig(PathBuf),
    Status,
    Json,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb {
            "tree" | "ls" => Self::Tree,
            "toggle" | "t" => Self::Toggle(parse_rows(rest)?),
            "check-all" => Self::CheckAll,
            "uncheck-all" => Self::UncheckAll,
            "generate" | "copy" => Self::Generate,
            "save" => Self::Save(PathBuf::from(required(rest, "save <file>")?)),
            "preview" => Self::Preview(parse_number(required(rest, "preview <row>")?)?),
            "refresh" => Self::Refresh,
            "wait" => Self::Wait,
            "open" | "cd" => Self::Open(PathBuf::from(required(rest, "open <directory>")?)),
            "recent" if rest.is_empty() => Self::Recent(None),
            "recent" => Self::Recent(Some(parse_number(rest)?)),
            "ignore" => match rest.split_once(char::is_whitespace) {
                Some(("add", pattern)) => Self::AddPattern(pattern.trim().to_string()),
                Some(("remove", pattern)) => Self::RemovePattern(pattern.trim().to_string()),
                None if rest.is_empty() => Self::ListPatterns,
                _ => return Err("usage: ignore [add|remove <pattern>]".to_string()),
            },
            "max-lines" => Self::MaxLines(parse_number(required(rest, "max-lines <n>")?)?),
            "export-config" => {
                Self::ExportConfig(PathBuf::from(required(rest, "export-config <file>")?))
            }
            "import-config" => {
                Self::ImportConfig(PathBuf::from(required(rest, "import-config <file>")?))
            }
            "status" => Self::Status,
            "json" => Self::Json,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(format!("unknown command: {other} (try `help`)")),
        };
        Ok(Some(command))
    }
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(rest)
    }
}

fn parse_number(text: &str) -> Result<usize, String> {
    text.trim()
        .parse()
        .map_err(|_| format!("not a number: {text}"))
}

fn parse_rows(text: &str) -> Result<Vec<usize>, String> {
    let rows = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(parse_number)
        .collect::<Result<Vec<_>, _>>()?;
    if rows.is_empty() {
        return Err("usage: toggle <row>...".to_string());
    }
    Ok(rows)
}

pub const HELP: &str = "\
Commands:
  tree | ls                 show the tree with checkboxes
  toggle <row>...           toggle rows (directories apply to their contents)
  check-all | uncheck-all   select or clear everything
  generate | copy           print the output text
  save <file>               write the output text to a file
  preview <row>             show the content of a file row
  refresh                   re-read the directory (clears the selection)
  wait                      block until a running refresh finishes
  open <directory>          switch to another directory
  recent [n]                list recent directories, or open the n-th
  ignore                    list ignore patterns
  ignore add|remove <p>     edit ignore patterns (triggers a refresh)
  max-lines <n>             line cap for embedded content (0 = unlimited)
  export-config <file>      write the settings to a JSON file
  import-config <file>      load settings from a JSON file (triggers a refresh)
  status                    show the status line
  json                      print the current view as JSON
  help                      show this help
  quit | exit               save settings and leave
";
