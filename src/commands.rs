//! Line commands of the interactive shell.

use std::path::PathBuf;

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    /// Drop files on the drop zone
    Drop(Vec<PathBuf>),
    /// Choose files in the picker
    Pick(Vec<PathBuf>),
    /// Start dragging over the drop zone
    DragEnter,
    /// Drag left the drop zone
    DragLeave,
    /// Show/hide the mask
    Toggle,
    /// Move the opacity slider
    Opacity(f32),
    /// Export the composite PNG
    Export(PathBuf),
    /// Render the screen again
    Show,
    Help,
    Quit,
}

pub const HELP_TEXT: &str = "\
Commands:
  drop <path>...   drop files on the drop zone (first one is uploaded)
  pick <path>...   choose files in the picker (disabled while processing)
  enter | leave    drag over / away from the drop zone
  toggle           show or hide the mask
  opacity <0..1>   set mask opacity (step 0.1)
  export <png>     save base image with the overlay applied
  show             render the screen
  help             this text
  quit             exit";

impl ShellCommand {
    /// Parse a line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let paths = |name: &str| -> Result<Vec<PathBuf>, String> {
            if rest.is_empty() {
                Err(format!("'{name}' needs at least one path"))
            } else {
                Ok(rest.iter().map(PathBuf::from).collect())
            }
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "drop" => ShellCommand::Drop(paths("drop")?),
            "pick" | "open" => ShellCommand::Pick(paths("pick")?),
            "enter" => ShellCommand::DragEnter,
            "leave" => ShellCommand::DragLeave,
            "toggle" | "t" => ShellCommand::Toggle,
            "opacity" | "o" => {
                let value = rest
                    .first()
                    .ok_or_else(|| "'opacity' needs a value between 0 and 1".to_string())?;
                let value: f32 = value
                    .parse()
                    .map_err(|_| format!("'{value}' is not a number"))?;
                ShellCommand::Opacity(value)
            }
            "export" => {
                let path = rest
                    .first()
                    .ok_or_else(|| "'export' needs an output path".to_string())?;
                ShellCommand::Export(PathBuf::from(path))
            }
            "show" | "s" => ShellCommand::Show,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => return Err(format!("Unknown command '{other}' (try 'help')")),
        };
        Ok(Some(command))
    }
}
