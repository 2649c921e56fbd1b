use crate::core::error::CommandError;

/// One line of console input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login {
        id: String,
        password: String,
        two_step_code: Option<String>,
    },
    Logout,
    WhoAmI,
    List,
    Open(String),
    MarkRead(String),
    MarkUnread(String),
    Toggle(String),
    Delete(String),
    /// `target` is an action name or a 1-based button number
    Action { id: String, target: String },
    ClearRead,
    ClearAll,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  login <id> <password> [code]   log in (quote a password containing spaces)
  logout                         end the session
  whoami                         show the logged-in staff member
  list                           show the inbox, newest first
  open <nid>                     show a notification and mark it read
  read <nid> | unread <nid>      set the read flag
  toggle <nid>                   flip the read flag
  delete <nid>                   delete a notification
  action <nid> <name|number>     run a notification button
  clear-read                     delete every read notification
  clear-all                      delete every notification
  help                           show this text
  quit                           exit";

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut args = tokenize(line)?.into_iter();
        let name = args.next().ok_or(CommandError::Empty)?;

        let command = match name.to_ascii_lowercase().as_str() {
            "login" => {
                let id = required(&mut args, "id")?;
                let password = required(&mut args, "password")?;
                let two_step_code = args.next();
                Command::Login { id, password, two_step_code }
            }
            "logout" => Command::Logout,
            "whoami" => Command::WhoAmI,
            "list" | "ls" => Command::List,
            "open" => Command::Open(required(&mut args, "notification id")?),
            "read" => Command::MarkRead(required(&mut args, "notification id")?),
            "unread" => Command::MarkUnread(required(&mut args, "notification id")?),
            "toggle" => Command::Toggle(required(&mut args, "notification id")?),
            "delete" | "rm" => Command::Delete(required(&mut args, "notification id")?),
            "action" => {
                let id = required(&mut args, "notification id")?;
                let target = required(&mut args, "action")?;
                Command::Action { id, target }
            }
            "clear-read" => Command::ClearRead,
            "clear-all" => Command::ClearAll,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };

        Ok(command)
    }
}

fn required(args: &mut impl Iterator<Item = String>, what: &'static str) -> Result<String, CommandError> {
    args.next().ok_or(CommandError::MissingArgument(what))
}

/// Split a line on whitespace, keeping double-quoted runs together
///
/// `""` yields an empty argument; quotes may not be escaped.
fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_quotes {
        return Err(CommandError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }

    Ok(tokens)
}
