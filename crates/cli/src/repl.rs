//! Interactive command parsing.

/// One line of input to the interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SignIn(String),
    SignOut,
    Go(String),
    Refresh,
    ClosePopup,
    OpenButton,
    CloseButton,
    HideInline,
    Show,
    Views,
    Help,
    Quit,
}

pub const HELP: &str = "\
  signin <user>    sign a user in
  signout          sign the current user out
  go <view>        navigate to a view
  refresh          request content for the current view again
  close            dismiss the popup
  open             open the button-triggered overlay
  collapse         collapse the button-triggered overlay
  hide             hide the inline embed
  show             print what is on screen
  views            list navigable views
  help             this text
  quit             leave";

impl std::str::FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or_else(|| "empty command".to_string())?;
        let arg = words.next();
        if words.next().is_some() {
            return Err(format!("too many arguments for '{verb}'"));
        }

        let needs_arg = |what: &str| -> Result<String, String> {
            arg.map(str::to_string)
                .ok_or_else(|| format!("usage: {verb} <{what}>"))
        };
        let no_arg = |cmd: Command| -> Result<Command, String> {
            match arg {
                Some(_) => Err(format!("'{verb}' takes no argument")),
                None => Ok(cmd),
            }
        };

        match verb.to_ascii_lowercase().as_str() {
            "signin" | "login" => Ok(Self::SignIn(needs_arg("user")?)),
            "signout" | "logout" => no_arg(Self::SignOut),
            "go" | "nav" => Ok(Self::Go(needs_arg("view")?)),
            "refresh" => no_arg(Self::Refresh),
            "close" => no_arg(Self::ClosePopup),
            "open" => no_arg(Self::OpenButton),
            "collapse" => no_arg(Self::CloseButton),
            "hide" => no_arg(Self::HideInline),
            "show" => no_arg(Self::Show),
            "views" => no_arg(Self::Views),
            "help" | "?" => no_arg(Self::Help),
            "quit" | "exit" | ":q" => no_arg(Self::Quit),
            other => Err(format!("unknown command '{other}' (try 'help')")),
        }
    }
}
