//! 一行输入 -> 一个命令。
//!
//! - 不以 `:` 开头的行逐字键入（joiner 字符照常触发提交）
//! - `:` 开头的是按键/点击命令，见 `HELP`
use chipster_core::key_event::InputEvent;
use thiserror::Error;

pub const HELP: &str = "\
plain text      type it character by character (`,` commits)
:enter          press Enter
:bs / :del      Backspace / Delete
:left :right    move chip highlight
:up :down       move suggestion selection
:esc            Escape
:focus :blur    focus / blur the input
:hide           deliver the pending blur-hide timeout
:pick N         click suggestion N (1-based)
:rm N           click the remove button of chip N (1-based)
:paste TEXT     paste TEXT
:set TEXT       replace the input with TEXT
:help           show this help
:q              quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Type(String),
    Key(InputEvent),
    /// 0-based 候选下标
    Pick(usize),
    /// 0-based 条目下标
    Remove(usize),
    FireHide,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("unknown command `:{0}` (try :help)")]
    Unknown(String),
    #[error("`:{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("`{0}` is not a 1-based index")]
    BadIndex(String),
}

pub fn parse(line: &str) -> Result<Command, ScriptError> {
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Command::Type(line.to_owned()));
    };
    let (name, arg) = match rest.split_once(' ') {
        Some((name, arg)) => (name, Some(arg)),
        None => (rest, None),
    };
    let key = |ev: InputEvent| -> Result<Command, ScriptError> { Ok(Command::Key(ev)) };
    match name {
        "enter" => key(InputEvent::Enter),
        "bs" => key(InputEvent::Backspace),
        "del" => key(InputEvent::Delete),
        "left" => key(InputEvent::ArrowLeft),
        "right" => key(InputEvent::ArrowRight),
        "up" => key(InputEvent::ArrowUp),
        "down" => key(InputEvent::ArrowDown),
        "esc" => key(InputEvent::Escape),
        "focus" => key(InputEvent::Focus),
        "blur" => key(InputEvent::Blur),
        "hide" => Ok(Command::FireHide),
        "paste" => Ok(Command::Key(InputEvent::Paste(arg.ok_or(ScriptError::MissingArgument("paste"))?.to_owned()))),
        "set" => Ok(Command::Key(InputEvent::SetText(arg.unwrap_or("").to_owned()))),
        "pick" => index(arg, "pick").map(Command::Pick),
        "rm" => index(arg, "rm").map(Command::Remove),
        "help" | "h" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        other => Err(ScriptError::Unknown(other.to_owned())),
    }
}

fn index(arg: Option<&str>, name: &'static str) -> Result<usize, ScriptError> {
    let raw = arg.map(str::trim).ok_or(ScriptError::MissingArgument(name))?;
    raw.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| ScriptError::BadIndex(raw.to_owned()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn plain_lines_are_typed() {
        assert_eq!(parse("foo, bar").unwrap(), Command::Type("foo, bar".into()));
    }

    #[test]
    fn key_commands() {
        assert_eq!(parse(":enter").unwrap(), Command::Key(InputEvent::Enter));
        assert_eq!(parse(":left").unwrap(), Command::Key(InputEvent::ArrowLeft));
        assert_eq!(parse(":paste a, b").unwrap(), Command::Key(InputEvent::Paste("a, b".into())));
        assert_eq!(parse(":set").unwrap(), Command::Key(InputEvent::SetText(String::new())));
    }

    #[test]
    fn indices_are_one_based() {
        assert_eq!(parse(":pick 2").unwrap(), Command::Pick(1));
        assert_eq!(parse(":rm 1").unwrap(), Command::Remove(0));
        assert_eq!(parse(":rm 0"), Err(ScriptError::BadIndex("0".into())));
        assert_eq!(parse(":pick"), Err(ScriptError::MissingArgument("pick")));
    }

    #[test]
    fn unknown_command() {
        assert_eq!(parse(":nope"), Err(ScriptError::Unknown("nope".into())));
    }
}
