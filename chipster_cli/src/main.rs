mod render;
mod script;

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use chipster_core::{
    blur::HideToken,
    config::ChipsterConfig,
    key_event::{Action, InputEvent},
    model::{Candidate, Mode},
    session::Session,
    suggestion::{StaticSuggestions, SuggestionProvider},
};
use chipster_suggest::TsvSuggestions;
use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::{Level, debug, info, warn};

use crate::script::{Command, HELP};

/// 交互式 chip 输入演示：每行输入是一段按键脚本。
#[derive(Debug, Parser)]
#[command(name = "chipster", version, about)]
struct Args {
    /// JSON 配置文件
    #[arg(long)]
    config: Option<PathBuf>,
    /// TSV 候选文件（label<TAB>icon<TAB>data）
    #[arg(long)]
    suggestions: Option<PathBuf>,
    /// 覆盖配置中的模式：free / suggestions-only
    #[arg(long)]
    mode: Option<Mode>,
    /// 覆盖配置中的 joiner，可重复
    #[arg(long = "joiner")]
    joiners: Vec<char>,
    /// 日志级别（输出到 stderr）
    #[arg(long, default_value = "warn")]
    log_level: Level,
}

/// 候选来源：TSV 文件或配置里的内联列表。
enum Suggestions {
    Tsv(TsvSuggestions),
    Inline(StaticSuggestions),
}

impl SuggestionProvider for Suggestions {
    fn suggest(&self, input: &str) -> Vec<Candidate> {
        match self {
            Self::Tsv(tsv) => tsv.suggest(input),
            Self::Inline(list) => list.suggest(input),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .init();

    let mut config = load_config(args.config.as_ref())?;
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if !args.joiners.is_empty() {
        config.joiners = args.joiners.clone();
    }

    let provider = match &args.suggestions {
        Some(path) => Suggestions::Tsv(
            TsvSuggestions::from_path(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("loading suggestions from {}", path.display()))?,
        ),
        None => Suggestions::Inline(StaticSuggestions::new(config.suggestions.iter().cloned())),
    };
    let engine = config.build_engine(provider).into_diagnostic()?;
    let mut session = Session::with_entries(engine, config.default_value.clone())
        .on_add(|id, text| info!(%id, text, "added"))
        .on_remove(|id| info!(%id, "removed"))
        .on_error(|message| warn!(reason = message, "rejected"))
        .on_input_change(|text| debug!(text, "input changed"));

    repl(&mut session).into_diagnostic()
}

fn load_config(path: Option<&PathBuf>) -> Result<ChipsterConfig> {
    let Some(path) = path else {
        return Ok(ChipsterConfig::default());
    };
    let s = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", path.display()))?;
    ChipsterConfig::from_json(&s)
        .into_diagnostic()
        .wrap_err_with(|| format!("parsing {}", path.display()))
}

fn repl(session: &mut Session<Suggestions>) -> io::Result<()> {
    let mut out = io::stdout();
    let mut line = String::new();
    // 没有真实定时器：失焦产生的 token 留到 `:hide` 时回送
    let mut pending_hide: Option<HideToken> = None;

    writeln!(out, "chipster demo | mode: {} | :help for commands, :q to quit", session.ui_state().mode)?;
    write!(out, "{}", render::render(&session.ui_state()))?;

    loop {
        line.clear();
        write!(out, "chipster> ")?;
        out.flush()?;
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim_end_matches(['\r', '\n']);
        if input.is_empty() {
            continue;
        }

        let command = match script::parse(input) {
            Ok(c) => c,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };
        let events: Vec<InputEvent> = match command {
            Command::Quit => break,
            Command::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            Command::Type(text) => text.chars().map(InputEvent::Char).collect(),
            Command::Key(ev) => vec![ev],
            Command::Pick(i) => vec![InputEvent::SuggestionClicked(i)],
            Command::Remove(i) => match session.entries().get(i) {
                Some(entry) => vec![InputEvent::RemoveClicked(entry.id())],
                None => {
                    writeln!(out, "no chip #{}", i + 1)?;
                    continue;
                }
            },
            Command::FireHide => match pending_hide.take() {
                Some(token) => vec![InputEvent::HideTimeout(token)],
                None => {
                    writeln!(out, "(no pending hide)")?;
                    continue;
                }
            },
        };

        for ev in events {
            let (_ui, actions) = session.handle(ev);
            for action in actions {
                match action {
                    Action::Added { text, .. } => writeln!(out, "+ {text}")?,
                    Action::Removed(id) => writeln!(out, "- {id}")?,
                    Action::Rejected(message) => writeln!(out, "! {message}")?,
                    Action::ScheduleHide { token, delay } => {
                        pending_hide = Some(token);
                        writeln!(out, "(suggestions hide in {}ms, :hide to deliver)", delay.as_millis())?;
                    }
                    Action::FocusInput => writeln!(out, "(focus -> input)")?,
                    Action::InputChanged(_) => {}
                }
            }
        }
        write!(out, "{}", render::render(&session.ui_state()))?;
    }

    Ok(())
}
