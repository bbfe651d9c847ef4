//! `processor`：键盘/界面事件处理链。
//!
//! Processor 按顺序处理 `InputEvent`，对 `Context` 做状态变更，并可产生 `Action`。
//!
//! 当前链路（`Session::new` 默认组装）：
//! - `DisabledProcessor`：禁用时吞掉所有事件
//! - `FocusProcessor`：焦点、延迟隐藏、鼠标点击
//! - `CommitProcessor`：Enter / joiner 键提交
//! - `ChipNavigationProcessor`：输入为空时在 chip 间移动高亮、删除
//! - `SuggestionNavigationProcessor`：上下键选候选、Esc 取消
//! - `EditingProcessor`：编辑输入（Char/Paste/SetText/Backspace）

use std::time::Duration;

use tracing::trace;

use crate::{
    context::Context,
    key_event::{Action, InputEvent},
    model::{Candidate, Entry, Mode, Theme},
    validation::ValidationConfig,
};

/// 给 processors 的对象安全引擎接口（避免在 processors 层引入泛型）。
pub trait EngineFacade {
    fn mode(&self) -> Mode;
    fn validation(&self) -> &ValidationConfig;
    fn is_joiner(&self, ch: char) -> bool;
    /// 自由文本条目的图标
    fn icon_for(&self, text: &str) -> Option<String>;
    /// 取候选并按已有条目过滤
    fn compute_suggestions(&self, input: &str, entries: &[Entry]) -> Vec<Candidate>;
    fn is_disabled(&self) -> bool;
    fn hide_delay(&self) -> Duration;
    /// 只透传给渲染层
    fn theme(&self) -> Theme;
}

/// Processor 执行结果：是否“消费”了本次事件。
///
/// - `Consume`：本 processor 已处理该事件，后续 processor 不再执行
/// - `Continue`：本 processor 不处理该事件，交给下一个 processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Consume,
    Continue,
}

/// Processor：处理输入事件并改变 Context；必要时产生输出动作。
pub trait Processor: Send + Sync {
    fn process(
        &mut self,
        engine: &dyn EngineFacade,
        context: &mut Context,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>);
}

pub struct DisabledProcessor;

impl Processor for DisabledProcessor {
    fn process(
        &mut self,
        engine: &dyn EngineFacade,
        _context: &mut Context,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>) {
        if engine.is_disabled() {
            trace!(?input_event, "ignored: disabled");
            return (ProcessStatus::Consume, Vec::new());
        }
        (ProcessStatus::Continue, Vec::new())
    }
}

/// 焦点与点击。
pub struct FocusProcessor;

impl Processor for FocusProcessor {
    fn process(
        &mut self,
        engine: &dyn EngineFacade,
        context: &mut Context,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>) {
        let mut actions = Vec::new();
        match input_event {
            InputEvent::Focus => {
                context.pending_hide.cancel();
                context.suggestions.show();
            }
            InputEvent::Blur => {
                let token = context.pending_hide.arm();
                actions.push(Action::ScheduleHide {
                    token,
                    delay: engine.hide_delay(),
                });
            }
            InputEvent::HideTimeout(token) => {
                if context.pending_hide.fire(*token) {
                    context.suggestions.hide();
                }
            }
            InputEvent::SuggestionClicked(index) => {
                context.pending_hide.cancel();
                if let Some(candidate) = context.suggestions.items().get(*index).cloned() {
                    context.commit_candidate(engine, &candidate, &mut actions);
                }
                context.suggestions.deselect();
            }
            InputEvent::RemoveClicked(id) => {
                if context.store.remove_item(*id, &mut actions).is_some() {
                    context.refresh_suggestions(engine);
                }
            }
            _ => return (ProcessStatus::Continue, actions),
        }
        (ProcessStatus::Consume, actions)
    }
}

/// Enter 与 joiner 键：提交当前选中的候选或输入文本。
pub struct CommitProcessor;

impl Processor for CommitProcessor {
    fn process(
        &mut self,
        engine: &dyn EngineFacade,
        context: &mut Context,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>) {
        let mut actions = Vec::new();
        match *input_event {
            InputEvent::Enter => {
                context.commit(engine, &mut actions);
                (ProcessStatus::Consume, actions)
            }
            // joiner 键：输入为空时吞掉（不插入 joiner），否则与 Enter 相同
            InputEvent::Char(ch) if engine.is_joiner(ch) => {
                context.commit(engine, &mut actions);
                (ProcessStatus::Consume, actions)
            }
            _ => (ProcessStatus::Continue, actions),
        }
    }
}

/// 输入为空时的 chip 导航：第一次 Backspace 高亮最后一个，第二次删除。
pub struct ChipNavigationProcessor;

impl Processor for ChipNavigationProcessor {
    fn process(
        &mut self,
        _engine: &dyn EngineFacade,
        context: &mut Context,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>) {
        let mut actions = Vec::new();
        if !context.input_text.is_empty() {
            return (ProcessStatus::Continue, actions);
        }
        let store = &mut context.store;
        let len = store.len();
        let last = len.checked_sub(1);
        match *input_event {
            InputEvent::Backspace => match store.highlighted() {
                Some(index) => {
                    if let Some(id) = store.entries().get(index).map(Entry::id) {
                        store.remove_item(id, &mut actions);
                    }
                    store.highlight_item(None);
                }
                None => store.highlight_item(last),
            },
            InputEvent::ArrowLeft => match store.highlighted() {
                None => store.highlight_item(last),
                Some(index) if index > 0 => store.highlight_item(Some(index - 1)),
                Some(_) => {}
            },
            InputEvent::ArrowRight => match store.highlighted() {
                Some(index) if index + 1 < len => store.highlight_item(Some(index + 1)),
                Some(_) => {
                    store.highlight_item(None);
                    actions.push(Action::FocusInput);
                }
                None => {}
            },
            InputEvent::Delete => {
                let Some(index) = store.highlighted() else {
                    return (ProcessStatus::Consume, actions);
                };
                if let Some(id) = store.entries().get(index).map(Entry::id) {
                    store.remove_item(id, &mut actions);
                    // 焦点移到相邻 chip：用删除前的下标，夹到新长度内
                    let next = store.len().checked_sub(1).map(|last| index.min(last));
                    store.highlight_item(next);
                } else {
                    store.highlight_item(None);
                }
            }
            _ => return (ProcessStatus::Continue, actions),
        }
        (ProcessStatus::Consume, actions)
    }
}

/// 候选面板可见时的上下键与 Esc。
pub struct SuggestionNavigationProcessor;

impl Processor for SuggestionNavigationProcessor {
    fn process(
        &mut self,
        _engine: &dyn EngineFacade,
        context: &mut Context,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>) {
        let visible = context.suggestions.is_visible();
        match *input_event {
            InputEvent::ArrowDown if visible => context.suggestions.move_down(),
            InputEvent::ArrowUp if visible => context.suggestions.move_up(),
            InputEvent::Escape if visible || context.store.highlighted().is_some() => {
                context.suggestions.deselect();
                context.suggestions.hide();
                context.store.highlight_item(None);
            }
            _ => return (ProcessStatus::Continue, Vec::new()),
        }
        (ProcessStatus::Consume, Vec::new())
    }
}

/// 编辑输入的 processor（键入/粘贴/整体替换/退格）。
pub struct EditingProcessor;

impl Processor for EditingProcessor {
    fn process(
        &mut self,
        engine: &dyn EngineFacade,
        context: &mut Context,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>) {
        let mut actions = Vec::new();
        match input_event {
            InputEvent::Char(ch) => {
                let mut text = context.input_text.clone();
                text.push(*ch);
                context.set_input(engine, text, &mut actions);
            }
            InputEvent::Paste(pasted) => {
                let mut text = context.input_text.clone();
                text.push_str(pasted);
                context.set_input(engine, text, &mut actions);
            }
            InputEvent::SetText(text) => context.set_input(engine, text.clone(), &mut actions),
            InputEvent::Backspace if !context.input_text.is_empty() => {
                let mut text = context.input_text.clone();
                text.pop();
                context.set_input(engine, text, &mut actions);
            }
            _ => return (ProcessStatus::Continue, actions),
        }
        (ProcessStatus::Consume, actions)
    }
}
