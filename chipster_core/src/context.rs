//! `Context`：processor 链共享的唯一状态容器。
//!
//! 约定：
//! - `store`：已提交条目、高亮与当前错误
//! - `input_text`：尚未提交的输入
//! - `suggestions`：由 `input_text` 推导出的候选与选中项
//! - `pending_hide`：失焦后挂起的隐藏请求
use tracing::debug;

use crate::{
    blur::PendingHide,
    key_event::Action,
    model::{Candidate, Mode, UiState},
    processor::EngineFacade,
    store::EntryStore,
    suggestion::SuggestionState,
};

/// 一个输入实例的会话上下文：processor 链共享的唯一状态。
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub store: EntryStore,
    /// 原始输入（未提交）
    pub input_text: String,
    pub suggestions: SuggestionState,
    pub pending_hide: PendingHide,
}

impl Context {
    pub fn new(store: EntryStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    /// 清空输入与候选（提交成功后调用），并通知宿主输入已变为空。
    pub fn reset_input(&mut self, actions: &mut Vec<Action>) {
        self.input_text.clear();
        self.suggestions.clear();
        actions.push(Action::InputChanged(String::new()));
    }

    /// 去掉末尾 joiner 之后的文本。
    fn without_joiner<'a>(engine: &dyn EngineFacade, text: &'a str) -> &'a str {
        match text.chars().next_back() {
            Some(ch) if engine.is_joiner(ch) => &text[..text.len() - ch.len_utf8()],
            _ => text,
        }
    }

    /// 输入变化（粘贴、程序化赋值、逐字键入）的统一入口。
    ///
    /// 末尾是 joiner 且去掉后非空时立即尝试提交；提交失败则保留去掉 joiner 的文本。
    pub fn set_input(&mut self, engine: &dyn EngineFacade, text: String, actions: &mut Vec<Action>) {
        let stripped = Self::without_joiner(engine, &text);
        if stripped.len() != text.len() && !stripped.trim().is_empty() {
            let stripped = stripped.to_owned();
            if self.commit_text(engine, &stripped, actions) {
                return;
            }
            self.apply_text(engine, stripped, actions);
            return;
        }
        self.apply_text(engine, text, actions);
    }

    /// 写入输入文本，并同步实时校验与候选。
    fn apply_text(&mut self, engine: &dyn EngineFacade, text: String, actions: &mut Vec<Action>) {
        actions.push(Action::InputChanged(text.clone()));
        self.input_text = text;
        let probe = Self::without_joiner(engine, &self.input_text).to_owned();
        if probe.trim().is_empty() {
            self.store.clear_error();
            self.suggestions.clear();
            return;
        }
        self.store.live_check(engine, &probe);
        self.refresh_suggestions(engine);
        self.suggestions.show();
    }

    /// 按当前输入与条目重新计算候选；输入为空时清空。
    pub fn refresh_suggestions(&mut self, engine: &dyn EngineFacade) {
        let probe = Self::without_joiner(engine, &self.input_text);
        if probe.trim().is_empty() {
            self.suggestions.clear();
            return;
        }
        let list = engine.compute_suggestions(probe, self.store.entries());
        self.suggestions.replace(list);
    }

    /// Enter 的默认行为：优先提交选中的候选，否则（自由模式下）提交输入文本。
    ///
    /// 去掉末尾 joiner 后为空白时什么也不做；失败时输入保持不变。
    pub fn commit(&mut self, engine: &dyn EngineFacade, actions: &mut Vec<Action>) -> bool {
        let text = Self::without_joiner(engine, &self.input_text).to_owned();
        if text.trim().is_empty() {
            return false;
        }
        if let Some(candidate) = self.suggestions.selected_candidate().cloned() {
            return self.commit_candidate(engine, &candidate, actions);
        }
        if engine.mode() == Mode::Free {
            return self.commit_text(engine, &text, actions);
        }
        debug!("commit ignored: no suggestion selected");
        false
    }

    /// 提交一个候选（标签 + 图标/数据）。
    pub fn commit_candidate(&mut self, engine: &dyn EngineFacade, candidate: &Candidate, actions: &mut Vec<Action>) -> bool {
        if self
            .store
            .add_item(engine, candidate.label(), Some(candidate), actions)
            .is_ok()
        {
            self.reset_input(actions);
            return true;
        }
        false
    }

    /// 以自由文本提交。
    pub fn commit_text(&mut self, engine: &dyn EngineFacade, text: &str, actions: &mut Vec<Action>) -> bool {
        if self.store.add_item(engine, text, None, actions).is_ok() {
            self.reset_input(actions);
            return true;
        }
        false
    }

    /// 生成 UI 层只读快照。
    pub fn ui_state(&self, engine: &dyn EngineFacade) -> UiState {
        UiState {
            entries: self.store.entries().to_vec(),
            error: self.store.error().map(str::to_owned),
            highlighted_index: self.store.highlighted(),
            input_text: self.input_text.clone(),
            suggestions: self.suggestions.items().to_vec(),
            selected_suggestion: self.suggestions.selected(),
            show_suggestions: self.suggestions.is_shown(),
            mode: engine.mode(),
            theme: engine.theme(),
            disabled: engine.is_disabled(),
        }
    }
}
