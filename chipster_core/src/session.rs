//! `Session`：对宿主（TUI/GUI）提供的会话对象，一个输入实例一个。
//!
//! `Session` 自身不做按键判断，而是：
//! - 持有 `Context`（状态）与 `Engine`（配置）
//! - 持有 processors 链（可插拔）
//! - 把每次 `InputEvent` 依次交给 processors，直到被消费
//! - 把产生的 `Action` 分发给已注册的回调，最后输出 `UiState` + `Action`

use tracing::{debug_span, trace};

use crate::{
    context::Context,
    engine::Engine,
    error::AddError,
    id::EntryId,
    key_event::{Action, InputEvent},
    model::{Candidate, Entry, UiState},
    processor::{
        ChipNavigationProcessor, CommitProcessor, DisabledProcessor, EditingProcessor, FocusProcessor,
        ProcessStatus, Processor, SuggestionNavigationProcessor,
    },
    store::EntryStore,
    suggestion::SuggestionProvider,
    validation::ValidationConfig,
};

/// 宿主回调；只做通知，返回值不影响状态机。
#[derive(Default)]
struct Callbacks {
    on_add: Option<Box<dyn FnMut(EntryId, &str)>>,
    on_remove: Option<Box<dyn FnMut(EntryId)>>,
    on_error: Option<Box<dyn FnMut(&str)>>,
    on_input_change: Option<Box<dyn FnMut(&str)>>,
}

impl Callbacks {
    fn dispatch(&mut self, actions: &[Action]) {
        for action in actions {
            match action {
                Action::Added { id, text } => {
                    if let Some(f) = self.on_add.as_mut() {
                        f(*id, text.as_str());
                    }
                }
                Action::Removed(id) => {
                    if let Some(f) = self.on_remove.as_mut() {
                        f(*id);
                    }
                }
                Action::Rejected(message) => {
                    if let Some(f) = self.on_error.as_mut() {
                        f(message.as_str());
                    }
                }
                Action::InputChanged(text) => {
                    if let Some(f) = self.on_input_change.as_mut() {
                        f(text.as_str());
                    }
                }
                Action::ScheduleHide { .. } | Action::FocusInput => {}
            }
        }
    }
}

/// chip 输入会话（一个输入实例的状态机容器）。
pub struct Session<P> {
    /// 引擎（模式、校验、候选来源）
    engine: Engine<P>,
    /// 会话上下文（processors 共享）
    ctx: Context,
    /// processors 链（可配置/可扩展）
    processors: Vec<Box<dyn Processor>>,
    callbacks: Callbacks,
}

impl<P> Session<P>
where
    P: SuggestionProvider,
{
    /// 创建会话，并组装默认 processors 链。
    pub fn new(engine: Engine<P>) -> Self {
        Self::with_entries(engine, Vec::<String>::new())
    }

    /// 创建会话并用 `default_value` 预置条目。
    pub fn with_entries<I, S>(engine: Engine<P>, default_value: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = EntryStore::seed(&engine, default_value);
        Self {
            engine,
            ctx: Context::new(store),
            processors: vec![
                Box::new(DisabledProcessor),
                Box::new(FocusProcessor),
                Box::new(CommitProcessor),
                Box::new(ChipNavigationProcessor),
                Box::new(SuggestionNavigationProcessor),
                Box::new(EditingProcessor),
            ],
            callbacks: Callbacks::default(),
        }
    }

    pub fn on_add(mut self, f: impl FnMut(EntryId, &str) + 'static) -> Self {
        self.callbacks.on_add = Some(Box::new(f));
        self
    }

    pub fn on_remove(mut self, f: impl FnMut(EntryId) + 'static) -> Self {
        self.callbacks.on_remove = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.callbacks.on_error = Some(Box::new(f));
        self
    }

    /// 输入缓冲每次变化都会通知，包括提交成功后清空。
    pub fn on_input_change(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.callbacks.on_input_change = Some(Box::new(f));
        self
    }

    pub fn engine(&self) -> &Engine<P> {
        &self.engine
    }

    pub fn entries(&self) -> &[Entry] {
        self.ctx.store.entries()
    }

    /// 获取当前 UI 快照（只读）。
    pub fn ui_state(&self) -> UiState {
        self.ctx.ui_state(&self.engine)
    }

    /// 处理一个输入事件，返回最新 UI 快照与动作列表。
    pub fn handle(&mut self, ev: InputEvent) -> (UiState, Vec<Action>) {
        let _span = debug_span!("handle", event = ?ev).entered();
        let mut actions = Vec::new();
        for p in &mut self.processors {
            let (status, mut a) = p.process(&self.engine, &mut self.ctx, &ev);
            actions.append(&mut a);
            if status == ProcessStatus::Consume {
                break;
            }
        }
        trace!(?actions, input = %self.ctx.input_text, "handled");
        self.callbacks.dispatch(&actions);
        (self.ctx.ui_state(&self.engine), actions)
    }

    /// 以自由文本新增条目（不经过输入框，输入缓冲不变）。
    ///
    /// 规范化后为空白的值返回 `AddError::Empty`，状态不变。
    pub fn add_item(&mut self, raw: &str) -> Result<EntryId, AddError> {
        let mut actions = Vec::new();
        let result = self.ctx.store.add_item(&self.engine, raw, None, &mut actions);
        self.after_mutation(&actions);
        result
    }

    /// 以候选新增条目，图标/数据随候选带入。
    pub fn add_suggestion(&mut self, candidate: &Candidate) -> Result<EntryId, AddError> {
        let mut actions = Vec::new();
        let result = self
            .ctx
            .store
            .add_item(&self.engine, candidate.label(), Some(candidate), &mut actions);
        self.after_mutation(&actions);
        result
    }

    /// 按 id 删除；不存在时为 no-op。
    pub fn remove_item(&mut self, id: EntryId) -> Option<Entry> {
        let mut actions = Vec::new();
        let removed = self.ctx.store.remove_item(id, &mut actions);
        self.after_mutation(&actions);
        removed
    }

    /// 直接设置高亮；不做越界检查。
    pub fn highlight_item(&mut self, index: Option<usize>) {
        self.ctx.store.highlight_item(index);
    }

    /// 按 `input` 重新计算候选（选中项随之重置）并返回。
    pub fn compute_suggestions(&mut self, input: &str) -> Vec<Candidate> {
        let list = self.engine.compute_suggestions(input, self.ctx.store.entries());
        self.ctx.suggestions.replace(list.clone());
        list
    }

    /// 替换校验配置；旧错误随之清除，候选按新的重复策略重算。
    pub fn set_validation(&mut self, validation: ValidationConfig) {
        self.engine.set_validation(validation);
        self.ctx.store.clear_error();
        self.ctx.refresh_suggestions(&self.engine);
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.engine.set_disabled(disabled);
    }

    fn after_mutation(&mut self, actions: &[Action]) {
        if actions
            .iter()
            .any(|a| matches!(a, Action::Added { .. } | Action::Removed(_)))
        {
            self.ctx.refresh_suggestions(&self.engine);
        }
        self.callbacks.dispatch(actions);
    }
}
