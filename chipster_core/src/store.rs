//! `EntryStore`：已提交条目的唯一持有者。
//!
//! 约定：
//! - `entries` 的顺序即展示顺序，也决定高亮下标
//! - 新增/删除成功后 `highlighted` 一律清空，需要“焦点移到相邻 chip”的调用方自己重设
//! - 所有对宿主的通知都写进调用方传入的 `actions`，这里不直接调用回调
use tracing::debug;

use crate::{
    error::AddError,
    id::EntryId,
    key_event::Action,
    model::{Candidate, Entry, Mode},
    processor::EngineFacade,
};

#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: Vec<Entry>,
    /// 键盘高亮的条目下标
    highlighted: Option<usize>,
    /// 当前校验错误
    error: Option<String>,
}

impl EntryStore {
    /// 用默认值初始化：每个值分配新 id，不做校验，不产生通知。
    pub fn seed<I, S>(engine: &dyn EngineFacade, default_value: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = default_value
            .into_iter()
            .map(|text| {
                let text = text.into();
                let icon = engine.icon_for(&text);
                Entry::new(text, icon, None)
            })
            .collect();
        Self {
            entries,
            highlighted: None,
            error: None,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// 新增条目。
    ///
    /// - suggestions-only 模式下必须附带 `suggestion`，否则原样返回 `SuggestionRequired`
    /// - `raw` 只规范化一次，规范化后的值用于查重、规则校验与存储
    /// - 规范化后为空白：返回 `Empty`，不写 `error`
    /// - 校验失败：写入 `error`，追加 `Action::Rejected`，条目不变
    pub fn add_item(
        &mut self,
        engine: &dyn EngineFacade,
        raw: &str,
        suggestion: Option<&Candidate>,
        actions: &mut Vec<Action>,
    ) -> Result<EntryId, AddError> {
        if engine.mode() == Mode::SuggestionsOnly && suggestion.is_none() {
            return Err(AddError::SuggestionRequired);
        }

        let validation = engine.validation();
        let value = validation.normalize(raw);
        if value.trim().is_empty() {
            return Err(AddError::Empty);
        }
        if let Err(rejection) = validation.check(&value, &self.entries) {
            let message = rejection.to_string();
            debug!(value = %value, reason = %message, "entry rejected");
            self.error = Some(message.clone());
            actions.push(Action::Rejected(message));
            return Err(rejection.into());
        }

        self.error = None;
        let icon = suggestion
            .and_then(Candidate::icon)
            .map(str::to_owned)
            .or_else(|| engine.icon_for(&value));
        let data = suggestion.and_then(Candidate::data).cloned();
        let entry = Entry::new(value, icon, data);
        let id = entry.id();
        debug!(%id, text = entry.text(), "entry added");
        actions.push(Action::Added {
            id,
            text: entry.text().to_owned(),
        });
        self.entries.push(entry);
        self.highlighted = None;
        Ok(id)
    }

    /// 按 id 删除；id 不存在时什么也不删，也不算错误。高亮总是清空。
    pub fn remove_item(&mut self, id: EntryId, actions: &mut Vec<Action>) -> Option<Entry> {
        self.highlighted = None;
        let index = self.entries.iter().position(|e| e.id() == id)?;
        let removed = self.entries.remove(index);
        debug!(%id, text = removed.text(), "entry removed");
        actions.push(Action::Removed(id));
        Some(removed)
    }

    /// 直接设置高亮；不做越界检查，调用方负责传入合法下标。
    pub fn highlight_item(&mut self, index: Option<usize>) {
        self.highlighted = index;
    }

    /// 只校验、不提交：用于输入过程中实时提示错误。
    pub fn live_check(&mut self, engine: &dyn EngineFacade, raw: &str) {
        let validation = engine.validation();
        let value = validation.normalize(raw);
        self.error = validation
            .check(&value, &self.entries)
            .err()
            .map(|rejection| rejection.to_string());
    }
}
