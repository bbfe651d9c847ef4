//! `suggestion`：候选来源与候选面板状态。
use crate::model::Candidate;

/// 候选来源抽象：core 不关心候选来自文件/内存/网络。
///
/// 约定：在每次合格的输入变化时同步调用；可以返回空列表。
pub trait SuggestionProvider: Send + Sync {
    fn suggest(&self, input: &str) -> Vec<Candidate>;
}

impl<F> SuggestionProvider for F
where
    F: Fn(&str) -> Vec<Candidate> + Send + Sync,
{
    fn suggest(&self, input: &str) -> Vec<Candidate> {
        self(input)
    }
}

/// 固定列表：按标签做不区分大小写的子串匹配，保持原顺序。
#[derive(Debug, Clone, Default)]
pub struct StaticSuggestions {
    items: Vec<Candidate>,
}

impl StaticSuggestions {
    pub fn new(items: impl IntoIterator<Item = impl Into<Candidate>>) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

impl SuggestionProvider for StaticSuggestions {
    fn suggest(&self, input: &str) -> Vec<Candidate> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.items
            .iter()
            .filter(|c| c.label().to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

/// 候选面板状态。
///
/// 上下键选择采用“夹紧”策略：到两端即停，不循环；未选中时上下键都选中第一项。
#[derive(Debug, Clone, Default)]
pub struct SuggestionState {
    items: Vec<Candidate>,
    selected: Option<usize>,
    /// 面板是否打开（打开但为空时仍不可见）
    shown: bool,
}

impl SuggestionState {
    pub fn items(&self) -> &[Candidate] {
        &self.items
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn is_visible(&self) -> bool {
        self.shown && !self.items.is_empty()
    }

    /// 替换候选列表；选中项总是重置。
    pub fn replace(&mut self, items: Vec<Candidate>) {
        self.items = items;
        self.selected = None;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.selected = None;
        self.shown = false;
    }

    pub fn show(&mut self) {
        self.shown = true;
    }

    pub fn hide(&mut self) {
        self.shown = false;
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn move_down(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let last = self.items.len() - 1;
        self.selected = Some(self.selected.map_or(0, |i| (i + 1).min(last)));
    }

    pub fn move_up(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
    }

    pub fn selected_candidate(&self) -> Option<&Candidate> {
        self.selected.and_then(|i| self.items.get(i))
    }
}
