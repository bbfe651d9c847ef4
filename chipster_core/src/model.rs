use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumString};

use crate::id::EntryId;

/// 已提交的一个 chip。
///
/// 创建后不可修改（没有原地编辑），只能通过 `EntryStore::remove_item` 删除。
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    id: EntryId,
    /// 提交值（已经过 transform/trim）
    text: String,
    /// 来自结构化候选或 `icon_for` 的图标
    icon: Option<String>,
    /// 来自结构化候选的附加数据（对 core 不透明）
    data: Option<Value>,
}

impl Entry {
    pub(crate) fn new(text: String, icon: Option<String>, data: Option<Value>) -> Self {
        Self {
            id: EntryId::new(),
            text,
            icon,
            data,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

/// 候选项：纯文本，或带图标/数据的结构化候选。
///
/// JSON 中裸字符串解析为 `Plain`，带 `label` 字段的对象解析为 `Labeled`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Candidate {
    Plain(String),
    Labeled {
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },
}

impl Candidate {
    pub fn plain(label: impl Into<String>) -> Self {
        Self::Plain(label.into())
    }

    pub fn labeled(label: impl Into<String>, icon: Option<String>, data: Option<Value>) -> Self {
        Self::Labeled {
            label: label.into(),
            icon,
            data,
        }
    }

    /// 展示文本，同时也是提交时交给 `add_item` 的原始文本。
    pub fn label(&self) -> &str {
        match self {
            Self::Plain(label) | Self::Labeled { label, .. } => label,
        }
    }

    pub fn icon(&self) -> Option<&str> {
        match self {
            Self::Plain(_) => None,
            Self::Labeled { icon, .. } => icon.as_deref(),
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Plain(_) => None,
            Self::Labeled { data, .. } => data.as_ref(),
        }
    }
}

impl From<&str> for Candidate {
    fn from(label: &str) -> Self {
        Self::Plain(label.to_owned())
    }
}

impl From<String> for Candidate {
    fn from(label: String) -> Self {
        Self::Plain(label)
    }
}

/// 提交模式。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// 任何通过校验的文本都可以提交
    #[default]
    Free,
    /// 只能提交显式选中的候选
    SuggestionsOnly,
}

/// 主题：只影响展示，状态机不读它。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// 给渲染层的只读快照。
///
/// - 渲染层只读 `UiState`，不直接读写 `Context`
/// - 每次 `Session::handle` 之后重新生成
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub entries: Vec<Entry>,
    /// 当前校验错误
    pub error: Option<String>,
    /// 键盘高亮的 chip（用于删除导航）
    pub highlighted_index: Option<usize>,
    /// 尚未提交的输入
    pub input_text: String,
    pub suggestions: Vec<Candidate>,
    pub selected_suggestion: Option<usize>,
    pub show_suggestions: bool,
    pub mode: Mode,
    pub theme: Theme,
    pub disabled: bool,
}

impl UiState {
    /// 候选面板是否真的可见（打开且非空）。
    pub fn suggestions_visible(&self) -> bool {
        self.show_suggestions && !self.suggestions.is_empty()
    }
}
