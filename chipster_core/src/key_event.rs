use std::time::Duration;

use crate::{blur::HideToken, id::EntryId};

/// 输入事件（逻辑键盘/界面事件）。
///
/// 说明：
/// - `Session`/processor 只关心“语义事件”，不关心具体平台键值。
/// - TUI/GUI 层负责把系统按键、点击转换成这些事件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// 键入一个字符（joiner 字符也走这里）
    Char(char),
    /// 粘贴一段文本（追加到输入末尾）
    Paste(String),
    /// 程序化地替换整段输入
    SetText(String),
    /// 回车：总是触发提交
    Enter,
    /// 输入非空时删字符；输入为空时“先高亮、再删除”
    Backspace,
    /// 删除高亮 chip，高亮移到相邻 chip
    Delete,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    /// 取消候选选择与 chip 高亮，收起候选面板
    Escape,
    /// 输入框获得焦点
    Focus,
    /// 输入框失焦（候选面板延迟隐藏）
    Blur,
    /// 宿主在延迟到期后回送的隐藏请求
    HideTimeout(HideToken),
    /// 鼠标点击第 n 个候选
    SuggestionClicked(usize),
    /// 点击 chip 上的删除按钮
    RemoveClicked(EntryId),
}

/// 引擎输出动作（对宿主的“副作用”请求/通知）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// 新增了一个条目（对应 onAdd）
    Added { id: EntryId, text: String },
    /// 删除了一个条目（对应 onRemove）
    Removed(EntryId),
    /// 提交被校验拒绝（对应 onError）
    Rejected(String),
    /// 输入缓冲变化后的完整文本；提交成功后为空串（对应 onInputChange）
    InputChanged(String),
    /// 请宿主在 `delay` 之后回送 `InputEvent::HideTimeout(token)`
    ScheduleHide { token: HideToken, delay: Duration },
    /// 请宿主把焦点还给文本输入框
    FocusInput,
}
