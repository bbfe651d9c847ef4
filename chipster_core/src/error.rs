use thiserror::Error;

/// 默认的规则失败提示。
pub const DEFAULT_RULE_MESSAGE: &str = "Invalid input";

/// 校验拒绝：唯一的错误类别。`Display` 即展示给用户的文本。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// 已达到条目上限
    #[error("{message}")]
    MaxEntries { limit: usize, message: String },
    /// 与已有条目重复
    #[error("Duplicate items are not allowed")]
    Duplicate,
    /// 第 `index` 条规则未通过
    #[error("{message}")]
    Rule { index: usize, message: String },
}

/// `add_item` 的失败原因。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddError {
    /// suggestions-only 模式下没有附带候选；不改变任何状态
    #[error("only suggestions may be added in suggestions-only mode")]
    SuggestionRequired,
    /// 规范化后为空白；不改变任何状态
    #[error("empty values are not allowed")]
    Empty,
    #[error(transparent)]
    Rejected(#[from] Rejection),
}

/// 声明式配置无法构建成引擎。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid pattern in rule #{index}: {source}")]
    InvalidPattern {
        index: usize,
        #[source]
        source: regex::Error,
    },
}
