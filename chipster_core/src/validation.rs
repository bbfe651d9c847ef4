//! `validation`：提交前的校验策略。
//!
//! 顺序固定：transform（恰好一次）-> 上限 -> 重复 -> 规则（按声明顺序，首个失败即返回）。

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, DEFAULT_RULE_MESSAGE, Rejection},
    model::Entry,
};

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;
type Transform = Box<dyn Fn(&str) -> String + Send + Sync>;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// 一条校验规则：谓词 + 失败提示。
pub struct ValidationRule {
    test: Predicate,
    message: Option<String>,
}

impl ValidationRule {
    pub fn new(test: impl Fn(&str) -> bool + Send + Sync + 'static, message: impl Into<String>) -> Self {
        Self {
            test: Box::new(test),
            message: Some(message.into()),
        }
    }

    /// 不带提示的规则；失败时使用通用提示。
    pub fn unlabeled(test: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            test: Box::new(test),
            message: None,
        }
    }

    pub fn passes(&self, value: &str) -> bool {
        (self.test)(value)
    }

    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or(DEFAULT_RULE_MESSAGE)
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// 校验配置（每个实例一份）。
pub struct ValidationConfig {
    rules: Vec<ValidationRule>,
    /// 条目上限；None 表示不限
    max_entries: Option<usize>,
    max_entries_message: Option<String>,
    allow_duplicates: bool,
    /// 重复判断是否区分大小写（默认不区分）
    case_sensitive: bool,
    /// 替代默认 trim 的规范化函数
    transform: Option<Transform>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            max_entries: None,
            max_entries_message: None,
            allow_duplicates: false,
            case_sensitive: false,
            transform: None,
        }
    }
}

impl fmt::Debug for ValidationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationConfig")
            .field("rules", &self.rules)
            .field("max_entries", &self.max_entries)
            .field("max_entries_message", &self.max_entries_message)
            .field("allow_duplicates", &self.allow_duplicates)
            .field("case_sensitive", &self.case_sensitive)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

impl ValidationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条规则（按追加顺序求值）。
    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// 设置条目上限；0 表示不限。
    pub fn max_entries(mut self, limit: usize) -> Self {
        self.max_entries = (limit > 0).then_some(limit);
        self
    }

    pub fn max_entries_message(mut self, message: impl Into<String>) -> Self {
        self.max_entries_message = Some(message.into());
        self
    }

    pub fn allow_duplicates(mut self, allow: bool) -> Self {
        self.allow_duplicates = allow;
        self
    }

    pub fn case_sensitive(mut self, sensitive: bool) -> Self {
        self.case_sensitive = sensitive;
        self
    }

    pub fn transform(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.transform = Some(Box::new(f));
        self
    }

    pub fn allows_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    pub fn limit(&self) -> Option<usize> {
        self.max_entries
    }

    /// 对原始文本做规范化：有 transform 用 transform，否则 trim。
    pub fn normalize(&self, raw: &str) -> String {
        match &self.transform {
            Some(f) => f(raw),
            None => raw.trim().to_owned(),
        }
    }

    /// 按配置的大小写策略比较两个值。
    pub fn is_duplicate(&self, a: &str, b: &str) -> bool {
        if self.case_sensitive {
            a == b
        } else {
            a.to_lowercase() == b.to_lowercase()
        }
    }

    /// 校验已经规范化过的 `value`。
    pub fn check(&self, value: &str, entries: &[Entry]) -> Result<(), Rejection> {
        if let Some(limit) = self.max_entries {
            if entries.len() >= limit {
                let message = self
                    .max_entries_message
                    .clone()
                    .unwrap_or_else(|| format!("Maximum of {limit} items allowed"));
                return Err(Rejection::MaxEntries { limit, message });
            }
        }

        if !self.allow_duplicates && entries.iter().any(|e| self.is_duplicate(e.text(), value)) {
            return Err(Rejection::Duplicate);
        }

        match self.rules.iter().position(|rule| !rule.passes(value)) {
            Some(index) => Err(Rejection::Rule {
                index,
                message: self.rules[index].message().to_owned(),
            }),
            None => Ok(()),
        }
    }
}

/// 声明式规则（配置文件用）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RuleSpec {
    MinLength {
        min: usize,
        #[serde(default)]
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        #[serde(default)]
        message: Option<String>,
    },
    Pattern {
        regex: String,
        #[serde(default)]
        message: Option<String>,
    },
    Email {
        #[serde(default)]
        message: Option<String>,
    },
}

impl RuleSpec {
    /// 编译为运行时规则；`index` 只用于错误定位。
    pub fn compile(&self, index: usize) -> Result<ValidationRule, ConfigError> {
        let (test, message): (Predicate, Option<String>) = match self {
            Self::MinLength { min, message } => {
                let min = *min;
                (
                    predicate(move |v| v.chars().count() >= min),
                    Some(message.clone().unwrap_or_else(|| format!("Must be at least {min} characters"))),
                )
            }
            Self::MaxLength { max, message } => {
                let max = *max;
                (
                    predicate(move |v| v.chars().count() <= max),
                    Some(message.clone().unwrap_or_else(|| format!("Must not exceed {max} characters"))),
                )
            }
            Self::Pattern { regex, message } => {
                let re = compile_pattern(regex, index)?;
                (predicate(move |v| re.is_match(v)), message.clone())
            }
            Self::Email { message } => {
                let re = compile_pattern(EMAIL_PATTERN, index)?;
                (
                    predicate(move |v| re.is_match(v)),
                    Some(message.clone().unwrap_or_else(|| "Please enter a valid email address".to_owned())),
                )
            }
        };
        Ok(ValidationRule { test, message })
    }
}

fn predicate(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Predicate {
    Box::new(f)
}

fn compile_pattern(pattern: &str, index: usize) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern { index, source })
}

/// 声明式 transform。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformSpec {
    /// 不设 transform（默认 trim）
    #[default]
    None,
    Trim,
    TrimLowercase,
    Lowercase,
}

impl TransformSpec {
    /// 应用到配置上；`None` 保持默认行为。
    pub fn apply_to(self, config: ValidationConfig) -> ValidationConfig {
        match self {
            Self::None => config,
            Self::Trim => config.transform(|v| v.trim().to_owned()),
            Self::TrimLowercase => config.transform(|v| v.trim().to_lowercase()),
            Self::Lowercase => config.transform(str::to_lowercase),
        }
    }
}
