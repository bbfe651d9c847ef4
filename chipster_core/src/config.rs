//! `config`：声明式配置（JSON），由宿主加载后构建 `Engine`。
//!
//! 所有字段都有默认值，空对象 `{}` 即默认配置。
use serde::{Deserialize, Serialize};

use crate::{
    engine::Engine,
    error::ConfigError,
    model::{Candidate, Mode, Theme},
    suggestion::{StaticSuggestions, SuggestionProvider},
    validation::{RuleSpec, TransformSpec, ValidationConfig},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChipsterConfig {
    pub mode: Mode,
    /// 除 Enter 之外触发提交的字符
    pub joiners: Vec<char>,
    /// 预置条目
    pub default_value: Vec<String>,
    /// 0 表示不限
    pub max_items: usize,
    pub max_items_message: Option<String>,
    pub allow_duplicates: bool,
    pub case_sensitive: bool,
    pub transform: TransformSpec,
    pub rules: Vec<RuleSpec>,
    pub theme: Theme,
    pub disabled: bool,
    /// 内联候选（没有外部候选来源时使用）
    pub suggestions: Vec<Candidate>,
}

impl Default for ChipsterConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Free,
            joiners: vec![','],
            default_value: Vec::new(),
            max_items: 0,
            max_items_message: None,
            allow_duplicates: false,
            case_sensitive: false,
            transform: TransformSpec::None,
            rules: Vec::new(),
            theme: Theme::Light,
            disabled: false,
            suggestions: Vec::new(),
        }
    }
}

impl ChipsterConfig {
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// 编译校验部分。
    pub fn validation(&self) -> Result<ValidationConfig, ConfigError> {
        let mut validation = ValidationConfig::new()
            .max_entries(self.max_items)
            .allow_duplicates(self.allow_duplicates)
            .case_sensitive(self.case_sensitive);
        if let Some(message) = &self.max_items_message {
            validation = validation.max_entries_message(message.clone());
        }
        for (index, spec) in self.rules.iter().enumerate() {
            validation = validation.rule(spec.compile(index)?);
        }
        Ok(self.transform.apply_to(validation))
    }

    /// 用给定候选来源构建引擎。
    pub fn build_engine<P: SuggestionProvider>(&self, provider: P) -> Result<Engine<P>, ConfigError> {
        Ok(Engine::new(provider)
            .with_mode(self.mode)
            .with_joiners(self.joiners.iter().copied())
            .with_validation(self.validation()?)
            .with_theme(self.theme)
            .with_disabled(self.disabled))
    }

    /// 用内联候选构建引擎。
    pub fn build_static_engine(&self) -> Result<Engine<StaticSuggestions>, ConfigError> {
        self.build_engine(StaticSuggestions::new(self.suggestions.iter().cloned()))
    }
}
