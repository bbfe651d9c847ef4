use std::time::Duration;

use crate::filter::{ExistingEntryFilter, Filter};
use crate::model::{Candidate, Entry, Mode, Theme};
use crate::suggestion::SuggestionProvider;
use crate::validation::ValidationConfig;

/// 失焦后候选面板的默认隐藏延迟。
pub const DEFAULT_HIDE_DELAY: Duration = Duration::from_millis(200);

type IconFn = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// 引擎：一个实例的全部静态配置（模式、joiner、校验、候选来源）。
///
/// 结构上对应流水线：
/// - processor（按键） -> store（增删/校验） -> provider（取候选） -> filter（去重） -> 输出 UiState
pub struct Engine<P> {
    /// 候选来源
    provider: P,
    /// 候选后处理
    filter: Box<dyn Filter>,
    validation: ValidationConfig,
    mode: Mode,
    /// 除 Enter 之外触发提交的字符
    joiners: Vec<char>,
    /// 为自由文本条目提供图标
    icon_for: Option<IconFn>,
    disabled: bool,
    theme: Theme,
    hide_delay: Duration,
}

impl<P> Engine<P>
where
    P: SuggestionProvider,
{
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            filter: Box::new(ExistingEntryFilter),
            validation: ValidationConfig::default(),
            mode: Mode::Free,
            joiners: vec![','],
            icon_for: None,
            disabled: false,
            theme: Theme::Light,
            hide_delay: DEFAULT_HIDE_DELAY,
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// 设置 joiner 字符；空列表表示只有 Enter 能提交。
    pub fn with_joiners(mut self, joiners: impl IntoIterator<Item = char>) -> Self {
        self.joiners = joiners.into_iter().collect();
        self
    }

    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }

    pub fn with_icon_for(mut self, f: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        self.icon_for = Some(Box::new(f));
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_hide_delay(mut self, delay: Duration) -> Self {
        self.hide_delay = delay;
        self
    }

    /// 运行期替换校验配置（对应声明式挂载/卸载校验组件）。
    pub fn set_validation(&mut self, validation: ValidationConfig) {
        self.validation = validation;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// 取候选并过滤掉与已有条目重复的项。
    pub fn compute_suggestions(&self, input: &str, entries: &[Entry]) -> Vec<Candidate> {
        let raw = self.provider.suggest(input);
        self.filter.apply(raw, entries, &self.validation)
    }
}

impl<P> crate::processor::EngineFacade for Engine<P>
where
    P: SuggestionProvider,
{
    fn mode(&self) -> Mode {
        self.mode
    }

    fn validation(&self) -> &ValidationConfig {
        &self.validation
    }

    fn is_joiner(&self, ch: char) -> bool {
        self.joiners.contains(&ch)
    }

    fn icon_for(&self, text: &str) -> Option<String> {
        self.icon_for.as_ref().and_then(|f| f(text))
    }

    fn compute_suggestions(&self, input: &str, entries: &[Entry]) -> Vec<Candidate> {
        Engine::<P>::compute_suggestions(self, input, entries)
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn hide_delay(&self) -> Duration {
        self.hide_delay
    }

    fn theme(&self) -> Theme {
        self.theme
    }
}
