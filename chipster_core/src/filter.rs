//! `filter`：候选后处理。

use crate::{
    model::{Candidate, Entry},
    validation::ValidationConfig,
};

/// Filter：按当前条目与校验配置对候选列表做后处理。
pub trait Filter: Send + Sync {
    fn apply(&self, candidates: Vec<Candidate>, entries: &[Entry], validation: &ValidationConfig) -> Vec<Candidate>;
}

/// 默认 filter：除非允许重复，否则去掉与已有条目重复的候选。
///
/// 比较前候选标签按提交时同样的方式规范化，大小写策略与 `ValidationConfig` 一致。
#[derive(Debug, Clone, Copy, Default)]
pub struct ExistingEntryFilter;

impl Filter for ExistingEntryFilter {
    fn apply(&self, mut candidates: Vec<Candidate>, entries: &[Entry], validation: &ValidationConfig) -> Vec<Candidate> {
        if validation.allows_duplicates() {
            return candidates;
        }
        candidates.retain(|c| {
            let label = validation.normalize(c.label());
            !entries.iter().any(|e| validation.is_duplicate(e.text(), &label))
        });
        candidates
    }
}
