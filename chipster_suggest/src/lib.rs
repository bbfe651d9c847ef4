//! `chipster_suggest`：基于 TSV 文件的候选来源。
use std::{fs, io, path::Path};

use chipster_core::{model::Candidate, suggestion::SuggestionProvider};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// 默认返回的候选数量上限。
pub const DEFAULT_LIMIT: usize = 8;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read suggestions file: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: missing label")]
    MissingLabel { line: usize },
    #[error("line {line}: data column is not valid JSON: {source}")]
    InvalidData {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
struct Row {
    candidate: Candidate,
    /// 预先小写化的标签，查询时不再重复转换
    key: String,
}

/// TSV 格式（简化版）：
///
/// - `label<TAB>icon<TAB>data`
/// - icon、data 可省略；data 是一段 JSON
/// - 允许 `#` 开头注释行与空行
///
/// 带 icon 或 data 的行生成 `Candidate::Labeled`，否则生成 `Candidate::Plain`。
#[derive(Debug, Clone)]
pub struct TsvSuggestions {
    rows: Vec<Row>,
    limit: usize,
}

impl TsvSuggestions {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let s = fs::read_to_string(path)?;
        Self::from_tsv_str(&s)
    }

    pub fn from_tsv_str(s: &str) -> Result<Self, LoadError> {
        let mut rows = Vec::new();
        for (idx, line) in s.lines().enumerate() {
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let mut it = line.split('\t');
            let label = it.next().unwrap_or("").trim();
            if label.is_empty() {
                return Err(LoadError::MissingLabel { line: idx + 1 });
            }
            let icon = it
                .next()
                .map(str::trim)
                .filter(|x| !x.is_empty())
                .map(str::to_owned);
            let data = match it.next().map(str::trim).filter(|x| !x.is_empty()) {
                Some(raw) => Some(
                    serde_json::from_str::<Value>(raw)
                        .map_err(|source| LoadError::InvalidData { line: idx + 1, source })?,
                ),
                None => None,
            };
            let candidate = if icon.is_none() && data.is_none() {
                Candidate::plain(label)
            } else {
                Candidate::labeled(label, icon, data)
            };
            rows.push(Row {
                candidate,
                key: label.to_lowercase(),
            });
        }
        debug!(count = rows.len(), "suggestions loaded");
        Ok(Self {
            rows,
            limit: DEFAULT_LIMIT,
        })
    }

    /// 设置返回数量上限；0 会被当作 1。
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl SuggestionProvider for TsvSuggestions {
    /// 不区分大小写：先前缀匹配，再子串匹配；组内保持文件顺序。
    fn suggest(&self, input: &str) -> Vec<Candidate> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let prefix = self.rows.iter().filter(|r| r.key.starts_with(&needle));
        let inner = self
            .rows
            .iter()
            .filter(|r| !r.key.starts_with(&needle) && r.key.contains(&needle));
        prefix
            .chain(inner)
            .take(self.limit)
            .map(|r| r.candidate.clone())
            .collect()
    }
}
