use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 单题的标准答案与配分
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerKeyEntry {
    pub answer: String,
    pub score: u32,
}

/// 标准答案（题号 → 答案与配分）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub answers: BTreeMap<String, AnswerKeyEntry>,
}

impl AnswerKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一题（链式调用）
    pub fn with_entry(mut self, item_id: impl Into<String>, answer: impl Into<String>, score: u32) -> Self {
        self.answers.insert(
            item_id.into(),
            AnswerKeyEntry {
                answer: answer.into(),
                score,
            },
        );
        self
    }

    pub fn get(&self, item_id: &str) -> Option<&AnswerKeyEntry> {
        self.answers.get(item_id)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// 满分
    pub fn max_score(&self) -> u32 {
        self.answers.values().map(|entry| entry.score).sum()
    }
}
