use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 题号不在标准答案中时的说明
pub const NOT_IN_KEY_NOTE: &str = "题号未在正确答案中找到";

/// 标准答案缺题时的占位
pub const NOT_AVAILABLE: &str = "N/A";

/// 单题批改明细
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeDetail {
    pub item_id: String,
    pub predicted_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub score_awarded: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// 一页的批改结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeResult {
    pub total_score: u32,
    pub details: BTreeMap<String, GradeDetail>,
}

impl GradeResult {
    pub fn correct_count(&self) -> usize {
        self.details.values().filter(|d| d.is_correct).count()
    }

    /// 题号不在标准答案中的明细数
    pub fn not_in_key_count(&self) -> usize {
        self.details
            .values()
            .filter(|d| d.correct_answer == NOT_AVAILABLE && d.note.is_some())
            .count()
    }
}
