/// 批改服务
///
/// 把「题号文字 → 作答字母」对应表与标准答案比对，计算总分与逐题明细
use crate::models::answer::FinalMap;
use crate::models::answer_key::AnswerKey;
use crate::models::grade::{GradeDetail, GradeResult, NOT_AVAILABLE, NOT_IN_KEY_NOTE};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static NON_DIGIT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\D").unwrap_or_else(|e| panic!("非数字正则表达式编译失败: {e}"))
});

/// 去掉所有非数字字符
pub fn strip_non_digits(text: &str) -> String {
    NON_DIGIT_REGEX.replace_all(text, "").into_owned()
}

/// 批改一页
///
/// 纯函数：相同的对应表与标准答案永远得到相同结果。
/// 题号清理后为空的条目直接略过；题号不在标准答案中时给 0 分并附上说明。
/// 不同题号文字清理后相同时，后出现的明细取代先出现的，总分依最终明细计算。
pub fn grade_results(final_map: &FinalMap, answer_key: &AnswerKey) -> GradeResult {
    let mut result = GradeResult::default();

    for (item_label, predicted) in final_map.iter() {
        let item_id = strip_non_digits(item_label);
        if item_id.is_empty() {
            debug!("题号 {:?} 不含数字，略过", item_label);
            continue;
        }

        let detail = match answer_key.get(&item_id) {
            Some(entry) => {
                let is_correct = predicted.to_lowercase() == entry.answer.to_lowercase();
                GradeDetail {
                    item_id: item_id.clone(),
                    predicted_answer: Some(predicted.to_string()),
                    correct_answer: entry.answer.clone(),
                    is_correct,
                    score_awarded: if is_correct { entry.score } else { 0 },
                    note: None,
                }
            }
            None => GradeDetail {
                item_id: item_id.clone(),
                predicted_answer: Some(predicted.to_string()),
                correct_answer: NOT_AVAILABLE.to_string(),
                is_correct: false,
                score_awarded: 0,
                note: Some(NOT_IN_KEY_NOTE.to_string()),
            },
        };

        result.details.insert(item_id, detail);
    }

    result.total_score = result
        .details
        .values()
        .filter(|d| d.is_correct)
        .map(|d| d.score_awarded)
        .sum();

    result
}
