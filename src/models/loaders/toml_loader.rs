use crate::models::answer_key::AnswerKey;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载标准答案
pub async fn load_answer_key(toml_file_path: &Path) -> Result<AnswerKey> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取标准答案文件: {}", toml_file_path.display()))?;

    let key = parse_answer_key(&content)
        .with_context(|| format!("无法解析标准答案文件: {}", toml_file_path.display()))?;

    tracing::info!(
        "成功加载标准答案: {} 题, 满分 {}",
        key.len(),
        key.max_score()
    );

    Ok(key)
}

/// 解析标准答案内容
pub fn parse_answer_key(content: &str) -> Result<AnswerKey> {
    let key: AnswerKey = toml::from_str(content)?;

    if key.is_empty() {
        tracing::warn!("⚠️ 标准答案中没有任何题目");
    }

    Ok(key)
}
