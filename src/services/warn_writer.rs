//! 警告写入服务 - 业务能力层
//!
//! 只负责"写 warn.txt"能力，不关心流程

use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 警告写入服务
///
/// 职责：
/// - 将无法批改的页面写入输出目录下的 warn.txt
/// - 只处理单个页面的警告
pub struct WarnWriter {
    warn_file_path: PathBuf,
}

impl WarnWriter {
    /// 在输出目录下创建
    pub fn new(output_dir: &Path) -> Self {
        Self {
            warn_file_path: output_dir.join("warn.txt"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.warn_file_path
    }

    /// 写入警告信息
    ///
    /// # 参数
    /// - `page_id`: 页面ID
    /// - `page_index`: 页面索引
    /// - `reason`: 失败原因
    pub async fn write(&self, page_id: &str, page_index: usize, reason: &str) -> Result<()> {
        debug!("写入警告: 页面 {} (#{}) | {}", page_id, page_index, reason);

        if let Some(parent) = self.warn_file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)
            .await?;

        let warn_msg = format!("页面 {} | 序号 {} | 原因: {}\n", page_id, page_index, reason);

        file.write_all(warn_msg.as_bytes()).await?;

        Ok(())
    }
}
