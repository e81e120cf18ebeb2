/// 批改报告写入服务
///
/// 把每页的报告写成 `<输出目录>/<页面ID>.json`。
/// 输出目录由调用方明确传入，不使用任何全局状态。
use crate::error::{PipelineError, PipelineResult};
use crate::workflow::PageReport;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{info, warn};

pub struct ReportWriter {
    output_dir: PathBuf,
    /// 本次运行已占用的报告路径
    claimed: Mutex<HashSet<PathBuf>>,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            claimed: Mutex::new(HashSet::new()),
        }
    }

    /// 报告文件路径；页面ID中的路径分隔符替换为底线
    pub fn report_path(&self, page_id: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.json", sanitize_file_name(page_id)))
    }

    /// 占用一个报告路径
    ///
    /// 页面ID重复时改用 `<页面ID>_<序号>.json`，避免覆盖先写入的报告
    fn claim_path(&self, page_id: &str, page_index: usize) -> PathBuf {
        let mut claimed = self.claimed.lock().unwrap_or_else(|e| e.into_inner());

        let path = self.report_path(page_id);
        if claimed.insert(path.clone()) {
            return path;
        }

        let fallback = self.output_dir.join(format!(
            "{}_{}.json",
            sanitize_file_name(page_id),
            page_index
        ));
        warn!(
            "⚠️ 页面ID {} 重复，报告改存为 {}",
            page_id,
            fallback.display()
        );
        claimed.insert(fallback.clone());
        fallback
    }

    /// 写入一页报告，返回文件路径
    pub async fn write(&self, report: &PageReport, page_index: usize) -> PipelineResult<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| PipelineError::write_failed(self.output_dir.display().to_string(), e))?;

        let path = self.claim_path(&report.page_id, page_index);
        let content = serde_json::to_string_pretty(report)?;

        tokio::fs::write(&path, content)
            .await
            .map_err(|e| PipelineError::write_failed(path.display().to_string(), e))?;

        info!("✅ 报告已储存: {}", path.display());
        Ok(path)
    }
}

fn sanitize_file_name(page_id: &str) -> String {
    page_id
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect()
}
