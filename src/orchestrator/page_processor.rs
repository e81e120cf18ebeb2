//! 单页处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **建立识别器**：以页面记录中的读数建立回放识别器
//! 2. **流程调度**：委托 `PageFlow` 完成一页的批改
//! 3. **报告写入**：把报告写到配置指定的输出目录

use crate::config::Config;
use crate::infrastructure::RecordedReadings;
use crate::models::{AnswerKey, PageDump};
use crate::services::ReportWriter;
use crate::workflow::{PageCtx, PageFlow, PageReport};
use anyhow::{Context, Result};
use tracing::info;

/// 处理单个页面
///
/// # 参数
/// - `page`: 页面侦测记录
/// - `page_index`: 页面索引（用于日志）
/// - `answer_key`: 标准答案
/// - `writer`: 报告写入服务
/// - `config`: 配置
///
/// # 返回
/// 返回该页的批改报告；结构性输入错误会使本页失败
pub async fn process_page(
    page: PageDump,
    page_index: usize,
    answer_key: &AnswerKey,
    writer: &ReportWriter,
    config: &Config,
) -> Result<PageReport> {
    let ctx = PageCtx::new(page.page_id.clone(), page_index, page.image_path.clone());
    log_page_start(&ctx, page.detections.len());

    let readings = RecordedReadings::from_page(&page, config.handwrite_confidence_threshold);
    let flow = PageFlow::new(config);

    let report = flow
        .run(
            &page.raw_detections(),
            answer_key,
            &readings,
            &readings,
            &ctx,
        )
        .await
        .with_context(|| format!("页面 {} 批改失败", ctx.page_id))?;

    writer
        .write(&report, page_index)
        .await
        .with_context(|| format!("页面 {} 报告写入失败", ctx.page_id))?;

    info!("\n{} ✅ 页面处理完成\n", ctx);
    Ok(report)
}

fn log_page_start(ctx: &PageCtx, detection_count: usize) {
    info!("{} 开始批改", ctx);
    if let Some(path) = &ctx.image_path {
        info!("{} 图片: {}", ctx, path);
    }
    info!("{} 侦测区域总数: {}", ctx, detection_count);
}
