//! 批量页面处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量页面的批改和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：建立日志文件、加载标准答案
//! 2. **批量加载**：扫描并加载所有侦测记录（`Vec<PageDump>`）
//! 3. **并发控制**：使用 Semaphore 限制并发数量
//! 4. **分批处理**：每批完成后再开始下一批
//! 5. **全局统计**：汇总所有页面的批改结果
//!
//! 单页失败只影响该页，会写入 warn.txt 并计入失败数；
//! 无法解析的侦测记录文件同样计为失败页面

use crate::config::Config;
use crate::models::{AnswerKey, LoadedPages, PageDump, PageLoadFailure};
use crate::orchestrator::page_processor;
use crate::services::{ReportWriter, WarnWriter};
use crate::utils::logging::{
    init_log_file, log_batch_complete, log_batch_start, log_pages_loaded, log_startup,
    print_final_stats,
};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    answer_key: Arc<AnswerKey>,
    report_writer: Arc<ReportWriter>,
    warn_writer: Arc<WarnWriter>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(config.max_concurrent_pages, &config.output_dir);

        // 加载标准答案
        let answer_key = crate::models::load_answer_key(&config.answer_key_path).await?;

        Ok(Self::with_answer_key(config, answer_key))
    }

    /// 使用已加载的标准答案创建
    pub fn with_answer_key(config: Config, answer_key: AnswerKey) -> Self {
        let report_writer = ReportWriter::new(config.output_dir.clone());
        let warn_writer = WarnWriter::new(&config.output_dir);
        Self {
            config,
            answer_key: Arc::new(answer_key),
            report_writer: Arc::new(report_writer),
            warn_writer: Arc::new(warn_writer),
        }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        // 加载所有侦测记录
        let loaded = self.load_pages().await?;

        if loaded.is_empty() {
            warn!("⚠️ 没有找到待批改的侦测记录，程序结束");
            return Ok(ProcessingStats::default());
        }

        log_pages_loaded(loaded.total(), self.config.max_concurrent_pages);

        let mut stats = self.record_load_failures(&loaded.failures).await;
        let processed = self.process_all_pages(loaded.pages).await?;
        stats.success += processed.success;
        stats.failed += processed.failed;
        stats.total += processed.total;
        stats.total_score += processed.total_score;

        print_final_stats(
            stats.success,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    /// 加载侦测记录
    async fn load_pages(&self) -> Result<LoadedPages> {
        info!("\n📁 正在扫描侦测记录...");
        crate::models::load_all_page_dumps(&self.config.pages_folder).await
    }

    /// 无法解析的文件直接计为失败页面，并写入 warn.txt
    async fn record_load_failures(&self, failures: &[PageLoadFailure]) -> ProcessingStats {
        for (idx, failure) in failures.iter().enumerate() {
            let page_id = failure.page_id();
            error!("[文件 {}] ❌ 侦测记录无法解析: {}", failure.path.display(), failure.reason);
            if let Err(e) = self
                .warn_writer
                .write(&page_id, idx + 1, &failure.reason)
                .await
            {
                error!("[文件 {}] 写入 warn.txt 失败: {}", failure.path.display(), e);
            }
        }

        ProcessingStats {
            failed: failures.len(),
            total: failures.len(),
            ..Default::default()
        }
    }

    /// 处理所有页面
    pub async fn process_all_pages(&self, all_pages: Vec<PageDump>) -> Result<ProcessingStats> {
        let batch_size = self.config.max_concurrent_pages.max(1);
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total_pages = all_pages.len();
        let total_batches = total_pages.div_ceil(batch_size);
        let mut stats = ProcessingStats {
            total: total_pages,
            ..Default::default()
        };

        // 分批处理
        for (batch_idx, batch_pages) in all_pages.chunks(batch_size).enumerate() {
            let batch_start = batch_idx * batch_size;
            let batch_num = batch_idx + 1;

            log_batch_start(
                batch_num,
                total_batches,
                batch_start + 1,
                batch_start + batch_pages.len(),
                total_pages,
            );

            let batch_result = self
                .process_batch(batch_pages, batch_start, semaphore.clone())
                .await?;

            stats.success += batch_result.success;
            stats.failed += batch_result.failed;
            stats.total_score += batch_result.total_score;

            log_batch_complete(
                batch_num,
                batch_result.success,
                batch_result.success + batch_result.failed,
            );
        }

        Ok(stats)
    }

    /// 处理单个批次
    async fn process_batch(
        &self,
        batch_pages: &[PageDump],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<BatchResult> {
        let mut batch_handles = Vec::with_capacity(batch_pages.len());

        for (idx, page) in batch_pages.iter().enumerate() {
            let page_index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;

            let page = page.clone();
            let config = self.config.clone();
            let answer_key = Arc::clone(&self.answer_key);
            let report_writer = Arc::clone(&self.report_writer);
            let warn_writer = Arc::clone(&self.warn_writer);

            let handle = tokio::spawn(async move {
                let _permit = permit;
                let page_id = page.page_id.clone();

                match page_processor::process_page(
                    page,
                    page_index,
                    &answer_key,
                    &report_writer,
                    &config,
                )
                .await
                {
                    Ok(report) => Some(report.summary.total_score),
                    Err(e) => {
                        error!("[页面 {}] ❌ 批改过程中发生错误: {:#}", page_index, e);
                        if let Err(write_err) = warn_writer
                            .write(&page_id, page_index, &format!("{:#}", e))
                            .await
                        {
                            error!("[页面 {}] 写入 warn.txt 失败: {}", page_index, write_err);
                        }
                        None
                    }
                }
            });
            batch_handles.push((page_index, handle));
        }

        // 等待本批所有任务完成
        let (indices, handles): (Vec<usize>, Vec<_>) = batch_handles.into_iter().unzip();
        let outcomes = futures::future::join_all(handles).await;

        let mut result = BatchResult::default();
        for (page_index, outcome) in indices.into_iter().zip(outcomes) {
            match outcome {
                Ok(Some(score)) => {
                    result.success += 1;
                    result.total_score += u64::from(score);
                }
                Ok(None) => {
                    result.failed += 1;
                }
                Err(e) => {
                    error!("[页面 {}] 任务执行失败: {}", page_index, e);
                    result.failed += 1;
                }
            }
        }

        Ok(result)
    }
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
    /// 所有成功页面的得分合计
    pub total_score: u64,
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    success: usize,
    failed: usize,
    total_score: u64,
}
