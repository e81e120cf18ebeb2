//! 页面批改流程 - 流程层
//!
//! 核心职责：定义"一页"的完整批改流程
//!
//! 流程顺序：
//! 1. 建构区域（依垂直中点排序）
//! 2. 题目 → 题号 配对
//! 3. 作答区 → 题号 配对
//! 4. 组合题号与作答（OCR + 手写识别）
//! 5. 与标准答案比对批改
//!
//! 每一步严格依序执行，不持有任何跨页面的可变状态

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::PipelineResult;
use crate::infrastructure::{HandwritingClassifier, ItemOcrEngine};
use crate::models::answer::FinalMap;
use crate::models::answer_key::AnswerKey;
use crate::models::grade::GradeResult;
use crate::models::region::{BoundingBox, RawDetection, Region, RegionClass};
use crate::services::{
    build_regions, grade_results, AnswerGraphComposer, ComposedPage, MatchLink, ProximityMatcher,
};
use crate::workflow::page_ctx::PageCtx;

/// 单个区域的摘要，供标注与前端显示
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionSummary {
    pub id: usize,
    pub class: RegionClass,
    /// 四舍五入到两位小数
    pub confidence: f32,
    pub bbox: BoundingBox,
    /// 作答区的手写字母或题号的 OCR 文字
    pub text: Option<String>,
}

/// 批改统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GradeSummary {
    pub graded: usize,
    pub correct: usize,
    pub not_in_key: usize,
    pub total_score: u32,
    pub max_score: u32,
}

/// 一页的批改报告
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub page_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    pub detections: Vec<DetectionSummary>,
    pub links: Vec<MatchLink>,
    pub final_map: FinalMap,
    pub grading: GradeResult,
    pub summary: GradeSummary,
}

/// 页面批改流程
///
/// - 编排一页的完整批改流程
/// - 不持有识别器，由调用方传入
pub struct PageFlow {
    question_matcher: ProximityMatcher,
    answer_matcher: ProximityMatcher,
    verbose_logging: bool,
}

impl PageFlow {
    /// 创建新的页面批改流程
    pub fn new(config: &Config) -> Self {
        Self {
            question_matcher: ProximityMatcher::question_to_item()
                .with_max_distance(config.max_match_distance),
            answer_matcher: ProximityMatcher::answer_to_item()
                .with_max_distance(config.max_match_distance),
            verbose_logging: config.verbose_logging,
        }
    }

    pub async fn run(
        &self,
        detections: &[RawDetection],
        answer_key: &AnswerKey,
        ocr: &dyn ItemOcrEngine,
        classifier: &dyn HandwritingClassifier,
        ctx: &PageCtx,
    ) -> PipelineResult<PageReport> {
        // ========== 步骤 1: 建构区域 ==========
        let regions = build_regions(detections)?;
        info!("{} 共 {} 个区域", ctx, regions.len());

        // ========== 步骤 2/3: 两次独立配对 ==========
        let question_match = self.question_matcher.match_regions(&regions);
        let answer_match = self.answer_matcher.match_regions(&regions);
        info!(
            "{} 🔗 题目配对 {} 组，作答配对 {} 组",
            ctx,
            question_match.len(),
            answer_match.len()
        );

        // ========== 步骤 4: 组合作答关系 ==========
        let composer = AnswerGraphComposer::new(ocr, classifier);
        let composed = composer
            .compose(&regions, &question_match, &answer_match)
            .await;
        info!("{} 📝 对应表: {} 题", ctx, composed.final_map.len());

        if self.verbose_logging {
            self.log_final_map(ctx, &composed.final_map);
        }

        // ========== 步骤 5: 批改 ==========
        let grading = grade_results(&composed.final_map, answer_key);
        let summary = GradeSummary {
            graded: grading.details.len(),
            correct: grading.correct_count(),
            not_in_key: grading.not_in_key_count(),
            total_score: grading.total_score,
            max_score: answer_key.max_score(),
        };
        info!(
            "{} ✓ 批改完成: 得分 {}/{}，答对 {}/{}",
            ctx, summary.total_score, summary.max_score, summary.correct, summary.graded
        );

        Ok(PageReport {
            page_id: ctx.page_id.clone(),
            image_path: ctx.image_path.clone(),
            detections: summarize(&regions, &composed),
            links: composed.links,
            final_map: composed.final_map,
            grading,
            summary,
        })
    }

    fn log_final_map(&self, ctx: &PageCtx, final_map: &FinalMap) {
        for (label, letter) in final_map.iter() {
            debug!("{}   题号 {} → {}", ctx, label, letter);
        }
    }
}

fn summarize(regions: &[Region], composed: &ComposedPage) -> Vec<DetectionSummary> {
    regions
        .iter()
        .map(|region| {
            let text = match region.class {
                RegionClass::Answer => composed
                    .answer_labels
                    .get(&region.id)
                    .and_then(|p| p.letter())
                    .map(str::to_string),
                RegionClass::Item => composed
                    .item_numbers
                    .get(&region.id)
                    .filter(|text| !text.is_empty())
                    .cloned(),
                _ => None,
            };
            DetectionSummary {
                id: region.id,
                class: region.class,
                confidence: (region.confidence * 100.0).round() / 100.0,
                bbox: region.bbox,
                text,
            }
        })
        .collect()
}
