//! # Answer Sheet Grader
//!
//! 扫描答案卡的自动批改：从物件侦测结果还原「题目 → 题号 → 作答」关系，
//! 再与标准答案比对计分
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 外部识别器的接口（题号 OCR、手写识别）
//! - `RecordedReadings` - 以侦测记录中的读数回放识别结果
//!
//! ### ② 业务能力层（Services）
//! - `region_builder` - 侦测输出 → 排序后的区域序列
//! - `proximity_matcher` - 锚点与题号的就近配对
//! - `answer_composer` - 组合「题号文字 → 作答字母」对应表
//! - `grading_service` - 与标准答案比对计分
//!
//! ### ③ 流程层（Workflow）
//! - `PageFlow` - 一页的完整批改流程
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量页面处理，管理并发
//! - `orchestrator/page_processor` - 单页处理与报告写入
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{PipelineError, PipelineResult, RecognitionError};
pub use infrastructure::{HandwritingClassifier, ItemOcrEngine, RecordedReadings};
pub use models::{AnswerKey, FinalMap, GradeDetail, GradeResult, RawDetection, Region, RegionClass};
pub use orchestrator::{process_page, App};
pub use services::{build_regions, grade_results, AnswerGraphComposer, ProximityMatcher};
pub use workflow::{PageCtx, PageFlow, PageReport};
