//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量页面处理器
//! - 管理应用生命周期（初始化、运行）
//! - 批量加载侦测记录（Vec<PageDump>）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ### `page_processor` - 单页处理器
//! - 以记录读数建立识别器
//! - 委托 PageFlow 批改
//! - 写入报告
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<PageDump>)
//!     ↓
//! page_processor (处理单个 PageDump)
//!     ↓
//! workflow::PageFlow (建构 → 配对 → 组合 → 批改)
//!     ↓
//! services (能力层：region_builder / proximity_matcher / answer_composer / grading)
//!     ↓
//! infrastructure (识别器：OCR / 手写识别)
//! ```

pub mod batch_processor;
pub mod page_processor;

// 重新导出主要类型
pub use batch_processor::{App, ProcessingStats};
pub use page_processor::process_page;
