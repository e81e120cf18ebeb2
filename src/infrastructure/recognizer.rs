//! 识别器接口
//!
//! 题号 OCR 与手写识别都是外部协作方，流水线只依赖这两个 trait。
//! 实现需可在多个页面间共享（`Send + Sync`）。

use async_trait::async_trait;

use crate::error::RecognitionError;
use crate::infrastructure::handwriting::HandwritingPrediction;
use crate::models::region::Region;

/// 题号 OCR 引擎
#[async_trait]
pub trait ItemOcrEngine: Send + Sync {
    /// 读取 item 区域内的题号文字（已去除首尾空白，可能含杂讯）
    async fn read_item_number(&self, region: &Region) -> Result<String, RecognitionError>;
}

/// 手写字母分类器
///
/// 信心值门槛在实现内部套用，低于门槛的结果必须回报为 UNKNOWN
#[async_trait]
pub trait HandwritingClassifier: Send + Sync {
    async fn classify(&self, region: &Region) -> Result<HandwritingPrediction, RecognitionError>;
}
