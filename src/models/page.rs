//! 页面侦测记录
//!
//! 一张扫描页的侦测器输出，附带识别器对各区域的记录读数

use crate::models::region::RawDetection;
use serde::{Deserialize, Serialize};

/// 手写识别的记录读数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordedHandwriting {
    /// 分类器各类别的原始分数
    Scores { scores: Vec<f32> },
    /// 已解码的标签与信心值
    Label { label: String, confidence: f32 },
}

/// 一条侦测记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedDetection {
    pub bbox: [f32; 4],
    pub confidence: f32,
    pub class_index: i64,
    /// 题号 OCR 原始文字（仅 item）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<String>,
    /// 手写识别读数（仅 answer）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handwriting: Option<RecordedHandwriting>,
}

impl RecordedDetection {
    pub fn raw(&self) -> RawDetection {
        RawDetection::new(self.bbox, self.confidence, self.class_index)
    }
}

/// 一页的侦测记录文件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDump {
    pub page_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default)]
    pub detections: Vec<RecordedDetection>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl PageDump {
    pub fn raw_detections(&self) -> Vec<RawDetection> {
        self.detections.iter().map(RecordedDetection::raw).collect()
    }
}
