//! 记录读数回放
//!
//! 用侦测记录文件里保存的 OCR 文字与手写读数充当识别器，
//! 依区域矩形框查找对应读数

use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

use crate::error::RecognitionError;
use crate::infrastructure::handwriting::{HandwriteLabel, HandwritingPrediction};
use crate::infrastructure::item_ocr::clean_ocr_text;
use crate::infrastructure::recognizer::{HandwritingClassifier, ItemOcrEngine};
use crate::models::page::{PageDump, RecordedHandwriting};
use crate::models::region::{BoundingBox, Region};
use crate::services::region_builder::round_box;

/// 一页的记录读数
#[derive(Debug, Clone, Default)]
pub struct RecordedReadings {
    ocr: HashMap<BoundingBox, String>,
    handwriting: HashMap<BoundingBox, RecordedHandwriting>,
    threshold: f32,
}

impl RecordedReadings {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }

    /// 从页面记录建立；矩形框不合法的记录略过（建构区域时会报错）
    ///
    /// 多条记录取整后落在同一个矩形框时，只保留第一条读数
    pub fn from_page(page: &PageDump, threshold: f32) -> Self {
        let mut readings = Self::new(threshold);
        for (position, detection) in page.detections.iter().enumerate() {
            let Some(bbox) = round_box(detection.bbox) else {
                continue;
            };
            if let Some(text) = &detection.ocr_text {
                match readings.ocr.entry(bbox) {
                    Entry::Vacant(slot) => {
                        slot.insert(text.clone());
                    }
                    Entry::Occupied(_) => {
                        debug!("第 {} 条侦测的矩形框 {} 重复，忽略其 OCR 读数", position, bbox);
                    }
                }
            }
            if let Some(handwriting) = &detection.handwriting {
                match readings.handwriting.entry(bbox) {
                    Entry::Vacant(slot) => {
                        slot.insert(handwriting.clone());
                    }
                    Entry::Occupied(_) => {
                        debug!("第 {} 条侦测的矩形框 {} 重复，忽略其手写读数", position, bbox);
                    }
                }
            }
        }
        readings
    }

    /// 加入一条 OCR 读数（链式调用）
    pub fn with_ocr(mut self, bbox: BoundingBox, text: impl Into<String>) -> Self {
        self.ocr.insert(bbox, text.into());
        self
    }

    /// 加入一条手写读数（链式调用）
    pub fn with_handwriting(mut self, bbox: BoundingBox, label: &str, confidence: f32) -> Self {
        self.handwriting.insert(
            bbox,
            RecordedHandwriting::Label {
                label: label.to_string(),
                confidence,
            },
        );
        self
    }
}

#[async_trait]
impl ItemOcrEngine for RecordedReadings {
    async fn read_item_number(&self, region: &Region) -> Result<String, RecognitionError> {
        let text = self
            .ocr
            .get(&region.bbox)
            .map(|raw| clean_ocr_text(raw))
            .unwrap_or_default();
        debug!("区域 #{} 题号读数: {:?}", region.id, text);
        Ok(text)
    }
}

#[async_trait]
impl HandwritingClassifier for RecordedReadings {
    async fn classify(&self, region: &Region) -> Result<HandwritingPrediction, RecognitionError> {
        if region.bbox.width() <= 0 || region.bbox.height() <= 0 {
            return Ok(HandwritingPrediction::empty());
        }

        let prediction = match self.handwriting.get(&region.bbox) {
            Some(RecordedHandwriting::Scores { scores }) => {
                HandwritingPrediction::from_scores(scores, self.threshold)
            }
            Some(RecordedHandwriting::Label { label, confidence }) => {
                HandwritingPrediction::with_threshold(
                    HandwriteLabel::parse(label),
                    *confidence,
                    self.threshold,
                )
            }
            None => HandwritingPrediction {
                label: HandwriteLabel::Unknown,
                confidence: 0.0,
            },
        };
        debug!(
            "区域 #{} 手写读数: {} ({:.2})",
            region.id, prediction.label, prediction.confidence
        );
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::page::RecordedDetection;
    use crate::models::region::RegionClass;

    fn region(id: usize, bbox: BoundingBox, class: RegionClass) -> Region {
        Region {
            id,
            bbox,
            confidence: 0.9,
            class,
        }
    }

    #[test]
    fn test_replay_from_page() {
        let page = PageDump {
            page_id: "p1".to_string(),
            image_path: None,
            detections: vec![
                RecordedDetection {
                    bbox: [60.2, 11.6, 100.0, 32.0],
                    confidence: 0.9,
                    class_index: 5,
                    ocr_text: Some(" 1. ".to_string()),
                    handwriting: None,
                },
                RecordedDetection {
                    bbox: [110.0, 14.0, 140.0, 30.0],
                    confidence: 0.9,
                    class_index: 1,
                    ocr_text: None,
                    handwriting: Some(RecordedHandwriting::Label {
                        label: "b".to_string(),
                        confidence: 0.97,
                    }),
                },
            ],
            file_path: None,
        };
        let readings = RecordedReadings::from_page(&page, 0.85);

        let item = region(0, BoundingBox::new(60, 12, 100, 32), RegionClass::Item);
        let answer = region(1, BoundingBox::new(110, 14, 140, 30), RegionClass::Answer);

        let text = tokio_test::block_on(readings.read_item_number(&item)).unwrap();
        assert_eq!(text, "1");

        let prediction = tokio_test::block_on(readings.classify(&answer)).unwrap();
        assert_eq!(prediction.letter(), Some("B"));
    }

    #[test]
    fn test_replay_keeps_first_reading_on_shared_box() {
        let answer = |bbox: [f32; 4], label: &str| RecordedDetection {
            bbox,
            confidence: 0.9,
            class_index: 1,
            ocr_text: None,
            handwriting: Some(RecordedHandwriting::Label {
                label: label.to_string(),
                confidence: 0.95,
            }),
        };
        let page = PageDump {
            page_id: "p1".to_string(),
            image_path: None,
            detections: vec![
                answer([110.2, 14.0, 140.0, 30.0], "A"),
                answer([109.8, 14.0, 140.0, 30.0], "C"),
            ],
            file_path: None,
        };
        let readings = RecordedReadings::from_page(&page, 0.85);

        let shared = region(0, BoundingBox::new(110, 14, 140, 30), RegionClass::Answer);
        let prediction = tokio_test::block_on(readings.classify(&shared)).unwrap();
        assert_eq!(prediction.letter(), Some("A"));
    }

    #[test]
    fn test_replay_missing_readings() {
        let readings = RecordedReadings::new(0.85);
        let item = region(0, BoundingBox::new(0, 0, 10, 10), RegionClass::Item);

        let text = tokio_test::block_on(readings.read_item_number(&item)).unwrap();
        assert!(text.is_empty());

        let prediction = tokio_test::block_on(readings.classify(&item)).unwrap();
        assert_eq!(prediction.label, HandwriteLabel::Unknown);
    }
}
