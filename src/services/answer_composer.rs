/// 作答关系组合服务
///
/// 把「题目 → 题号」与「作答区 → 题号」两次配对，
/// 结合题号 OCR 与手写识别读数，组合成「题号文字 → 作答字母」对应表。
///
/// 只有在题目配对中出现过的题号才算有效，作答配对到无效题号时直接忽略。
use crate::infrastructure::{HandwriteLabel, HandwritingClassifier, HandwritingPrediction, ItemOcrEngine};
use crate::models::answer::{AnswerRecord, FinalMap};
use crate::models::region::{Region, RegionClass};
use crate::services::proximity_matcher::AnchorMatch;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// 配对连线的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Question,
    Answer,
}

/// 一条配对连线，供标注绘图使用
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchLink {
    pub kind: LinkKind,
    pub anchor_id: usize,
    pub item_id: usize,
    /// 锚点中心
    pub from: (i32, i32),
    /// 题号中心
    pub to: (i32, i32),
}

/// 组合结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComposedPage {
    /// 题号文字 → 作答字母
    pub final_map: FinalMap,
    /// 有效题号的区域索引 → OCR 文字
    pub item_numbers: BTreeMap<usize, String>,
    /// 作答区索引 → 手写识别结果
    pub answer_labels: BTreeMap<usize, HandwritingPrediction>,
    /// 有效的 (作答区, 题号) 配对读数，依配对顺序
    pub records: Vec<AnswerRecord>,
    pub links: Vec<MatchLink>,
}

/// 作答关系组合器
pub struct AnswerGraphComposer<'a> {
    ocr: &'a dyn ItemOcrEngine,
    classifier: &'a dyn HandwritingClassifier,
}

impl<'a> AnswerGraphComposer<'a> {
    pub fn new(ocr: &'a dyn ItemOcrEngine, classifier: &'a dyn HandwritingClassifier) -> Self {
        Self { ocr, classifier }
    }

    /// 组合一页的作答关系
    ///
    /// # 参数
    /// - `regions`: 已排序的区域序列
    /// - `question_match`: 题目 → 题号 配对
    /// - `answer_match`: 作答区 → 题号 配对
    pub async fn compose(
        &self,
        regions: &[Region],
        question_match: &AnchorMatch,
        answer_match: &AnchorMatch,
    ) -> ComposedPage {
        let mut page = ComposedPage {
            answer_labels: self.classify_answers(regions).await,
            ..Default::default()
        };

        // 第一步：题目配对到的题号才有效，并读取题号
        let mut valid_items = BTreeSet::new();
        for (&q_idx, item_indices) in question_match {
            let Some(question) = regions.get(q_idx) else {
                continue;
            };
            for &i_idx in item_indices {
                let Some(item) = regions.get(i_idx) else {
                    continue;
                };
                if !page.item_numbers.contains_key(&i_idx) {
                    let text = self.read_item_number(item).await;
                    page.item_numbers.insert(i_idx, text);
                }
                valid_items.insert(i_idx);
                page.links.push(link(LinkKind::Question, question, item));
            }
        }

        // 第二步：作答区配对到有效题号时，写入对应表
        for (&a_idx, item_indices) in answer_match {
            let Some(answer) = regions.get(a_idx) else {
                continue;
            };
            for &i_idx in item_indices {
                if !valid_items.contains(&i_idx) {
                    debug!("作答区 #{} 配对到的题号 #{} 不在题目配对中，忽略", a_idx, i_idx);
                    continue;
                }
                let Some(item) = regions.get(i_idx) else {
                    continue;
                };

                let record = AnswerRecord {
                    item_label: page.item_numbers.get(&i_idx).cloned().unwrap_or_default(),
                    answer_letter: page
                        .answer_labels
                        .get(&a_idx)
                        .and_then(HandwritingPrediction::letter)
                        .map(str::to_string),
                };

                if let Some((label, letter)) = record.usable() {
                    if let Some(previous) = page.final_map.insert(label, letter) {
                        debug!(
                            "题号 {} 重复出现，作答 {} 覆盖为 {}",
                            label, previous, letter
                        );
                    }
                } else {
                    debug!(
                        "作答区 #{} / 题号 #{} 读数不完整，略过 ({:?})",
                        a_idx, i_idx, record
                    );
                }

                page.records.push(record);
                page.links.push(link(LinkKind::Answer, answer, item));
            }
        }

        page
    }

    /// 依区域顺序对每个作答区做一次手写识别
    async fn classify_answers(&self, regions: &[Region]) -> BTreeMap<usize, HandwritingPrediction> {
        let mut labels = BTreeMap::new();
        for region in regions.iter().filter(|r| r.is(RegionClass::Answer)) {
            let prediction = match self.classifier.classify(region).await {
                Ok(prediction) => prediction,
                Err(e) => {
                    warn!("⚠️ 作答区 #{} 手写识别失败: {}", region.id, e);
                    HandwritingPrediction {
                        label: HandwriteLabel::Unknown,
                        confidence: 0.0,
                    }
                }
            };
            labels.insert(region.id, prediction);
        }
        labels
    }

    async fn read_item_number(&self, item: &Region) -> String {
        match self.ocr.read_item_number(item).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("⚠️ 题号 #{} OCR 失败: {}", item.id, e);
                String::new()
            }
        }
    }
}

fn link(kind: LinkKind, anchor: &Region, item: &Region) -> MatchLink {
    MatchLink {
        kind,
        anchor_id: anchor.id,
        item_id: item.id,
        from: anchor.bbox.center_px(),
        to: item.bbox.center_px(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecognitionError;
    use crate::infrastructure::RecordedReadings;
    use crate::models::region::BoundingBox;
    use crate::services::proximity_matcher::ProximityMatcher;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn region(id: usize, bbox: BoundingBox, class: RegionClass) -> Region {
        Region {
            id,
            bbox,
            confidence: 0.9,
            class,
        }
    }

    fn compose(regions: &[Region], readings: &RecordedReadings) -> ComposedPage {
        let question_match = ProximityMatcher::question_to_item().match_regions(regions);
        let answer_match = ProximityMatcher::answer_to_item().match_regions(regions);
        let composer = AnswerGraphComposer::new(readings, readings);
        tokio_test::block_on(composer.compose(regions, &question_match, &answer_match))
    }

    /// 计数 OCR 调用次数
    struct CountingOcr {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ItemOcrEngine for CountingOcr {
        async fn read_item_number(&self, _region: &Region) -> Result<String, RecognitionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(" 4 ".to_string())
        }
    }

    /// 永远失败的分类器
    struct FailingClassifier;

    #[async_trait]
    impl HandwritingClassifier for FailingClassifier {
        async fn classify(&self, _region: &Region) -> Result<HandwritingPrediction, RecognitionError> {
            Err(RecognitionError::Engine("模型未载入".to_string()))
        }
    }

    #[test]
    fn test_answer_on_unlinked_item_is_ignored() {
        let item_box = BoundingBox::new(60, 12, 100, 32);
        let answer_box = BoundingBox::new(110, 14, 140, 30);
        // 没有题目区域，题号不会被标为有效
        let regions = vec![
            region(0, item_box, RegionClass::Item),
            region(1, answer_box, RegionClass::Answer),
        ];
        let readings = RecordedReadings::new(0.85)
            .with_ocr(item_box, "1")
            .with_handwriting(answer_box, "B", 0.99);

        let page = compose(&regions, &readings);
        assert!(page.final_map.is_empty());
        assert!(page.records.is_empty());
        assert_eq!(page.answer_labels[&1].letter(), Some("B"));
    }

    #[test]
    fn test_empty_ocr_drops_pair() {
        let regions = vec![
            region(0, BoundingBox::new(10, 10, 50, 30), RegionClass::Question),
            region(1, BoundingBox::new(60, 12, 100, 32), RegionClass::Item),
            region(2, BoundingBox::new(110, 14, 140, 30), RegionClass::Answer),
        ];
        let readings = RecordedReadings::new(0.85)
            .with_ocr(regions[1].bbox, "..")
            .with_handwriting(regions[2].bbox, "C", 0.95);

        let page = compose(&regions, &readings);
        assert!(page.final_map.is_empty());
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].item_label, "");
    }

    #[test]
    fn test_duplicate_item_number_later_write_wins() {
        // 两组 (题目, 题号, 作答)，题号 OCR 都读成 "3"
        let regions = vec![
            region(0, BoundingBox::new(10, 10, 50, 30), RegionClass::Question),
            region(1, BoundingBox::new(60, 12, 100, 32), RegionClass::Item),
            region(2, BoundingBox::new(110, 14, 140, 30), RegionClass::Answer),
            region(3, BoundingBox::new(10, 300, 50, 320), RegionClass::Question),
            region(4, BoundingBox::new(60, 302, 100, 322), RegionClass::Item),
            region(5, BoundingBox::new(110, 304, 140, 320), RegionClass::Answer),
        ];
        let readings = RecordedReadings::new(0.85)
            .with_ocr(regions[1].bbox, "3")
            .with_ocr(regions[4].bbox, "3")
            .with_handwriting(regions[2].bbox, "A", 0.9)
            .with_handwriting(regions[5].bbox, "D", 0.9);

        let page = compose(&regions, &readings);
        assert_eq!(page.final_map.len(), 1);
        assert_eq!(page.final_map.get("3"), Some("D"));
    }

    #[test]
    fn test_shared_item_is_read_once() {
        let regions = vec![
            region(0, BoundingBox::new(10, 10, 50, 30), RegionClass::Question),
            region(1, BoundingBox::new(12, 14, 52, 34), RegionClass::Question),
            region(2, BoundingBox::new(60, 12, 100, 32), RegionClass::Item),
        ];
        let question_match = ProximityMatcher::question_to_item().match_regions(&regions);
        let answer_match = AnchorMatch::new();
        let ocr = CountingOcr {
            calls: AtomicUsize::new(0),
        };
        let classifier = RecordedReadings::new(0.85);
        let composer = AnswerGraphComposer::new(&ocr, &classifier);

        let page = tokio_test::block_on(composer.compose(&regions, &question_match, &answer_match));
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
        assert_eq!(page.item_numbers.len(), 1);
        assert_eq!(page.item_numbers[&2], "4");
        assert_eq!(page.links.len(), 2);
    }

    #[test]
    fn test_classifier_failure_is_recoverable() {
        let regions = vec![
            region(0, BoundingBox::new(10, 10, 50, 30), RegionClass::Question),
            region(1, BoundingBox::new(60, 12, 100, 32), RegionClass::Item),
            region(2, BoundingBox::new(110, 14, 140, 30), RegionClass::Answer),
        ];
        let question_match = ProximityMatcher::question_to_item().match_regions(&regions);
        let answer_match = ProximityMatcher::answer_to_item().match_regions(&regions);
        let ocr = RecordedReadings::new(0.85).with_ocr(regions[1].bbox, "1");
        let composer = AnswerGraphComposer::new(&ocr, &FailingClassifier);

        let page = tokio_test::block_on(composer.compose(&regions, &question_match, &answer_match));
        assert!(page.final_map.is_empty());
        assert_eq!(page.answer_labels[&2].label, HandwriteLabel::Unknown);
    }
}
