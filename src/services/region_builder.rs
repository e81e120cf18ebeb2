/// 区域记录建构
///
/// 把侦测器原始输出规范化为依垂直中点排序的区域序列。
/// 排序后的位置就是区域 id，后续配对一律以此索引引用区域。
use crate::error::{PipelineError, PipelineResult};
use crate::models::region::{BoundingBox, RawDetection, Region, RegionClass};
use tracing::debug;

/// 坐标取整；非有限值或超出 i32 范围返回 None
pub fn round_box(bbox: [f32; 4]) -> Option<BoundingBox> {
    let mut coords = [0i32; 4];
    for (slot, value) in coords.iter_mut().zip(bbox) {
        let rounded = value.round();
        if !rounded.is_finite() || rounded < i32::MIN as f32 || rounded >= i32::MAX as f32 {
            return None;
        }
        *slot = rounded as i32;
    }
    Some(BoundingBox::new(coords[0], coords[1], coords[2], coords[3]))
}

/// 建构区域序列
///
/// 任何一条侦测的类别索引越界、矩形框不合法或信心值越界，整页视为失败
pub fn build_regions(detections: &[RawDetection]) -> PipelineResult<Vec<Region>> {
    let mut checked = Vec::with_capacity(detections.len());

    for (position, detection) in detections.iter().enumerate() {
        let class = RegionClass::from_index(detection.class_index).ok_or(
            PipelineError::InvalidClassIndex {
                index: detection.class_index,
                position,
            },
        )?;

        let bbox = round_box([detection.x1, detection.y1, detection.x2, detection.y2])
            .ok_or_else(|| PipelineError::malformed_box(position, "坐标不是有限数值或超出 i32 范围"))?;
        if bbox.x1 >= bbox.x2 || bbox.y1 >= bbox.y2 {
            return Err(PipelineError::malformed_box(
                position,
                format!("需满足 x1 < x2 且 y1 < y2, 实际为 {}", bbox),
            ));
        }

        if !(0.0..=1.0).contains(&detection.confidence) {
            return Err(PipelineError::InvalidConfidence {
                confidence: detection.confidence,
                position,
            });
        }

        checked.push((bbox, detection.confidence, class));
    }

    // 稳定排序：中点相同的区域保留侦测器输出顺序
    checked.sort_by_key(|(bbox, _, _)| bbox.vertical_midpoint());

    let regions: Vec<Region> = checked
        .into_iter()
        .enumerate()
        .map(|(id, (bbox, confidence, class))| Region {
            id,
            bbox,
            confidence,
            class,
        })
        .collect();

    debug!("建构 {} 个区域", regions.len());
    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(bbox: [f32; 4], class_index: i64) -> RawDetection {
        RawDetection::new(bbox, 0.9, class_index)
    }

    #[test]
    fn test_sorted_by_vertical_midpoint() {
        let detections = vec![
            det([0.0, 100.0, 10.0, 120.0], 5),
            det([0.0, 10.0, 10.0, 30.0], 0),
            det([0.0, 50.0, 10.0, 60.0], 1),
        ];
        let regions = build_regions(&detections).unwrap();

        let classes: Vec<_> = regions.iter().map(|r| r.class).collect();
        assert_eq!(
            classes,
            vec![RegionClass::Question, RegionClass::Answer, RegionClass::Item]
        );
        for (i, region) in regions.iter().enumerate() {
            assert_eq!(region.id, i);
        }
    }

    #[test]
    fn test_equal_midpoints_keep_detector_order() {
        let detections = vec![
            det([50.0, 10.0, 60.0, 30.0], 5),
            det([0.0, 0.0, 10.0, 40.0], 0),
        ];
        let regions = build_regions(&detections).unwrap();
        assert_eq!(regions[0].class, RegionClass::Item);
        assert_eq!(regions[1].class, RegionClass::Question);
    }

    #[test]
    fn test_coordinates_are_rounded() {
        let regions = build_regions(&[det([9.6, 10.4, 50.5, 29.5], 0)]).unwrap();
        assert_eq!(regions[0].bbox, BoundingBox::new(10, 10, 51, 30));
    }

    #[test]
    fn test_out_of_range_class_is_fatal() {
        let err = build_regions(&[det([0.0, 0.0, 10.0, 10.0], 6)]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvalidClassIndex { index: 6, position: 0 }
        ));

        let err = build_regions(&[det([0.0, 0.0, 10.0, 10.0], -1)]).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidClassIndex { .. }));
    }

    #[test]
    fn test_malformed_box_is_fatal() {
        let err = build_regions(&[det([10.0, 0.0, 10.0, 10.0], 0)]).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedBox { position: 0, .. }));

        let err = build_regions(&[det([0.0, f32::NAN, 10.0, 10.0], 0)]).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedBox { .. }));
    }

    #[test]
    fn test_confidence_out_of_range_is_fatal() {
        let detection = RawDetection::new([0.0, 0.0, 10.0, 10.0], 1.2, 0);
        let err = build_regions(&[detection]).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfidence { .. }));
    }

    #[test]
    fn test_huge_coordinates_sort_without_overflow() {
        let detections = vec![
            det([0.0, 1.5e9, 10.0, 1.6e9], 0),
            det([0.0, 2.0e9, 10.0, 2.1e9], 1),
            det([0.0, 0.0, 10.0, 10.0], 5),
        ];
        let regions = build_regions(&detections).unwrap();
        let classes: Vec<_> = regions.iter().map(|r| r.class).collect();
        assert_eq!(
            classes,
            vec![RegionClass::Item, RegionClass::Question, RegionClass::Answer]
        );
    }

    #[test]
    fn test_coordinates_past_i32_are_malformed() {
        let err = build_regions(&[det([0.0, 0.0, 10.0, 3.0e9], 0)]).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedBox { .. }));
    }

    #[test]
    fn test_empty_input() {
        assert!(build_regions(&[]).unwrap().is_empty());
    }
}
