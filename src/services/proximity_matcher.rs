/// 就近配对服务
///
/// 为每个锚点区域（题目或作答区）找出最近的目标区域（题号）。
/// 距离取锚点左上角到目标中心点的欧氏距离。
use crate::models::region::{Region, RegionClass};
use std::collections::BTreeMap;
use tracing::debug;

/// 锚点索引 → 配对到的目标索引（至多一个）
pub type AnchorMatch = BTreeMap<usize, Vec<usize>>;

/// 就近配对器
///
/// 目标被认领后仍留在候选池中，多个锚点可以配对到同一个目标
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityMatcher {
    anchor_class: RegionClass,
    target_class: RegionClass,
    max_distance: Option<f64>,
}

impl ProximityMatcher {
    /// 创建新的配对器，不限制距离
    pub fn new(anchor_class: RegionClass, target_class: RegionClass) -> Self {
        Self {
            anchor_class,
            target_class,
            max_distance: None,
        }
    }

    /// 题目 → 题号
    pub fn question_to_item() -> Self {
        Self::new(RegionClass::Question, RegionClass::Item)
    }

    /// 作答区 → 题号
    pub fn answer_to_item() -> Self {
        Self::new(RegionClass::Answer, RegionClass::Item)
    }

    /// 设定最大配对距离
    pub fn with_max_distance(mut self, max_distance: Option<f64>) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// 执行配对
    ///
    /// # 参数
    /// - `regions`: 已排序的区域序列
    ///
    /// # 返回
    /// 锚点索引 → 最近目标索引；超出最大距离或没有目标的锚点不出现在结果中
    pub fn match_regions(&self, regions: &[Region]) -> AnchorMatch {
        let targets: Vec<(usize, (f64, f64))> = regions
            .iter()
            .filter(|r| r.is(self.target_class))
            .map(|r| (r.id, r.bbox.center()))
            .collect();

        let mut matched = AnchorMatch::new();

        for anchor in regions.iter().filter(|r| r.is(self.anchor_class)) {
            let (ax, ay) = anchor.bbox.top_left();
            let mut min_dist = f64::INFINITY;
            let mut best_match = None;

            for &(target_id, (cx, cy)) in &targets {
                let dist = ((ax - cx).powi(2) + (ay - cy).powi(2)).sqrt();

                if self.max_distance.map_or(true, |max| dist <= max) && dist < min_dist {
                    min_dist = dist;
                    best_match = Some(target_id);
                }
            }

            if let Some(target_id) = best_match {
                debug!(
                    "{} #{} → {} #{} (距离 {:.1})",
                    self.anchor_class, anchor.id, self.target_class, target_id, min_dist
                );
                matched.insert(anchor.id, vec![target_id]);
            }
        }

        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::region::BoundingBox;

    fn region(id: usize, bbox: (i32, i32, i32, i32), class: RegionClass) -> Region {
        Region {
            id,
            bbox: BoundingBox::new(bbox.0, bbox.1, bbox.2, bbox.3),
            confidence: 0.9,
            class,
        }
    }

    #[test]
    fn test_picks_nearest_item() {
        let regions = vec![
            region(0, (10, 10, 50, 30), RegionClass::Question),
            region(1, (60, 12, 100, 32), RegionClass::Item),
            region(2, (60, 200, 100, 220), RegionClass::Item),
        ];
        let matched = ProximityMatcher::question_to_item().match_regions(&regions);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[&0], vec![1]);
    }

    #[test]
    fn test_at_most_one_target_per_anchor() {
        let regions = vec![
            region(0, (0, 0, 10, 10), RegionClass::Answer),
            region(1, (20, 0, 30, 10), RegionClass::Item),
            region(2, (0, 20, 10, 30), RegionClass::Item),
            region(3, (0, 40, 10, 50), RegionClass::Answer),
        ];
        let matched = ProximityMatcher::answer_to_item().match_regions(&regions);
        assert_eq!(matched.len(), 2);
        assert!(matched.values().all(|targets| targets.len() == 1));
    }

    #[test]
    fn test_tie_resolves_to_first_target() {
        // 两个题号中心 (20, 5) 与 (5, 20) 到 (5, 5) 距离相同
        let regions = vec![
            region(0, (5, 5, 6, 6), RegionClass::Question),
            region(1, (15, 0, 25, 10), RegionClass::Item),
            region(2, (0, 15, 10, 25), RegionClass::Item),
        ];
        let matched = ProximityMatcher::question_to_item().match_regions(&regions);
        assert_eq!(matched[&0], vec![1]);
    }

    #[test]
    fn test_max_distance_excludes_far_targets() {
        let regions = vec![
            region(0, (0, 0, 10, 10), RegionClass::Question),
            region(1, (100, 0, 120, 10), RegionClass::Item),
        ];
        // 距离 ≈ 110.1
        let matcher = ProximityMatcher::question_to_item().with_max_distance(Some(100.0));
        assert!(matcher.match_regions(&regions).is_empty());

        let matcher = ProximityMatcher::question_to_item().with_max_distance(Some(200.0));
        assert_eq!(matcher.match_regions(&regions)[&0], vec![1]);
    }

    #[test]
    fn test_max_distance_is_inclusive() {
        // 左上角 (0, 0)，中心 (3, 4)，距离恰为 5
        let regions = vec![
            region(0, (0, 0, 1, 1), RegionClass::Question),
            region(1, (2, 3, 4, 5), RegionClass::Item),
        ];
        let matcher = ProximityMatcher::question_to_item().with_max_distance(Some(5.0));
        assert_eq!(matcher.match_regions(&regions)[&0], vec![1]);
    }

    #[test]
    fn test_shared_target_is_not_deduplicated() {
        let regions = vec![
            region(0, (10, 10, 50, 30), RegionClass::Question),
            region(1, (12, 14, 52, 34), RegionClass::Question),
            region(2, (60, 12, 100, 32), RegionClass::Item),
            region(3, (60, 500, 100, 520), RegionClass::Item),
        ];
        let matched = ProximityMatcher::question_to_item().match_regions(&regions);
        assert_eq!(matched[&0], vec![2]);
        assert_eq!(matched[&1], vec![2]);
    }

    #[test]
    fn test_no_targets_yields_no_match() {
        let regions = vec![
            region(0, (0, 0, 10, 10), RegionClass::Question),
            region(1, (0, 20, 10, 30), RegionClass::Article),
        ];
        assert!(ProximityMatcher::question_to_item()
            .match_regions(&regions)
            .is_empty());
    }

    #[test]
    fn test_matching_is_deterministic() {
        let regions = vec![
            region(0, (10, 10, 50, 30), RegionClass::Question),
            region(1, (60, 12, 100, 32), RegionClass::Item),
            region(2, (110, 14, 140, 30), RegionClass::Answer),
            region(3, (60, 60, 100, 80), RegionClass::Item),
        ];
        let matcher = ProximityMatcher::answer_to_item();
        assert_eq!(matcher.match_regions(&regions), matcher.match_regions(&regions));
    }
}
