//! 区域模型
//!
//! 物件侦测输出经过规范化后的区域记录

use serde::{Deserialize, Serialize};
use std::fmt;

/// 区域类别（侦测器固定的 6 类）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionClass {
    /// 题目
    Question = 0,
    /// 手写作答区
    Answer = 1,
    /// 文章
    Article = 2,
    /// 作答范围
    Area = 3,
    /// 图表
    Diagram = 4,
    /// 题号（选项列表项）
    Item = 5,
}

impl RegionClass {
    /// 类别表，顺序与侦测器输出的类别索引一致
    pub const TABLE: [RegionClass; 6] = [
        RegionClass::Question,
        RegionClass::Answer,
        RegionClass::Article,
        RegionClass::Area,
        RegionClass::Diagram,
        RegionClass::Item,
    ];

    /// 从类别索引解析，超出范围返回 None
    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::TABLE.get(i).copied())
    }

    /// 类别索引
    pub fn index(self) -> usize {
        self as usize
    }

    /// 标准名称
    pub fn name(self) -> &'static str {
        match self {
            RegionClass::Question => "question",
            RegionClass::Answer => "answer",
            RegionClass::Article => "article",
            RegionClass::Area => "area",
            RegionClass::Diagram => "diagram",
            RegionClass::Item => "item",
        }
    }
}

impl fmt::Display for RegionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 像素坐标的矩形框，满足 x1 < x2 且 y1 < y2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// 左上角
    pub fn top_left(&self) -> (f64, f64) {
        (f64::from(self.x1), f64::from(self.y1))
    }

    /// 中心点（浮点，用于距离计算）
    pub fn center(&self) -> (f64, f64) {
        (
            (f64::from(self.x1) + f64::from(self.x2)) / 2.0,
            (f64::from(self.y1) + f64::from(self.y2)) / 2.0,
        )
    }

    /// 中心点（整数像素，用于标注连线）
    pub fn center_px(&self) -> (i32, i32) {
        // 两个 i32 的下取整平均值仍落在 i32 范围内
        (
            midpoint(self.x1, self.x2) as i32,
            midpoint(self.y1, self.y2) as i32,
        )
    }

    /// 垂直中点，排序依据
    pub fn vertical_midpoint(&self) -> i64 {
        midpoint(self.y1, self.y2)
    }

    pub fn width(&self) -> i64 {
        i64::from(self.x2) - i64::from(self.x1)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.y2) - i64::from(self.y1)
    }
}

fn midpoint(a: i32, b: i32) -> i64 {
    (i64::from(a) + i64::from(b)).div_euclid(2)
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})-({}, {})", self.x1, self.y1, self.x2, self.y2)
    }
}

/// 侦测器原始输出的一条记录
///
/// 坐标已缩放回原图尺寸，但尚未取整
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawDetection {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub confidence: f32,
    pub class_index: i64,
}

impl RawDetection {
    pub fn new(bbox: [f32; 4], confidence: f32, class_index: i64) -> Self {
        Self {
            x1: bbox[0],
            y1: bbox[1],
            x2: bbox[2],
            y2: bbox[3],
            confidence,
            class_index,
        }
    }
}

/// 排序后的区域记录，建立后不可变
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    /// 在排序结果中的位置
    pub id: usize,
    pub bbox: BoundingBox,
    pub confidence: f32,
    pub class: RegionClass,
}

impl Region {
    pub fn is(&self, class: RegionClass) -> bool {
        self.class == class
    }
}
