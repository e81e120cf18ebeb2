//! 手写字母识别的结果与信心值门槛策略

use phf::phf_map;
use serde::Serialize;
use std::fmt;

/// 默认信心值门槛，低于此值一律视为 UNKNOWN
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.85;

/// 手写标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HandwriteLabel {
    A,
    B,
    C,
    D,
    E,
    F,
    O,
    X,
    /// 无法判断（信心值不足或类别越界）
    #[serde(rename = "UNKNOWN")]
    Unknown,
    /// 裁切区域为空
    #[serde(rename = "EMPTY")]
    Empty,
}

/// 分类器输出索引对应的标签
pub const HANDWRITE_MAP: [HandwriteLabel; 8] = [
    HandwriteLabel::A,
    HandwriteLabel::B,
    HandwriteLabel::C,
    HandwriteLabel::D,
    HandwriteLabel::E,
    HandwriteLabel::F,
    HandwriteLabel::O,
    HandwriteLabel::X,
];

static LABELS_BY_NAME: phf::Map<&'static str, HandwriteLabel> = phf_map! {
    "A" => HandwriteLabel::A,
    "B" => HandwriteLabel::B,
    "C" => HandwriteLabel::C,
    "D" => HandwriteLabel::D,
    "E" => HandwriteLabel::E,
    "F" => HandwriteLabel::F,
    "O" => HandwriteLabel::O,
    "X" => HandwriteLabel::X,
    "UNKNOWN" => HandwriteLabel::Unknown,
    "EMPTY" => HandwriteLabel::Empty,
};

impl HandwriteLabel {
    /// 从名称解析（不分大小写），无法识别的名称视为 UNKNOWN
    pub fn parse(name: &str) -> Self {
        LABELS_BY_NAME
            .get(name.trim().to_uppercase().as_str())
            .copied()
            .unwrap_or(HandwriteLabel::Unknown)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HandwriteLabel::A => "A",
            HandwriteLabel::B => "B",
            HandwriteLabel::C => "C",
            HandwriteLabel::D => "D",
            HandwriteLabel::E => "E",
            HandwriteLabel::F => "F",
            HandwriteLabel::O => "O",
            HandwriteLabel::X => "X",
            HandwriteLabel::Unknown => "UNKNOWN",
            HandwriteLabel::Empty => "EMPTY",
        }
    }

    /// 可用于批改的字母；UNKNOWN 与 EMPTY 返回 None
    pub fn letter(self) -> Option<&'static str> {
        match self {
            HandwriteLabel::Unknown | HandwriteLabel::Empty => None,
            other => Some(other.as_str()),
        }
    }
}

impl fmt::Display for HandwriteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 手写识别结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandwritingPrediction {
    pub label: HandwriteLabel,
    pub confidence: f32,
}

impl HandwritingPrediction {
    pub fn empty() -> Self {
        Self {
            label: HandwriteLabel::Empty,
            confidence: 0.0,
        }
    }

    /// 套用门槛：信心值低于门槛时强制为 UNKNOWN
    pub fn with_threshold(label: HandwriteLabel, confidence: f32, threshold: f32) -> Self {
        let label = if label == HandwriteLabel::Empty {
            label
        } else if confidence.is_nan() || confidence < threshold {
            HandwriteLabel::Unknown
        } else {
            label
        };
        Self { label, confidence }
    }

    /// 从分类器原始分数解码
    ///
    /// 取最大分数的类别；分数为空返回 EMPTY，
    /// 类别越界或低于门槛返回 UNKNOWN
    pub fn from_scores(scores: &[f32], threshold: f32) -> Self {
        let best = scores
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best: Option<(usize, f32)>, (i, score)| match best {
                Some((_, top)) if score <= top => best,
                _ => Some((i, score)),
            });

        let Some((index, confidence)) = best else {
            return Self::empty();
        };

        match HANDWRITE_MAP.get(index) {
            Some(label) => Self::with_threshold(*label, confidence, threshold),
            None => Self {
                label: HandwriteLabel::Unknown,
                confidence,
            },
        }
    }

    pub fn letter(&self) -> Option<&'static str> {
        self.label.letter()
    }
}
