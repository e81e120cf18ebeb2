//! 作答记录与最终对应表

use serde::ser::{Serialize, SerializeMap, Serializer};

/// 一个 (作答区, 题号) 配对的识别结果
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AnswerRecord {
    /// 题号 OCR 结果，可能为空
    pub item_label: String,
    /// 手写字母，UNKNOWN / EMPTY 时为 None
    pub answer_letter: Option<String>,
}

impl AnswerRecord {
    /// 题号与字母都不为空时才可用于批改
    pub fn usable(&self) -> Option<(&str, &str)> {
        match self.answer_letter.as_deref() {
            Some(letter) if !self.item_label.is_empty() && !letter.is_empty() => {
                Some((self.item_label.as_str(), letter))
            }
            _ => None,
        }
    }
}

/// 题号文字 → 作答字母
///
/// 保留首次插入的顺序；同一题号再次写入时覆盖旧值但位置不变
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalMap {
    entries: Vec<(String, String)>,
}

impl FinalMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入一条对应，返回被覆盖的旧值
    pub fn insert(&mut self, item_label: impl Into<String>, letter: impl Into<String>) -> Option<String> {
        let item_label = item_label.into();
        let letter = letter.into();
        match self.entries.iter_mut().find(|(label, _)| *label == item_label) {
            Some((_, existing)) => Some(std::mem::replace(existing, letter)),
            None => {
                self.entries.push((item_label, letter));
                None
            }
        }
    }

    pub fn get(&self, item_label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(label, _)| label == item_label)
            .map(|(_, letter)| letter.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(label, letter)| (label.as_str(), letter.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FinalMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FinalMap::new();
        for (label, letter) in iter {
            map.insert(label, letter);
        }
        map
    }
}

impl Serialize for FinalMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, letter) in &self.entries {
            map.serialize_entry(label, letter)?;
        }
        map.end()
    }
}
