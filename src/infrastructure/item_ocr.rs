//! 题号 OCR 的文字清理

/// 清理题号 OCR 文字
///
/// `%` 常被误认，换成 `8`；去掉小数点与英文字母，再去掉首尾空白
pub fn clean_ocr_text(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '%' => Some('8'),
            '.' => None,
            c if c.is_ascii_alphabetic() => None,
            c => Some(c),
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_ocr_text() {
        assert_eq!(clean_ocr_text(" 12. "), "12");
        assert_eq!(clean_ocr_text("1%"), "18");
        assert_eq!(clean_ocr_text("h3a"), "3");
        assert_eq!(clean_ocr_text("abc"), "");
    }
}
