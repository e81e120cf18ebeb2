use std::path::PathBuf;

use crate::infrastructure::DEFAULT_CONFIDENCE_THRESHOLD;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时批改的页面数量
    pub max_concurrent_pages: usize,
    /// 侦测记录（JSON）存放目录
    pub pages_folder: PathBuf,
    /// 标准答案（TOML）路径
    pub answer_key_path: PathBuf,
    /// 报告输出目录
    pub output_dir: PathBuf,
    /// 最大配对距离（像素），None 表示不限制
    pub max_match_distance: Option<f64>,
    /// 手写识别信心值门槛
    pub handwrite_confidence_threshold: f32,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_pages: 8,
            pages_folder: PathBuf::from("pages"),
            answer_key_path: PathBuf::from("answer_key.toml"),
            output_dir: PathBuf::from("data/results"),
            max_match_distance: None,
            handwrite_confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            verbose_logging: false,
            output_log_file: PathBuf::from("grading_log.txt"),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_pages: std::env::var("MAX_CONCURRENT_PAGES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(default.max_concurrent_pages),
            pages_folder: std::env::var("PAGES_FOLDER").map(PathBuf::from).unwrap_or(default.pages_folder),
            answer_key_path: std::env::var("ANSWER_KEY_PATH").map(PathBuf::from).unwrap_or(default.answer_key_path),
            output_dir: std::env::var("OUTPUT_DIR").map(PathBuf::from).unwrap_or(default.output_dir),
            max_match_distance: std::env::var("MAX_MATCH_DISTANCE")
                .ok()
                .and_then(|v| parse_non_negative(&v))
                .or(default.max_match_distance),
            handwrite_confidence_threshold: std::env::var("HANDWRITE_CONFIDENCE_THRESHOLD")
                .ok()
                .and_then(|v| parse_non_negative(&v))
                .map(|v| v as f32)
                .unwrap_or(default.handwrite_confidence_threshold),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").map(PathBuf::from).unwrap_or(default.output_log_file),
        }
    }
}

/// 解析有限且非负的数值；NaN、无穷大与负数视为无效
fn parse_non_negative(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_non_negative() {
        assert_eq!(parse_non_negative("0.9"), Some(0.9));
        assert_eq!(parse_non_negative(" 120 "), Some(120.0));
        assert_eq!(parse_non_negative("0"), Some(0.0));
        assert_eq!(parse_non_negative("NaN"), None);
        assert_eq!(parse_non_negative("inf"), None);
        assert_eq!(parse_non_negative("-1"), None);
        assert_eq!(parse_non_negative("abc"), None);
    }
}
