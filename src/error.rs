use thiserror::Error;

/// 流水线错误类型
///
/// 只有结构性输入错误会以此类型传给调用方；
/// 识别缺失、低信心值、题号不在标准答案中都属于可恢复的资料问题，不会产生错误
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 类别索引超出 6 类类别表
    #[error("类别索引 {index} 超出范围 [0, 5] (第 {position} 条侦测)")]
    InvalidClassIndex { index: i64, position: usize },

    /// 矩形框坐标不合法
    #[error("矩形框不合法 (第 {position} 条侦测): {reason}")]
    MalformedBox { position: usize, reason: String },

    /// 信心值不在 [0, 1]
    #[error("信心值 {confidence} 不在 [0, 1] (第 {position} 条侦测)")]
    InvalidConfidence { confidence: f32, position: usize },

    /// 结果写入失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 序列化失败
    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),
}

/// 识别器错误
///
/// 由 OCR / 手写识别器回报，流水线会记录警告并当作空读数处理
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// 识别引擎内部错误
    #[error("识别引擎错误: {0}")]
    Engine(String),
}

// ========== 便捷构造函数 ==========

impl PipelineError {
    /// 创建矩形框错误
    pub fn malformed_box(position: usize, reason: impl Into<String>) -> Self {
        PipelineError::MalformedBox {
            position,
            reason: reason.into(),
        }
    }

    /// 创建写入失败错误
    pub fn write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        PipelineError::WriteFailed {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 流水线结果类型
pub type PipelineResult<T> = Result<T, PipelineError>;
