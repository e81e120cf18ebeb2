//! 页面处理上下文
//!
//! 封装"我正在批改哪一页"这一信息

use std::fmt::Display;

/// 页面处理上下文
#[derive(Debug, Clone)]
pub struct PageCtx {
    /// 页面ID
    pub page_id: String,

    /// 页面索引（仅用于日志显示）
    pub page_index: usize,

    /// 原始扫描图路径
    pub image_path: Option<String>,
}

impl PageCtx {
    /// 创建新的页面上下文
    pub fn new(page_id: String, page_index: usize, image_path: Option<String>) -> Self {
        Self {
            page_id,
            page_index,
            image_path,
        }
    }
}

impl Display for PageCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[页面 ID#{} 序号#{}]", self.page_id, self.page_index)
    }
}
