use crate::models::page::PageDump;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 JSON 文件加载一页的侦测记录
pub async fn load_page_dump(json_file_path: &Path) -> Result<PageDump> {
    let content = fs::read_to_string(json_file_path)
        .await
        .with_context(|| format!("无法读取侦测记录: {}", json_file_path.display()))?;

    let mut page: PageDump = serde_json::from_str(&content)
        .with_context(|| format!("无法解析侦测记录: {}", json_file_path.display()))?;

    page.file_path = Some(json_file_path.to_string_lossy().to_string());

    Ok(page)
}

/// 无法解析的侦测记录文件
#[derive(Debug, Clone)]
pub struct PageLoadFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl PageLoadFailure {
    /// 以文件名（不含扩展名）充当页面ID
    pub fn page_id(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// 文件夹的加载结果
#[derive(Debug, Default)]
pub struct LoadedPages {
    pub pages: Vec<PageDump>,
    /// 解析失败的文件，按文件名排序
    pub failures: Vec<PageLoadFailure>,
}

impl LoadedPages {
    /// 找到的 JSON 文件总数
    pub fn total(&self) -> usize {
        self.pages.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// 加载文件夹中所有 JSON 侦测记录，按文件名排序
///
/// 单个文件解析失败不影响其它页面，失败的文件连同原因一并返回
pub async fn load_all_page_dumps(folder_path: &Path) -> Result<LoadedPages> {
    if !folder_path.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path.display());
    }

    let mut json_files: Vec<PathBuf> = Vec::new();
    let mut entries = fs::read_dir(folder_path)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            json_files.push(path);
        }
    }
    json_files.sort();

    let mut loaded = LoadedPages::default();
    for path in json_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_page_dump(&path).await {
            Ok(page) => {
                tracing::info!("成功加载 {} 个侦测区域", page.detections.len());
                loaded.pages.push(page);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
                loaded.failures.push(PageLoadFailure {
                    path,
                    reason: format!("{:#}", e),
                });
            }
        }
    }

    Ok(loaded)
}
