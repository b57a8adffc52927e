//! 插件配置：导出目录与文件名规则

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use directories::UserDirs;

/// 导出文件名前缀
pub const DEFAULT_FILE_PREFIX: &str = "模型结构树导出";
/// 文件名中的时间戳格式（yyyyMMdd_HHmmss）
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    /// 未指定时导出到用户桌面
    pub output_dir: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

impl PluginConfig {
    /// 显式目录 → 用户桌面 → 当前目录
    pub fn resolve_output_dir(&self) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }
        UserDirs::new()
            .and_then(|dirs| dirs.desktop_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| {
                tracing::warn!("未找到桌面目录，导出到当前目录");
                PathBuf::from(".")
            })
    }

    pub fn export_file_name(&self, now: NaiveDateTime) -> String {
        format!("{}_{}.csv", self.file_prefix, now.format(TIMESTAMP_FORMAT))
    }

    pub fn export_path(&self, now: NaiveDateTime) -> PathBuf {
        self.resolve_output_dir().join(self.export_file_name(now))
    }
}
