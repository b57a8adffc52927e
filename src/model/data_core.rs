//! 插件核心：错误类型与导出/导入两条操作流水线

use std::ops::Deref;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::model::import_table::ImportRow;
use crate::model::modifier::{apply_overrides, ModifyReport};
use crate::model::resolver::NameIndex;
use crate::model::scene::{HostError, SceneGraph, SceneHost};
use crate::model::selection_sets::{create_selection_sets, SelectionReport};
use crate::model::structure_tree::flatten;
use crate::utils::config::PluginConfig;
use crate::utils::fs::{read_csv_file, write_csv_file};

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("没有打开任何模型")]
    NoModel,
    #[error("CSV文件为空或无效")]
    EmptyCsv,
    #[error("CSV文件中没有找到'{0}'列")]
    MissingColumn(String),
    #[error("CSV文件中没有找到有效的集合数据")]
    NoGroups,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// 没有可导出的节点
    Nothing,
    Written { path: PathBuf, rows: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub modify: ModifyReport,
    /// CSV 中没有任何集合值时为 `None`
    pub selection: Option<SelectionReport>,
}

/// 导入期间持有的索引，离开作用域（包括出错返回）时清空
struct ScopedIndex(NameIndex);

impl Deref for ScopedIndex {
    type Target = NameIndex;

    fn deref(&self) -> &NameIndex {
        &self.0
    }
}

impl Drop for ScopedIndex {
    fn drop(&mut self) {
        tracing::debug!("释放名称索引: {} 个节点", self.0.len());
        self.0.clear();
    }
}

/// 展平全部模型并写出到配置的导出目录
pub fn export_structure_tree<G: SceneGraph + ?Sized>(
    graph: &G,
    config: &PluginConfig,
    now: NaiveDateTime,
) -> Result<ExportOutcome, PluginError> {
    if graph.models().is_empty() {
        return Err(PluginError::NoModel);
    }
    let table = flatten(graph);
    if table.is_empty() {
        tracing::info!("没有可导出的节点");
        return Ok(ExportOutcome::Nothing);
    }

    let path = config.export_path(now);
    write_csv_file(&path, &table.to_csv_table())?;
    tracing::info!("结构树已导出: {} 行 -> {}", table.len(), path.display());
    Ok(ExportOutcome::Written {
        path,
        rows: table.len(),
    })
}

/// 读取 CSV，先施加覆盖再创建选择集；两步共用一次新建的名称索引
pub fn modify_model_from_csv<H: SceneHost + ?Sized>(
    host: &mut H,
    csv_path: &Path,
) -> Result<ImportOutcome, PluginError> {
    if host.models().is_empty() {
        return Err(PluginError::NoModel);
    }
    let table = read_csv_file(csv_path)?;
    let rows = ImportRow::parse_all(&table)?;
    tracing::info!("读取CSV: {} 行 <- {}", rows.len(), csv_path.display());

    let index = ScopedIndex(NameIndex::build(&*host));
    let modify = apply_overrides(host, &index, &rows)?;
    let selection = match create_selection_sets(host, &index, &rows) {
        Ok(report) => Some(report),
        Err(PluginError::NoGroups) => {
            tracing::info!("CSV中没有集合数据，跳过选择集创建");
            None
        }
        Err(e) => return Err(e),
    };
    Ok(ImportOutcome { modify, selection })
}
