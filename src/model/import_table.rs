//! 导入行：从解码后的 CSV 表中取出定位与修改所需的字段

use crate::model::csv_codec::CsvTable;
use crate::model::data_core::PluginError;
use crate::model::structure_tree::{
    level_column_name, COL_COLOR, COL_GROUP, COL_HIDE, COL_NODE_LEVEL, COL_NODE_NAME,
    COL_TRANSPARENCY,
};

/// 导入必须存在的列（层级列数量可变，不在此列出）
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_NODE_NAME,
    COL_NODE_LEVEL,
    COL_HIDE,
    COL_COLOR,
    COL_TRANSPARENCY,
    COL_GROUP,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    /// 数据行序号（从 1 开始，不计空行）
    pub row: usize,
    pub node_name: String,
    pub node_level: usize,
    /// 非空的 Level1..LevelN 值
    pub hierarchy: Vec<String>,
    pub hide: String,
    pub color: String,
    pub transparency: String,
    pub group: String,
}

struct Columns {
    name: usize,
    level: usize,
    hide: usize,
    color: usize,
    transparency: usize,
    group: usize,
    levels: Vec<usize>,
}

impl Columns {
    fn locate(table: &CsvTable) -> Result<Self, PluginError> {
        let find = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| PluginError::MissingColumn(name.to_string()))
        };
        // 依次检查，报告第一个缺失的列
        for name in REQUIRED_COLUMNS {
            find(name)?;
        }
        // 层级列必须连续，遇到第一个缺失的编号即停止
        let levels = (1..)
            .map_while(|i| table.column_index(&level_column_name(i)))
            .collect();
        Ok(Self {
            name: find(COL_NODE_NAME)?,
            level: find(COL_NODE_LEVEL)?,
            hide: find(COL_HIDE)?,
            color: find(COL_COLOR)?,
            transparency: find(COL_TRANSPARENCY)?,
            group: find(COL_GROUP)?,
            levels,
        })
    }
}

impl ImportRow {
    /// 校验表结构并转换全部数据行
    pub fn parse_all(table: &CsvTable) -> Result<Vec<ImportRow>, PluginError> {
        if table.is_empty() {
            return Err(PluginError::EmptyCsv);
        }
        let cols = Columns::locate(table)?;

        let rows = (0..table.len())
            .map(|i| {
                let level_text = table.field(i, cols.level).trim();
                let node_level = level_text.parse::<usize>().unwrap_or_else(|_| {
                    tracing::warn!(
                        "第 {} 行 NodeLevel 无法解析: {:?}，按 0 处理",
                        i + 1,
                        level_text
                    );
                    0
                });
                let hierarchy = cols
                    .levels
                    .iter()
                    .map(|&c| table.field(i, c))
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect();
                ImportRow {
                    row: i + 1,
                    node_name: table.field(i, cols.name).to_string(),
                    node_level,
                    hierarchy,
                    hide: table.field(i, cols.hide).to_string(),
                    color: table.field(i, cols.color).to_string(),
                    transparency: table.field(i, cols.transparency).to_string(),
                    group: table.field(i, cols.group).to_string(),
                }
            })
            .collect();
        Ok(rows)
    }
}
