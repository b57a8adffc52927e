//! 按“集合”列分组创建选择集

use std::collections::HashMap;

use crate::model::data_core::PluginError;
use crate::model::import_table::ImportRow;
use crate::model::resolver::NameIndex;
use crate::model::scene::{NodeId, SceneHost};

pub const SELECTION_TRANSACTION: &str = "CreateSelectionSets";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionReport {
    pub sets_created: usize,
    /// 已创建选择集的成员总数
    pub total_items: usize,
    /// 一个节点都没定位到的分组
    pub empty_groups: usize,
    /// 宿主拒绝创建的选择集名称
    pub failed_sets: Vec<String>,
}

/// 集合名称（去除首尾空白）→ 行；分组顺序为首次出现的顺序，空名称的行不参与
pub fn group_rows(rows: &[ImportRow]) -> Vec<(String, Vec<&ImportRow>)> {
    let mut groups: Vec<(String, Vec<&ImportRow>)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        let key = row.group.trim();
        if key.is_empty() {
            continue;
        }
        let slot = *slots.entry(key).or_insert_with(|| {
            groups.push((key.to_string(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(row);
    }
    groups
}

/// 在一个事务内为每个非空分组创建一个选择集
///
/// 没有任何分组时返回 `PluginError::NoGroups`，且不会打开事务。
pub fn create_selection_sets<H: SceneHost + ?Sized>(
    host: &mut H,
    index: &NameIndex,
    rows: &[ImportRow],
) -> Result<SelectionReport, PluginError> {
    let groups = group_rows(rows);
    if groups.is_empty() {
        return Err(PluginError::NoGroups);
    }

    let mut report = SelectionReport::default();
    host.begin_transaction(SELECTION_TRANSACTION)?;

    for (name, members) in &groups {
        let nodes: Vec<NodeId> = members
            .iter()
            .filter_map(|row| index.resolve(&*host, &row.node_name, &row.hierarchy, row.node_level))
            .collect();

        if nodes.is_empty() {
            tracing::warn!("集合 {} 没有定位到任何节点，跳过", name);
            report.empty_groups += 1;
            continue;
        }

        match host.add_selection_set(name, &nodes) {
            Ok(()) => {
                tracing::info!("已创建选择集 {}: {} 项", name, nodes.len());
                report.sets_created += 1;
                report.total_items += nodes.len();
            }
            Err(e) => {
                tracing::error!("创建选择集 {} 失败: {}", name, e);
                report.failed_sets.push(name.clone());
            }
        }
    }

    host.commit_transaction()?;
    Ok(report)
}
