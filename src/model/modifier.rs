//! 按 CSV 修改意图列对节点施加隐藏/颜色/透明覆盖

use crate::model::data_core::PluginError;
use crate::model::import_table::ImportRow;
use crate::model::resolver::NameIndex;
use crate::model::scene::{NodeId, Rgb, SceneHost};

pub const MODIFY_TRANSACTION: &str = "ModifyModelFromCSV";

/// 修改统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifyReport {
    /// 定位成功的行
    pub processed: usize,
    pub not_found: usize,
    pub hidden: usize,
    pub colored: usize,
    pub transparent: usize,
    /// 填写了但无法解析的颜色/透明字段
    pub skipped_fields: usize,
}

/// `TRUE` 或 `Y`（不区分大小写）
pub fn is_hide_intent(value: &str) -> bool {
    value.eq_ignore_ascii_case("TRUE") || value.eq_ignore_ascii_case("Y")
}

/// 解析 `R,G,B`，三段都必须是 0-255 的整数
pub fn parse_color(value: &str) -> Option<Rgb> {
    let parts: Vec<&str> = value.split(',').collect();
    let [r, g, b] = parts.as_slice() else {
        return None;
    };
    Some(Rgb::new(
        r.trim().parse().ok()?,
        g.trim().parse().ok()?,
        b.trim().parse().ok()?,
    ))
}

/// 解析透明度，超出 0.0..=1.0 时截断到边界
pub fn parse_transparency(value: &str) -> Option<f64> {
    let t: f64 = value.trim().parse().ok()?;
    if !t.is_finite() {
        return None;
    }
    let clamped = t.clamp(0.0, 1.0);
    if clamped != t {
        tracing::warn!("透明度 {} 超出范围，按 {} 处理", t, clamped);
    }
    Some(clamped)
}

/// 在一个事务内处理全部行；未定位到的行只计数
pub fn apply_overrides<H: SceneHost + ?Sized>(
    host: &mut H,
    index: &NameIndex,
    rows: &[ImportRow],
) -> Result<ModifyReport, PluginError> {
    let mut report = ModifyReport::default();
    host.begin_transaction(MODIFY_TRANSACTION)?;

    for row in rows {
        let resolved = index.resolve(&*host, &row.node_name, &row.hierarchy, row.node_level);
        let Some(node) = resolved else {
            tracing::warn!("第 {} 行未找到节点: {}", row.row, row.node_name);
            report.not_found += 1;
            continue;
        };
        apply_row(host, node, row, &mut report)?;
        report.processed += 1;
    }

    host.commit_transaction()?;
    tracing::info!(
        "修改完成: 找到 {}，未找到 {}，隐藏 {}，着色 {}，透明 {}",
        report.processed,
        report.not_found,
        report.hidden,
        report.colored,
        report.transparent
    );
    Ok(report)
}

/// 三项覆盖互相独立，某一项解析失败不影响其余两项
fn apply_row<H: SceneHost + ?Sized>(
    host: &mut H,
    node: NodeId,
    row: &ImportRow,
    report: &mut ModifyReport,
) -> Result<(), PluginError> {
    let target = [node];

    if is_hide_intent(&row.hide) {
        host.override_hidden(&target, true)?;
        report.hidden += 1;
    }

    if !row.color.is_empty() {
        match parse_color(&row.color) {
            Some(color) => {
                host.override_color(&target, color)?;
                report.colored += 1;
            }
            None => {
                tracing::warn!("第 {} 行颜色无法解析，已跳过: {:?}", row.row, row.color);
                report.skipped_fields += 1;
            }
        }
    }

    if !row.transparency.is_empty() {
        match parse_transparency(&row.transparency) {
            Some(t) => {
                host.override_transparency(&target, t)?;
                report.transparent += 1;
            }
            None => {
                tracing::warn!("第 {} 行透明度无法解析，已跳过: {:?}", row.row, row.transparency);
                report.skipped_fields += 1;
            }
        }
    }
    Ok(())
}
