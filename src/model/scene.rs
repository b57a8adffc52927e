//! 宿主场景图能力接口：结构树只读访问 + 覆盖/选择集写入
//!
//! 插件逻辑只通过这里的 trait 接触宿主对象，节点以 `NodeId` 引用，
//! 便于在内存场景上独立测试。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 宿主节点句柄（由宿主分配，仅在同一个场景图内有效）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// 已加载模型：根节点 + 来源文件标识
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    pub root: NodeId,
    pub source: String,
}

/// 覆盖颜色（字节三元组）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("宿主操作失败: {0}")]
pub struct HostError(pub String);

/// 结构树只读访问
pub trait SceneGraph {
    /// 当前文档中已加载的模型（按加载顺序）
    fn models(&self) -> Vec<ModelRef>;

    fn display_name(&self, node: NodeId) -> &str;

    fn class_name(&self, node: NodeId) -> &str;

    fn is_hidden(&self, node: NodeId) -> bool;

    /// 模型根节点返回 `None`
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// 直接子节点（文档顺序）
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn has_children(&self, node: NodeId) -> bool {
        !self.children(node).is_empty()
    }
}

/// 对宿主场景的修改：所有调用都应位于一个已打开的事务内
pub trait SceneEditor {
    fn begin_transaction(&mut self, name: &str) -> Result<(), HostError>;

    fn commit_transaction(&mut self) -> Result<(), HostError>;

    fn override_hidden(&mut self, nodes: &[NodeId], hidden: bool) -> Result<(), HostError>;

    fn override_color(&mut self, nodes: &[NodeId], color: Rgb) -> Result<(), HostError>;

    /// 透明度取值 0.0（不透明）..=1.0（全透明）
    fn override_transparency(
        &mut self,
        nodes: &[NodeId],
        transparency: f64,
    ) -> Result<(), HostError>;

    /// 以给定名称登记一个选择集，成员不去重（按宿主集合语义处理）
    fn add_selection_set(&mut self, name: &str, nodes: &[NodeId]) -> Result<(), HostError>;
}

/// 完整宿主能力
pub trait SceneHost: SceneGraph + SceneEditor {}

impl<T: SceneGraph + SceneEditor + ?Sized> SceneHost for T {}
