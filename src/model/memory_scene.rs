//! MemoryScene：内存中的宿主场景图，用 JSON 场景描述构建
//!
//! 命令行宿主与单元测试共用。节点编号按先序遍历分配，覆盖、选择集与事务
//! 都记录在内存中，可通过 `snapshot()` 序列化回写。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::scene::{HostError, ModelRef, NodeId, Rgb, SceneEditor, SceneGraph};

/// 场景描述文件（磁盘上的 JSON 格式）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub models: Vec<ModelSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// 来源文件名（导出到 ModelSource 列）
    pub source: String,
    pub root: NodeSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

/// 单个节点上叠加的覆盖状态
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSetRecord {
    pub name: String,
    pub members: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionState {
    Open,
    Committed,
    /// 未提交就开启了新事务
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub name: String,
    pub state: TransactionState,
}

#[derive(Debug, Clone)]
struct NodeData {
    name: String,
    class_name: String,
    hidden: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Default)]
pub struct MemoryScene {
    nodes: Vec<NodeData>,
    models: Vec<ModelRef>,
    overrides: BTreeMap<NodeId, NodeOverride>,
    selection_sets: Vec<SelectionSetRecord>,
    transactions: Vec<TransactionRecord>,
    active: Option<usize>,
}

/// 回写用快照：模型结构 + 覆盖 + 选择集
#[derive(Debug, Clone, Serialize)]
pub struct SceneSnapshot {
    pub models: Vec<ModelSpec>,
    pub overrides: Vec<OverrideEntry>,
    pub selection_sets: Vec<SelectionSetEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverrideEntry {
    pub node: NodeId,
    pub name: String,
    #[serde(flatten)]
    pub state: NodeOverride,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionSetEntry {
    pub name: String,
    pub members: Vec<NodeId>,
    pub member_names: Vec<String>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从场景描述构建，节点按先序编号
    pub fn from_file(file: &SceneFile) -> Self {
        let mut scene = Self::new();
        for model in &file.models {
            let root = scene.add_model(&model.source, &model.root.name, &model.root.class_name);
            scene.set_hidden(root, model.root.hidden);
            for child in &model.root.children {
                scene.add_subtree(root, child);
            }
        }
        scene
    }

    fn add_subtree(&mut self, parent: NodeId, spec: &NodeSpec) {
        let id = self.add_child(parent, &spec.name, &spec.class_name);
        self.set_hidden(id, spec.hidden);
        for child in &spec.children {
            self.add_subtree(id, child);
        }
    }

    /// 新增一个模型，返回根节点
    pub fn add_model(&mut self, source: &str, root_name: &str, class_name: &str) -> NodeId {
        let root = self.push_node(root_name, class_name, None);
        self.models.push(ModelRef {
            root,
            source: source.to_string(),
        });
        root
    }

    pub fn add_child(&mut self, parent: NodeId, name: &str, class_name: &str) -> NodeId {
        let id = self.push_node(name, class_name, Some(parent));
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        self.nodes[node.0].hidden = hidden;
    }

    fn push_node(&mut self, name: &str, class_name: &str, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            name: name.to_string(),
            class_name: class_name.to_string(),
            hidden: false,
            parent,
            children: Vec::new(),
        });
        id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 按名称查找第一个节点（测试与日志用）
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    pub fn override_of(&self, node: NodeId) -> Option<&NodeOverride> {
        self.overrides.get(&node)
    }

    pub fn overrides(&self) -> &BTreeMap<NodeId, NodeOverride> {
        &self.overrides
    }

    pub fn selection_sets(&self) -> &[SelectionSetRecord] {
        &self.selection_sets
    }

    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    pub fn in_transaction(&self) -> bool {
        self.active.is_some()
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        let models = self
            .models
            .iter()
            .map(|m| ModelSpec {
                source: m.source.clone(),
                root: self.to_spec(m.root),
            })
            .collect();
        let overrides = self
            .overrides
            .iter()
            .map(|(id, state)| OverrideEntry {
                node: *id,
                name: self.nodes[id.0].name.clone(),
                state: state.clone(),
            })
            .collect();
        let selection_sets = self
            .selection_sets
            .iter()
            .map(|s| SelectionSetEntry {
                name: s.name.clone(),
                members: s.members.clone(),
                member_names: s.members.iter().map(|id| self.nodes[id.0].name.clone()).collect(),
            })
            .collect();
        SceneSnapshot {
            models,
            overrides,
            selection_sets,
        }
    }

    fn to_spec(&self, node: NodeId) -> NodeSpec {
        let data = &self.nodes[node.0];
        NodeSpec {
            name: data.name.clone(),
            class_name: data.class_name.clone(),
            hidden: data.hidden,
            children: data.children.iter().map(|c| self.to_spec(*c)).collect(),
        }
    }

    fn require_transaction(&self, op: &str) -> Result<(), HostError> {
        if self.active.is_none() {
            return Err(HostError(format!("{} 必须在事务内执行", op)));
        }
        Ok(())
    }

    fn check_nodes(&self, nodes: &[NodeId]) -> Result<(), HostError> {
        match nodes.iter().find(|id| id.0 >= self.nodes.len()) {
            Some(bad) => Err(HostError(format!("无效节点编号: {}", bad.0))),
            None => Ok(()),
        }
    }

    fn override_mut(
        &mut self,
        nodes: &[NodeId],
        op: &str,
        mut f: impl FnMut(&mut NodeOverride),
    ) -> Result<(), HostError> {
        self.require_transaction(op)?;
        self.check_nodes(nodes)?;
        for id in nodes {
            f(self.overrides.entry(*id).or_default());
        }
        Ok(())
    }
}

impl SceneGraph for MemoryScene {
    fn models(&self) -> Vec<ModelRef> {
        self.models.clone()
    }

    fn display_name(&self, node: NodeId) -> &str {
        &self.nodes[node.0].name
    }

    fn class_name(&self, node: NodeId) -> &str {
        &self.nodes[node.0].class_name
    }

    fn is_hidden(&self, node: NodeId) -> bool {
        self.nodes[node.0].hidden
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node.0].children.clone()
    }

    fn has_children(&self, node: NodeId) -> bool {
        !self.nodes[node.0].children.is_empty()
    }
}

impl SceneEditor for MemoryScene {
    fn begin_transaction(&mut self, name: &str) -> Result<(), HostError> {
        if let Some(stale) = self.active.take() {
            tracing::warn!("事务 {} 未提交即被新事务取代", self.transactions[stale].name);
            self.transactions[stale].state = TransactionState::Abandoned;
        }
        self.transactions.push(TransactionRecord {
            name: name.to_string(),
            state: TransactionState::Open,
        });
        self.active = Some(self.transactions.len() - 1);
        Ok(())
    }

    fn commit_transaction(&mut self) -> Result<(), HostError> {
        let idx = self
            .active
            .take()
            .ok_or_else(|| HostError("没有可提交的事务".into()))?;
        self.transactions[idx].state = TransactionState::Committed;
        Ok(())
    }

    fn override_hidden(&mut self, nodes: &[NodeId], hidden: bool) -> Result<(), HostError> {
        self.override_mut(nodes, "隐藏覆盖", |o| o.hidden = Some(hidden))
    }

    fn override_color(&mut self, nodes: &[NodeId], color: Rgb) -> Result<(), HostError> {
        self.override_mut(nodes, "颜色覆盖", |o| o.color = Some(color))
    }

    fn override_transparency(
        &mut self,
        nodes: &[NodeId],
        transparency: f64,
    ) -> Result<(), HostError> {
        if !(0.0..=1.0).contains(&transparency) {
            return Err(HostError(format!("透明度超出范围: {}", transparency)));
        }
        self.override_mut(nodes, "透明覆盖", |o| o.transparency = Some(transparency))
    }

    fn add_selection_set(&mut self, name: &str, nodes: &[NodeId]) -> Result<(), HostError> {
        self.require_transaction("创建选择集")?;
        self.check_nodes(nodes)?;
        self.selection_sets.push(SelectionSetRecord {
            name: name.to_string(),
            members: nodes.to_vec(),
        });
        Ok(())
    }
}
