//! 名称索引：把 CSV 行（名称 + 层级 + 祖先链）重新定位到场景中的节点

use std::collections::HashMap;

use crate::model::scene::{NodeId, SceneGraph};

/// 显示名称 → 同名节点（按建索引时的遍历顺序）
#[derive(Debug, Default)]
pub struct NameIndex {
    by_name: HashMap<String, Vec<NodeId>>,
}

impl NameIndex {
    /// 遍历每个模型根节点及其全部后代（先序）
    pub fn build<G: SceneGraph + ?Sized>(graph: &G) -> Self {
        let mut index = Self::default();
        let mut stack = Vec::new();
        for model in graph.models() {
            stack.push(model.root);
            while let Some(node) = stack.pop() {
                index
                    .by_name
                    .entry(graph.display_name(node).to_string())
                    .or_default()
                    .push(node);
                stack.extend(graph.children(node).into_iter().rev());
            }
        }
        tracing::info!("名称索引构建完成: {} 个名称，{} 个节点", index.by_name.len(), index.len());
        index
    }

    pub fn candidates(&self, name: &str) -> &[NodeId] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 节点总数
    pub fn len(&self) -> usize {
        self.by_name.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_name.clear();
    }

    /// 定位节点
    ///
    /// 名称唯一时直接返回该节点，不校验层级；同名多个时取第一个
    /// 深度与祖先链都吻合的候选。
    pub fn resolve<G: SceneGraph + ?Sized>(
        &self,
        graph: &G,
        name: &str,
        ancestors: &[String],
        depth: usize,
    ) -> Option<NodeId> {
        match self.candidates(name) {
            [] => None,
            [only] => Some(*only),
            many => many.iter().copied().find(|&node| {
                node_depth(graph, node) == depth && ancestor_chain(graph, node) == ancestors
            }),
        }
    }
}

/// 到模型根节点下一层的跳数；根的直接子节点为 0
pub fn node_depth<G: SceneGraph + ?Sized>(graph: &G, node: NodeId) -> usize {
    let mut depth = 0;
    let mut current = node;
    while let Some(parent) = graph.parent(current) {
        if graph.parent(parent).is_none() {
            break;
        }
        depth += 1;
        current = parent;
    }
    depth
}

/// 祖先名称链：从 depth 0 层到父节点，不含节点自身与模型根
pub fn ancestor_chain<G: SceneGraph + ?Sized>(graph: &G, node: NodeId) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current = node;
    while let Some(parent) = graph.parent(current) {
        if graph.parent(parent).is_none() {
            break;
        }
        chain.push(graph.display_name(parent).to_string());
        current = parent;
    }
    chain.reverse();
    chain
}
