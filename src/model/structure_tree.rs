//! 结构树展平：把每个模型根节点以下的节点按先序遍历展开为一行一节点的表

use crate::model::csv_codec::CsvTable;
use crate::model::scene::{NodeId, SceneGraph};

pub const COL_NODE_NAME: &str = "NodeName";
pub const COL_NODE_LEVEL: &str = "NodeLevel";
pub const COL_CLASS_NAME: &str = "ClassName";
pub const COL_IS_HIDDEN: &str = "IsHidden";
pub const COL_CHILDREN: &str = "ChildrenCount";
pub const COL_MODEL_SOURCE: &str = "ModelSource";
pub const COL_HIDE: &str = "隐藏";
pub const COL_COLOR: &str = "颜色";
pub const COL_TRANSPARENCY: &str = "透明";
pub const COL_GROUP: &str = "集合";

/// 层级列之前的固定列（导出顺序）
pub const FIXED_COLUMNS: [&str; 10] = [
    COL_NODE_NAME,
    COL_NODE_LEVEL,
    COL_CLASS_NAME,
    COL_IS_HIDDEN,
    COL_CHILDREN,
    COL_MODEL_SOURCE,
    COL_HIDE,
    COL_COLOR,
    COL_TRANSPARENCY,
    COL_GROUP,
];

/// 导出表至少带的层级列数
pub const DEFAULT_LEVEL_COLUMNS: usize = 3;

/// `Level1`、`Level2`…，从 1 开始
pub fn level_column_name(level: usize) -> String {
    format!("Level{}", level)
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructureRow {
    pub node: NodeId,
    pub name: String,
    /// 0 = 模型根节点的直接子节点
    pub depth: usize,
    pub class_name: String,
    pub is_hidden: bool,
    pub has_children: bool,
    pub model_source: String,
    /// 修改意图列，导出时为空，由用户在表格中填写
    pub hide: String,
    pub color: String,
    pub transparency: String,
    /// 集合名称，导出时为空
    pub group: String,
    /// 祖先名称链（depth 0 层到父节点，不含自身），长度等于 depth
    pub ancestors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureTable {
    rows: Vec<StructureRow>,
    level_columns: usize,
}

impl StructureTable {
    /// 由已收集的行确定层级列宽度（第二遍）
    pub fn from_rows(rows: Vec<StructureRow>) -> Self {
        let deepest = rows.iter().map(|r| r.ancestors.len()).max().unwrap_or(0);
        Self {
            rows,
            level_columns: deepest.max(DEFAULT_LEVEL_COLUMNS),
        }
    }

    pub fn rows(&self) -> &[StructureRow] {
        &self.rows
    }

    pub fn level_columns(&self) -> usize {
        self.level_columns
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.rows.iter().map(|r| r.depth).max()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> Vec<String> {
        FIXED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain((1..=self.level_columns).map(level_column_name))
            .collect()
    }

    /// 物化为定宽表，浅层行缺失的层级列为空
    pub fn to_csv_table(&self) -> CsvTable {
        let mut table = CsvTable::new(self.headers());
        table.rows = self
            .rows
            .iter()
            .map(|row| {
                let mut fields = vec![
                    row.name.clone(),
                    row.depth.to_string(),
                    row.class_name.clone(),
                    bool_text(row.is_hidden).to_string(),
                    bool_text(row.has_children).to_string(),
                    row.model_source.clone(),
                    row.hide.clone(),
                    row.color.clone(),
                    row.transparency.clone(),
                    row.group.clone(),
                ];
                fields.extend(
                    (0..self.level_columns)
                        .map(|i| row.ancestors.get(i).cloned().unwrap_or_default()),
                );
                fields
            })
            .collect();
        table
    }
}

/// 宿主布尔值的文本形式
fn bool_text(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// 展平所有模型；根节点本身不输出
pub fn flatten<G: SceneGraph + ?Sized>(graph: &G) -> StructureTable {
    fn walk<G: SceneGraph + ?Sized>(
        out: &mut Vec<StructureRow>,
        graph: &G,
        node: NodeId,
        source: &str,
        ancestors: &mut Vec<String>,
    ) {
        let has_children = graph.has_children(node);
        out.push(StructureRow {
            node,
            name: graph.display_name(node).to_string(),
            depth: ancestors.len(),
            class_name: graph.class_name(node).to_string(),
            is_hidden: graph.is_hidden(node),
            has_children,
            model_source: source.to_string(),
            hide: String::new(),
            color: String::new(),
            transparency: String::new(),
            group: String::new(),
            ancestors: ancestors.clone(),
        });
        if !has_children {
            return;
        }
        ancestors.push(graph.display_name(node).to_string());
        for child in graph.children(node) {
            walk(out, graph, child, source, ancestors);
        }
        ancestors.pop();
    }

    let mut out = Vec::with_capacity(1024);
    for model in graph.models() {
        let mut ancestors = Vec::new();
        for child in graph.children(model.root) {
            walk(&mut out, graph, child, &model.source, &mut ancestors);
        }
    }
    tracing::debug!("结构树展平完成: {} 行", out.len());
    StructureTable::from_rows(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::plant_scene;
    use crate::model::memory_scene::MemoryScene;

    #[test]
    fn test_flatten_preorder_without_roots() {
        let scene = plant_scene();
        let table = flatten(&scene);

        let names: Vec<&str> = table.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Area-A",
                "Pipe",
                "Elbow",
                "Pump-01",
                "Area-B",
                "Rack",
                "Pipe",
                "UniqueValve1",
                "Pump-02",
                "Area-A",
                "Pump-03"
            ]
        );
        assert!(!names.contains(&"plant.nwd"), "模型根节点不应该输出");
    }

    #[test]
    fn test_depth_and_ancestor_chain() {
        let table = flatten(&plant_scene());
        let elbow = &table.rows()[2];
        assert_eq!(elbow.depth, 2);
        assert_eq!(elbow.ancestors, vec!["Area-A", "Pipe"]);
        assert_eq!(elbow.model_source, "plant.nwd");

        let area = &table.rows()[0];
        assert_eq!(area.depth, 0);
        assert!(area.ancestors.is_empty());
        assert!(area.has_children);

        let pump3 = table.rows().last().unwrap();
        assert_eq!(pump3.model_source, "utility.nwd");
        assert_eq!(pump3.ancestors, vec!["Area-A"]);
        assert!(table.rows().iter().all(|r| r.depth == r.ancestors.len()));
    }

    #[test]
    fn test_three_level_columns_for_depth_two() {
        let table = flatten(&plant_scene());
        assert_eq!(table.max_depth(), Some(2));
        let headers = table.headers();
        assert_eq!(&headers[10..], &["Level1", "Level2", "Level3"]);

        let csv = table.to_csv_table();
        let l1 = csv.column_index("Level1").unwrap();
        // Area-A: 深度 0，所有层级列为空
        assert_eq!(&csv.rows[0][l1..], &["", "", ""]);
        // Elbow
        assert_eq!(&csv.rows[2][l1..], &["Area-A", "Pipe", ""]);
        assert!(csv.rows.iter().all(|r| r.len() == headers.len()));
    }

    #[test]
    fn test_level_columns_grow_with_depth() {
        let mut scene = MemoryScene::new();
        let root = scene.add_model("deep.nwd", "deep.nwd", "File");
        let mut parent = root;
        for i in 0..6 {
            parent = scene.add_child(parent, &format!("N{}", i), "Group");
        }
        scene.add_child(root, "Shallow", "Solid");

        let table = flatten(&scene);
        assert_eq!(table.level_columns(), 5);
        let csv = table.to_csv_table();
        assert_eq!(csv.headers.last().unwrap(), "Level5");
        let last = csv.rows.last().unwrap();
        assert_eq!(last[0], "Shallow");
        assert!(last[10..].iter().all(|f| f.is_empty()), "浅层行的层级列应该为空");
    }

    #[test]
    fn test_fixed_columns_and_flags() {
        let table = flatten(&plant_scene());
        let csv = table.to_csv_table();
        assert_eq!(&csv.headers[..10], &FIXED_COLUMNS);

        let valve = csv.rows.iter().find(|r| r[0] == "UniqueValve1").unwrap();
        assert_eq!(valve[1], "1");
        assert_eq!(valve[2], "Solid");
        assert_eq!(valve[3], "True");
        assert_eq!(valve[4], "False");
        assert_eq!(valve[5], "plant.nwd");
        assert_eq!(&valve[6..10], &["", "", "", ""]);
    }

    #[test]
    fn test_empty_inputs() {
        let empty = flatten(&MemoryScene::new());
        assert!(empty.is_empty());
        assert_eq!(empty.max_depth(), None);
        assert_eq!(empty.level_columns(), DEFAULT_LEVEL_COLUMNS);

        let mut scene = MemoryScene::new();
        scene.add_model("bare.nwd", "bare.nwd", "File");
        assert!(flatten(&scene).is_empty(), "没有子节点的模型不产生行");
    }
}
