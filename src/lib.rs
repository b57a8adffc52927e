//! 结构树 CSV 桥接库
//!
//! 把宿主场景的结构树导出为 CSV，并按 CSV 中填写的意图列回写
//! 隐藏/颜色/透明覆盖、按“集合”列创建选择集

pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use model::data_core::{
    export_structure_tree, modify_model_from_csv, ExportOutcome, ImportOutcome, PluginError,
};
pub use model::memory_scene::{MemoryScene, SceneFile};
pub use model::resolver::NameIndex;
pub use model::scene::{HostError, ModelRef, NodeId, Rgb, SceneEditor, SceneGraph, SceneHost};
pub use model::structure_tree::{flatten, StructureTable};
pub use utils::config::PluginConfig;
pub use vm::bridge::{execute, Dialogs, NoticeLevel, RunOutcome, UserAction};
