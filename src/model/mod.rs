pub mod csv_codec;
pub mod data_core;
pub mod import_table;
pub mod memory_scene;
pub mod modifier;
pub mod resolver;
pub mod scene;
pub mod selection_sets;
pub mod structure_tree;

#[cfg(test)]
pub(crate) mod fixtures;
