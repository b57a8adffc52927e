//! 测试用场景：两个模型，含重名节点

use crate::model::memory_scene::MemoryScene;

/// plant.nwd
/// ├─ Area-A
/// │  ├─ Pipe
/// │  │  └─ Elbow
/// │  └─ Pump-01
/// └─ Area-B
///    ├─ Rack
///    │  └─ Pipe
///    ├─ UniqueValve1
///    └─ Pump-02
/// utility.nwd
/// └─ Area-A
///    └─ Pump-03
pub(crate) fn plant_scene() -> MemoryScene {
    let mut scene = MemoryScene::new();

    let plant = scene.add_model("plant.nwd", "plant.nwd", "File");
    let area_a = scene.add_child(plant, "Area-A", "Layer");
    let pipe = scene.add_child(area_a, "Pipe", "Group");
    scene.add_child(pipe, "Elbow", "Solid");
    scene.add_child(area_a, "Pump-01", "Solid");
    let area_b = scene.add_child(plant, "Area-B", "Layer");
    let rack = scene.add_child(area_b, "Rack", "Group");
    scene.add_child(rack, "Pipe", "Solid");
    let valve = scene.add_child(area_b, "UniqueValve1", "Solid");
    scene.set_hidden(valve, true);
    scene.add_child(area_b, "Pump-02", "Solid");

    let utility = scene.add_model("utility.nwd", "utility.nwd", "File");
    let area_a2 = scene.add_child(utility, "Area-A", "Layer");
    scene.add_child(area_a2, "Pump-03", "Solid");

    scene
}
