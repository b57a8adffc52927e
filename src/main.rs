//! 程序入口：初始化日志，加载场景描述作为宿主，弹出操作选择

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::fmt::SubscriberBuilder;

use navis_csv_bridge::model::memory_scene::{MemoryScene, SceneFile};
use navis_csv_bridge::utils::config::{PluginConfig, DEFAULT_FILE_PREFIX};
use navis_csv_bridge::utils::fs::{read_json_file, write_json_file};
use navis_csv_bridge::vm::bridge::{execute, Dialogs, NoticeLevel, RunOutcome, TITLE_ERROR};
use navis_csv_bridge::vm::dialogs::RfdDialogs;

#[derive(Parser, Debug)]
#[command(name = "navis_csv_bridge")]
#[command(about = "结构树导出CSV / 从CSV修改模型", long_about = None)]
struct Cli {
    /// 场景描述JSON文件
    #[arg(short, long, value_name = "FILE")]
    scene: PathBuf,

    /// 导出目录（默认用户桌面）
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// 导出文件名前缀
    #[arg(long, default_value = DEFAULT_FILE_PREFIX)]
    prefix: String,

    /// 导入完成后把场景（含覆盖与选择集）写到此文件
    #[arg(long, value_name = "FILE")]
    save_scene: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志输出
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = SubscriberBuilder::default().with_max_level(level).try_init();

    let mut dialogs = RfdDialogs::new(cli.output_dir.clone());
    let file: SceneFile = match read_json_file(&cli.scene) {
        Ok(file) => file,
        Err(e) => {
            dialogs.notify(NoticeLevel::Error, TITLE_ERROR, &format!("加载场景失败: {}", e));
            return Err(e).with_context(|| format!("加载场景失败: {}", cli.scene.display()));
        }
    };
    let mut scene = MemoryScene::from_file(&file);
    tracing::info!("场景加载完成: {} 个模型，{} 个节点", file.models.len(), scene.node_count());

    let config = PluginConfig {
        output_dir: cli.output_dir,
        file_prefix: cli.prefix,
    };
    let outcome = execute(&mut scene, &mut dialogs, &config);
    tracing::info!("本次执行结果: {:?}", outcome);

    if let (RunOutcome::Imported(_), Some(path)) = (&outcome, &cli.save_scene) {
        write_json_file(path, &scene.snapshot())
            .with_context(|| format!("保存场景失败: {}", path.display()))?;
        tracing::info!("场景已保存: {}", path.display());
    }
    Ok(())
}
