//! VM桥接层：三选一操作入口，所有结果通过对话框告知用户

use std::path::PathBuf;

use chrono::Local;

use crate::model::data_core::{
    export_structure_tree, modify_model_from_csv, ExportOutcome, ImportOutcome,
};
use crate::model::scene::SceneHost;
use crate::utils::config::PluginConfig;

// === 常量定义（消除魔法值） ===
pub const TITLE_CHOOSE: &str = "选择操作";
pub const TITLE_WARNING: &str = "警告";
pub const TITLE_INFO: &str = "信息";
pub const TITLE_ERROR: &str = "错误";
pub const TITLE_EXPORT_OK: &str = "导出成功";
pub const TITLE_DONE: &str = "完成";

pub const PROMPT_CHOOSE: &str =
    "请选择操作：\n\n是(Y) - 导出结构树到CSV\n否(N) - 从CSV文件修改模型\n取消 - 退出程序";
pub const MSG_NO_MODEL: &str = "没有打开任何模型";
pub const MSG_CANCELLED: &str = "操作已取消";
pub const MSG_NOTHING_TO_EXPORT: &str = "没有可导出的节点";
pub const MSG_NO_GROUPS: &str = "CSV文件中没有找到有效的集合数据";
pub const MSG_EXPORT_ERROR_PREFIX: &str = "导出结构树时发生错误: ";
pub const MSG_MODIFY_ERROR_PREFIX: &str = "修改模型时发生错误: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Export,
    Import,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// 用户交互面：操作选择、文件选择、模态提示
pub trait Dialogs {
    fn choose_action(&mut self, prompt: &str) -> UserAction;

    fn pick_csv_file(&mut self) -> Option<PathBuf>;

    fn notify(&mut self, level: NoticeLevel, title: &str, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    NoModel,
    Cancelled,
    /// 选择了导入但没有选择文件
    NoFileChosen,
    Exported(ExportOutcome),
    Imported(ImportOutcome),
    Failed(String),
}

/// 执行一次插件调用；不会向调用方传播错误
pub fn execute<H, D>(host: &mut H, dialogs: &mut D, config: &PluginConfig) -> RunOutcome
where
    H: SceneHost + ?Sized,
    D: Dialogs + ?Sized,
{
    if host.models().is_empty() {
        dialogs.notify(NoticeLevel::Warning, TITLE_WARNING, MSG_NO_MODEL);
        return RunOutcome::NoModel;
    }

    match dialogs.choose_action(PROMPT_CHOOSE) {
        UserAction::Export => run_export(&*host, dialogs, config),
        UserAction::Import => {
            let Some(path) = dialogs.pick_csv_file() else {
                tracing::info!("用户取消了文件选择");
                return RunOutcome::NoFileChosen;
            };
            tracing::info!("用户选择了文件: {}", path.display());
            run_import(host, dialogs, path)
        }
        UserAction::Cancel => {
            dialogs.notify(NoticeLevel::Info, TITLE_INFO, MSG_CANCELLED);
            RunOutcome::Cancelled
        }
    }
}

fn run_export<H, D>(host: &H, dialogs: &mut D, config: &PluginConfig) -> RunOutcome
where
    H: SceneHost + ?Sized,
    D: Dialogs + ?Sized,
{
    match export_structure_tree(host, config, Local::now().naive_local()) {
        Ok(ExportOutcome::Nothing) => {
            dialogs.notify(NoticeLevel::Info, TITLE_INFO, MSG_NOTHING_TO_EXPORT);
            RunOutcome::Exported(ExportOutcome::Nothing)
        }
        Ok(ExportOutcome::Written { path, rows }) => {
            let message = format!(
                "成功导出结构树数据，共 {} 个节点\nCSV文件已保存到：{}",
                rows,
                path.display()
            );
            dialogs.notify(NoticeLevel::Info, TITLE_EXPORT_OK, &message);
            RunOutcome::Exported(ExportOutcome::Written { path, rows })
        }
        Err(e) => {
            tracing::error!("导出失败: {}", e);
            let message = format!("{}{}", MSG_EXPORT_ERROR_PREFIX, e);
            dialogs.notify(NoticeLevel::Error, TITLE_ERROR, &message);
            RunOutcome::Failed(message)
        }
    }
}

fn run_import<H, D>(host: &mut H, dialogs: &mut D, path: PathBuf) -> RunOutcome
where
    H: SceneHost + ?Sized,
    D: Dialogs + ?Sized,
{
    let outcome = match modify_model_from_csv(host, &path) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("导入失败: {}", e);
            let message = format!("{}{}", MSG_MODIFY_ERROR_PREFIX, e);
            dialogs.notify(NoticeLevel::Error, TITLE_ERROR, &message);
            return RunOutcome::Failed(message);
        }
    };

    let modify = &outcome.modify;
    dialogs.notify(
        NoticeLevel::Info,
        TITLE_DONE,
        &format!("处理完成！\n找到项目: {}\n未找到项目: {}", modify.processed, modify.not_found),
    );

    match &outcome.selection {
        Some(report) => {
            let mut message = format!(
                "成功创建 {} 个选择集，共包含 {} 个模型项",
                report.sets_created, report.total_items
            );
            let level = if report.failed_sets.is_empty() {
                NoticeLevel::Info
            } else {
                message.push_str(&format!("\n创建失败: {}", report.failed_sets.join(", ")));
                NoticeLevel::Warning
            };
            dialogs.notify(level, TITLE_DONE, &message);
        }
        None => dialogs.notify(NoticeLevel::Info, TITLE_INFO, MSG_NO_GROUPS),
    }
    RunOutcome::Imported(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::plant_scene;
    use crate::model::memory_scene::MemoryScene;
    use tempfile::TempDir;

    /// 按预设应答的对话框，记录所有提示
    struct ScriptedDialogs {
        action: UserAction,
        file: Option<PathBuf>,
        notices: Vec<(NoticeLevel, String, String)>,
    }

    impl ScriptedDialogs {
        fn new(action: UserAction, file: Option<PathBuf>) -> Self {
            Self {
                action,
                file,
                notices: Vec::new(),
            }
        }
    }

    impl Dialogs for ScriptedDialogs {
        fn choose_action(&mut self, prompt: &str) -> UserAction {
            assert!(prompt.contains("导出结构树到CSV"));
            self.action
        }

        fn pick_csv_file(&mut self) -> Option<PathBuf> {
            self.file.take()
        }

        fn notify(&mut self, level: NoticeLevel, title: &str, message: &str) {
            self.notices.push((level, title.to_string(), message.to_string()));
        }
    }

    fn config_in(dir: &TempDir) -> PluginConfig {
        PluginConfig {
            output_dir: Some(dir.path().to_path_buf()),
            ..PluginConfig::default()
        }
    }

    #[test]
    fn test_no_model_warns() {
        let dir = TempDir::new().unwrap();
        let mut scene = MemoryScene::new();
        let mut dialogs = ScriptedDialogs::new(UserAction::Export, None);
        assert_eq!(execute(&mut scene, &mut dialogs, &config_in(&dir)), RunOutcome::NoModel);
        assert_eq!(dialogs.notices[0].0, NoticeLevel::Warning);
        assert_eq!(dialogs.notices[0].2, MSG_NO_MODEL);
    }

    #[test]
    fn test_cancel_reports_info() {
        let dir = TempDir::new().unwrap();
        let mut scene = plant_scene();
        let mut dialogs = ScriptedDialogs::new(UserAction::Cancel, None);
        assert_eq!(execute(&mut scene, &mut dialogs, &config_in(&dir)), RunOutcome::Cancelled);
        assert_eq!(dialogs.notices.len(), 1);
        assert_eq!(dialogs.notices[0].2, MSG_CANCELLED);
    }

    #[test]
    fn test_export_success_message() {
        let dir = TempDir::new().unwrap();
        let mut scene = plant_scene();
        let mut dialogs = ScriptedDialogs::new(UserAction::Export, None);
        let outcome = execute(&mut scene, &mut dialogs, &config_in(&dir));

        let RunOutcome::Exported(ExportOutcome::Written { path, rows }) = outcome else {
            panic!("应该导出成功");
        };
        assert_eq!(rows, 11);
        assert!(path.exists());
        let (level, title, message) = &dialogs.notices[0];
        assert_eq!(*level, NoticeLevel::Info);
        assert_eq!(title, TITLE_EXPORT_OK);
        assert!(message.contains("共 11 个节点"));
    }

    #[test]
    fn test_import_without_file_does_nothing() {
        let dir = TempDir::new().unwrap();
        let mut scene = plant_scene();
        let mut dialogs = ScriptedDialogs::new(UserAction::Import, None);
        assert_eq!(execute(&mut scene, &mut dialogs, &config_in(&dir)), RunOutcome::NoFileChosen);
        assert!(dialogs.notices.is_empty());
    }

    #[test]
    fn test_import_reports_counts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("edit.csv");
        std::fs::write(
            &path,
            "NodeName,NodeLevel,隐藏,颜色,透明,集合,Level1\n\
             Pump-01,1,Y,,,Pumps,Area-A\n\
             Pump-02,1,,\"0,0,255\",,Pumps,Area-B\n\
             Ghost,0,Y,,,,\n",
        )
        .unwrap();

        let mut scene = plant_scene();
        let mut dialogs = ScriptedDialogs::new(UserAction::Import, Some(path));
        let outcome = execute(&mut scene, &mut dialogs, &config_in(&dir));
        assert!(matches!(outcome, RunOutcome::Imported(_)));

        let messages: Vec<&str> = dialogs.notices.iter().map(|n| n.2.as_str()).collect();
        assert_eq!(messages[0], "处理完成！\n找到项目: 2\n未找到项目: 1");
        assert_eq!(messages[1], "成功创建 1 个选择集，共包含 2 个模型项");
        assert_eq!(scene.selection_sets().len(), 1);
    }

    #[test]
    fn test_import_error_surfaces_in_dialog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "NodeName,NodeLevel\nPump-01,1\n").unwrap();

        let mut scene = plant_scene();
        let mut dialogs = ScriptedDialogs::new(UserAction::Import, Some(path));
        let outcome = execute(&mut scene, &mut dialogs, &config_in(&dir));

        assert_eq!(
            outcome,
            RunOutcome::Failed("修改模型时发生错误: CSV文件中没有找到'隐藏'列".to_string())
        );
        assert_eq!(dialogs.notices.len(), 1);
        assert_eq!(dialogs.notices[0].0, NoticeLevel::Error);
        assert!(scene.overrides().is_empty());
    }
}
