//! 原生对话框实现（rfd）

use std::path::PathBuf;

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::vm::bridge::{Dialogs, NoticeLevel, UserAction, TITLE_CHOOSE};

#[derive(Debug, Default)]
pub struct RfdDialogs {
    /// 文件对话框的初始目录
    pub start_dir: Option<PathBuf>,
}

impl RfdDialogs {
    pub fn new(start_dir: Option<PathBuf>) -> Self {
        Self { start_dir }
    }
}

impl Dialogs for RfdDialogs {
    /// 是 → 导出，否 → 导入，其余（取消/关闭窗口）→ 取消
    fn choose_action(&mut self, prompt: &str) -> UserAction {
        let result = MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title(TITLE_CHOOSE)
            .set_description(prompt)
            .set_buttons(MessageButtons::YesNoCancel)
            .show();
        match result {
            MessageDialogResult::Yes => UserAction::Export,
            MessageDialogResult::No => UserAction::Import,
            _ => UserAction::Cancel,
        }
    }

    fn pick_csv_file(&mut self) -> Option<PathBuf> {
        let mut dialog = FileDialog::new()
            .add_filter("CSV文件 (*.csv)", &["csv"])
            .add_filter("所有文件 (*.*)", &["*"])
            .set_title("选择CSV文件");
        if let Some(dir) = &self.start_dir {
            dialog = dialog.set_directory(dir);
        }
        let picked = dialog.pick_file();
        if let Some(path) = &picked {
            if let Some(parent) = path.parent() {
                self.start_dir = Some(parent.to_path_buf());
            }
        }
        picked
    }

    fn notify(&mut self, level: NoticeLevel, title: &str, message: &str) {
        let level = match level {
            NoticeLevel::Info => MessageLevel::Info,
            NoticeLevel::Warning => MessageLevel::Warning,
            NoticeLevel::Error => MessageLevel::Error,
        };
        let _ = MessageDialog::new()
            .set_level(level)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}
