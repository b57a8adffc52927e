//! IO 辅助：场景描述 JSON 与 CSV 文件读写

use std::{fs::File, io::BufReader, path::Path};

use serde::{de::DeserializeOwned, Serialize};

use crate::model::csv_codec::{decode, encode, CsvTable, UTF8_BOM};
use crate::model::data_core::PluginError;

/// 从文件读取JSON数据
pub fn read_json_file<T: DeserializeOwned>(p: &Path) -> Result<T, PluginError> {
    let f = File::open(p)?;
    let rdr = BufReader::new(f);
    let v = serde_json::from_reader(rdr)?;
    Ok(v)
}

/// 将JSON数据保存到文件（格式化输出）
pub fn write_json_file<T: Serialize + ?Sized>(p: &Path, value: &T) -> Result<(), PluginError> {
    let f = File::create(p)?;
    serde_json::to_writer_pretty(f, value)?;
    Ok(())
}

/// 读取CSV；非法UTF-8字节替换为U+FFFD，只有打开/读取文件失败才报错
pub fn read_csv_file(p: &Path) -> Result<CsvTable, PluginError> {
    let bytes = std::fs::read(p)?;
    Ok(decode(&String::from_utf8_lossy(&bytes)))
}

/// 写出CSV（UTF-8 BOM + CRLF），必要时创建目录
pub fn write_csv_file(p: &Path, table: &CsvTable) -> Result<(), PluginError> {
    if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut text = String::from(UTF8_BOM);
    text.push_str(&encode(table));
    std::fs::write(p, text)?;
    Ok(())
}
