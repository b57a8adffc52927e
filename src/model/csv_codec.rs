//! CSV 编解码：逗号分隔、双引号转义，按物理行读取

use std::borrow::Cow;

/// 写出时使用的行结束符
pub const LINE_ENDING: &str = "\r\n";
/// UTF-8 BOM，写出时置于文件开头，读取时剥离
pub const UTF8_BOM: char = '\u{feff}';

/// 表头 + 数据行，所有值均为字符串
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// 读取单元格；行不足列数时缺失的尾部字段视为空
    pub fn field(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 转义单个字段：空值写成 `""`，含逗号/引号/换行时加引号并把内部引号加倍
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.is_empty() {
        return Cow::Borrowed("\"\"");
    }
    if field.contains([',', '"', '\r', '\n']) {
        return Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")));
    }
    Cow::Borrowed(field)
}

pub fn encode_line<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// 编码整张表（表头与数据行使用相同转义规则）
pub fn encode(table: &CsvTable) -> String {
    let mut out = String::with_capacity(64 * (table.rows.len() + 1));
    out.push_str(&encode_line(&table.headers));
    out.push_str(LINE_ENDING);
    for row in &table.rows {
        out.push_str(&encode_line(row));
        out.push_str(LINE_ENDING);
    }
    out
}

/// 解析一行
///
/// 引号外逗号结束字段，每个 `"` 切换引号状态且本身不进入字段；
/// 紧跟在闭合引号后的 `"` 重新进入引号并产出一个字面量引号，
/// 因此 `"a""b"` 解析为 `a"b`。
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut just_closed = false;

    for c in line.chars() {
        match c {
            '"' if in_quotes => {
                in_quotes = false;
                just_closed = true;
                continue;
            }
            '"' => {
                if just_closed {
                    current.push('"');
                }
                in_quotes = true;
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
        just_closed = false;
    }

    fields.push(current);
    fields
}

/// 解码整段文本
///
/// 空行整体跳过；数据行字段多于表头时截断，少于表头时缺失项读作空。
/// 不会因为行内格式问题报错。
pub fn decode(text: &str) -> CsvTable {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    let mut lines = text.lines().filter(|l| !l.is_empty());

    let Some(header_line) = lines.next() else {
        return CsvTable::default();
    };
    let mut table = CsvTable::new(parse_line(header_line));
    let width = table.headers.len();

    for line in lines {
        let mut fields = parse_line(line);
        fields.truncate(width);
        table.rows.push(fields);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_rules() {
        assert_eq!(escape_field("Pump-01"), "Pump-01");
        assert_eq!(escape_field(""), "\"\"");
        assert_eq!(escape_field("255,0,0"), "\"255,0,0\"");
        assert_eq!(escape_field("48\"-ATM"), "\"48\"\"-ATM\"");
        assert_eq!(escape_field("a\nb"), "\"a\nb\"");
        assert_eq!(escape_field("a\rb"), "\"a\rb\"");
    }

    #[test]
    fn test_encode_uses_crlf_and_header() {
        let mut table = CsvTable::new(vec!["NodeName".into(), "颜色".into()]);
        table.rows.push(vec!["Pump".into(), "".into()]);
        assert_eq!(encode(&table), "NodeName,颜色\r\nPump,\"\"\r\n");
    }

    #[test]
    fn test_parse_line_quote_toggle() {
        assert_eq!(parse_line("a,\"b,c\",d"), vec!["a", "b,c", "d"]);
        assert_eq!(parse_line("\"\",x"), vec!["", "x"]);
        assert_eq!(parse_line("\"say \"\"hi\"\"\""), vec!["say \"hi\""]);
        assert_eq!(parse_line("\"\"\"\""), vec!["\""]);
        assert_eq!(parse_line("a,"), vec!["a", ""]);
        assert_eq!(parse_line(""), vec![""]);
    }

    #[test]
    fn test_round_trip_special_fields() {
        let originals = [
            "255,0,0",
            "48\"-ATM-2111-117-001-A1A-N",
            "\"quoted\"",
            "a,\"b\",c",
            "普通中文名称",
        ];
        for original in originals {
            let line = encode_line(&[original, "tail"]);
            let fields = parse_line(&line);
            assert_eq!(fields, vec![original, "tail"], "字段应该原样还原: {}", original);
        }
    }

    #[test]
    fn test_round_trip_table() {
        let mut table = CsvTable::new(vec!["NodeName".into(), "NodeLevel".into(), "Level1".into()]);
        table.rows.push(vec!["Pipe".into(), "1".into(), "Area, North".into()]);
        table.rows.push(vec!["Valve".into(), "0".into(), "".into()]);

        let decoded = decode(&encode(&table));
        assert_eq!(decoded, table);
    }

    #[test]
    fn test_decode_skips_blank_lines_and_bom() {
        let text = "\u{feff}NodeName,NodeLevel\r\n\r\nA,0\r\n\nB,1\n";
        let table = decode(text);
        assert_eq!(table.headers, vec!["NodeName", "NodeLevel"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.field(1, 0), "B");
    }

    #[test]
    fn test_decode_short_and_long_rows() {
        let table = decode("a,b,c\n1\n1,2,3,4,5\n");
        assert_eq!(table.rows[0], vec!["1"]);
        assert_eq!(table.field(0, 2), "", "缺失的尾部字段读作空");
        assert_eq!(table.rows[1], vec!["1", "2", "3"], "多余字段应该被截断");
        assert_eq!(table.field(7, 0), "");
    }

    #[test]
    fn test_decode_empty_text() {
        assert_eq!(decode(""), CsvTable::default());
        assert!(decode("\n\n").headers.is_empty());
        let header_only = decode("NodeName\n");
        assert!(header_only.is_empty());
        assert!(header_only.has_column("NodeName"));
    }
}
