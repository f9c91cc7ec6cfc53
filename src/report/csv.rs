//! CSV 출력 표

/// 헤더 + 문자열 행으로 이루어진 출력 표
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    /// 행 추가 (열 수는 헤더와 같아야 함)
    pub fn push(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 필드 이스케이프 (쉼표, 세미콜론, 따옴표, 줄바꿈)
    fn escape_field(field: &str) -> String {
        if field.contains([',', ';', '"', '\n', '\r']) {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// CSV 문자열 생성 (줄 끝 `\n`)
    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str(&self.headers.join(","));
        output.push('\n');
        for row in &self.rows {
            let fields: Vec<String> = row.iter().map(|f| Self::escape_field(f)).collect();
            output.push_str(&fields.join(","));
            output.push('\n');
        }
        output
    }
}
