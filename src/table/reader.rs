//! 입력 테이블 읽기 (CSV / JSON)
//!
//! 세 입력 테이블은 형식에 독립적입니다. 확장자가 `.json`이면 객체 배열로,
//! 그 외에는 CSV로 읽습니다. CSV 구분자(`,` 또는 `;`)는 앞부분을 보고 판단합니다.

use std::fs;
use std::path::Path;

use super::error::TableError;

/// 구분자 추정에 사용하는 앞부분 길이 (문자 수)
const SNIFF_LEN: usize = 4096;

/// 헤더 + 문자열 셀로 이루어진 원시 테이블
#[derive(Debug, Clone)]
pub struct RawTable {
    table: &'static str,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// 파일에서 테이블 로드
    pub fn load(table: &'static str, path: &Path) -> Result<Self, TableError> {
        let text = fs::read_to_string(path).map_err(|source| TableError::Io {
            table,
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(table, &text)
        } else {
            Self::from_csv(table, &text)
        }
    }

    /// 이미 구성된 헤더/행으로 테이블 생성
    pub fn from_parts(table: &'static str, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { table, headers, rows }
    }

    /// CSV 문자열에서 테이블 생성
    pub fn from_csv(table: &'static str, text: &str) -> Result<Self, TableError> {
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        let delimiter = sniff_delimiter(text);
        let mut records = parse_csv(text, delimiter).map_err(|message| TableError::Format {
            table,
            message,
        })?;

        if records.is_empty() {
            return Ok(Self::from_parts(table, Vec::new(), Vec::new()));
        }

        let headers: Vec<String> = records.remove(0).into_iter().map(|h| h.trim().to_string()).collect();
        let width = headers.len();
        let rows = records
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Ok(Self::from_parts(table, headers, rows))
    }

    /// JSON 문자열(객체 배열)에서 테이블 생성
    ///
    /// # 형식
    /// ```json
    /// [
    ///   { "language_code": "kbd", "population": 516826, "year": 2010 },
    ///   { "language_code": "ady", "population": 117489, "year": 2010 }
    /// ]
    /// ```
    pub fn from_json(table: &'static str, text: &str) -> Result<Self, TableError> {
        let value: serde_json::Value = serde_json::from_str(text).map_err(|e| TableError::Format {
            table,
            message: format!("JSON 파싱 오류: {}", e),
        })?;

        Self::from_json_value(table, &value)
    }

    fn from_json_value(table: &'static str, value: &serde_json::Value) -> Result<Self, TableError> {
        let items = value.as_array().ok_or_else(|| TableError::Format {
            table,
            message: "최상위 값이 배열이 아닙니다".into(),
        })?;

        let mut headers: Vec<String> = Vec::new();
        let mut objects = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let obj = item.as_object().ok_or_else(|| TableError::Format {
                table,
                message: format!("{}번째 항목이 객체가 아닙니다", idx + 1),
            })?;
            for key in obj.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
            objects.push(obj);
        }

        let mut rows = Vec::with_capacity(objects.len());
        for obj in objects {
            let mut row = Vec::with_capacity(headers.len());
            for header in &headers {
                let cell = match obj.get(header) {
                    Some(v) => json_cell(v).ok_or_else(|| TableError::Format {
                        table,
                        message: format!("'{}' 필드 값을 문자열로 바꿀 수 없습니다: {}", header, v),
                    })?,
                    None => String::new(),
                };
                row.push(cell);
            }
            rows.push(row);
        }

        Ok(Self::from_parts(table, headers, rows))
    }

    /// 테이블 이름
    pub fn table(&self) -> &'static str {
        self.table
    }

    /// 헤더 목록
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// 데이터 행
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// 데이터 행 수
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// JSON 값 → 셀 문자열. 배열은 쉼표로 연결합니다 (언어 목록).
fn json_cell(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;
    match value {
        Value::Null => Some(String::new()),
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1".into() } else { "0".into() }),
        Value::Array(items) => {
            let parts: Option<Vec<String>> = items.iter().map(json_cell).collect();
            parts.map(|p| p.join(","))
        }
        Value::Object(_) => None,
    }
}

/// `;`가 `,`보다 많으면 `;`, 아니면 `,`
fn sniff_delimiter(text: &str) -> char {
    let head = text.chars().take(SNIFF_LEN);
    let (mut semicolons, mut commas) = (0usize, 0usize);
    for c in head {
        match c {
            ';' => semicolons += 1,
            ',' => commas += 1,
            _ => {}
        }
    }
    if semicolons > commas {
        ';'
    } else {
        ','
    }
}

/// 따옴표를 지원하는 CSV 파서
///
/// 빈 줄은 건너뜁니다. 따옴표 안의 구분자/줄바꿈은 셀 내용으로 취급하고
/// `""`는 따옴표 하나로 풉니다.
fn parse_csv(text: &str, delimiter: char) -> Result<Vec<Vec<String>>, String> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            '\r' => {}
            '\n' => {
                line += 1;
                record.push(std::mem::take(&mut field));
                finish_record(&mut records, std::mem::take(&mut record));
            }
            c if c == delimiter => record.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(format!("{}번째 줄에서 닫히지 않은 따옴표", line));
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        finish_record(&mut records, record);
    }

    Ok(records)
}

fn finish_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    let blank = record.iter().all(|cell| cell.trim().is_empty());
    if !blank {
        records.push(record);
    }
}
