//! # 출석 데이터 내보내기 유틸리티
//!
//! 형식이 제각각인 출석 데이터를 고정된 8개 필드의 레코드로 정규화하고
//! CSV로 렌더링합니다.
//!
//! ## 입력 형식
//!
//! ```text
//! {"studentName": "Ada", "Course Code": "CS101", ...}          ← JSON 객체 (키 이름 자유)
//! {"student": {"name": "Ada"}, "session": {"title": "W1"}}     ← 중첩 객체
//! "{\"name\":\"Ada\",\"status\":\"late\"}"                       ← JSON 문자열
//! "{name: Ada, email: ada@x.com, status: present}"             ← 깨진 JSON (key: value)
//! "Ada,S1,ada@x.com,CS101,Week 1,2024-03-04,09:05,Present"     ← 구분자 문자열 (, ; | 탭)
//! ```
//!
//! ## 출력
//!
//! 입력 원소 하나당 [`ExportRecord`] 하나. 복구된 필드가 3개 미만이면
//! `student_name`과 `status`가 `"Error"`, 나머지가 `"N/A"`인 레코드가 됩니다.
//! 어떤 입력에도 패닉하지 않습니다.

use std::collections::BTreeMap;
use chrono::{DateTime as ChronoDateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 내보내기 레코드의 필드 순서 (CSV 헤더 및 구분자 문자열의 위치 매핑)
pub const CANONICAL_FIELDS: [&str; 8] = [
    "student_name",
    "student_id",
    "email",
    "course",
    "session",
    "date",
    "time",
    "status",
];

/// 값이 없는 필드
pub const MISSING_VALUE: &str = "N/A";
/// 복구 실패 레코드 표시
pub const ERROR_VALUE: &str = "Error";
/// 이보다 적은 필드가 복구되면 실패 레코드로 처리
pub const MIN_RECOVERED_FIELDS: usize = 3;

const MAX_NESTING_DEPTH: usize = 3;
const DELIMITERS: [char; 4] = [',', ';', '|', '\t'];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub student_name: String,
    pub student_id: String,
    pub email: String,
    pub course: String,
    pub session: String,
    pub date: String,
    pub time: String,
    pub status: String,
}

impl ExportRecord {
    /// 복구에 실패한 입력을 나타내는 레코드
    pub fn placeholder() -> Self {
        Self {
            student_name: ERROR_VALUE.to_string(),
            student_id: MISSING_VALUE.to_string(),
            email: MISSING_VALUE.to_string(),
            course: MISSING_VALUE.to_string(),
            session: MISSING_VALUE.to_string(),
            date: MISSING_VALUE.to_string(),
            time: MISSING_VALUE.to_string(),
            status: ERROR_VALUE.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }

    /// `CANONICAL_FIELDS` 순서의 값
    pub fn values(&self) -> [&str; 8] {
        [
            &self.student_name,
            &self.student_id,
            &self.email,
            &self.course,
            &self.session,
            &self.date,
            &self.time,
            &self.status,
        ]
    }

    fn from_fields(mut fields: BTreeMap<&'static str, String>) -> Self {
        let mut take = |key: &str| fields.remove(key).unwrap_or_else(|| MISSING_VALUE.to_string());

        Self {
            student_name: take("student_name"),
            student_id: take("student_id"),
            email: take("email"),
            course: take("course"),
            session: take("session"),
            date: take("date"),
            time: take("time"),
            status: take("status"),
        }
    }
}

/// 이질적인 출석 데이터 목록을 내보내기 레코드로 정규화합니다.
pub fn sanitize_export_data(items: &[Value]) -> Vec<ExportRecord> {
    items.iter().map(sanitize_item).collect()
}

fn sanitize_item(item: &Value) -> ExportRecord {
    let mut fields = extract_fields(item, 0);

    if fields.len() < MIN_RECOVERED_FIELDS {
        return ExportRecord::placeholder();
    }

    split_timestamp(&mut fields);

    if let Some(status) = fields.get_mut("status") {
        *status = title_case(status);
    }

    ExportRecord::from_fields(fields)
}

fn extract_fields(item: &Value, depth: usize) -> BTreeMap<&'static str, String> {
    match item {
        Value::Object(map) => fields_from_object(map),
        Value::String(raw) => fields_from_string(raw, depth),
        Value::Array(values) => fields_from_positions(values.iter().map(scalar_to_string)),
        _ => BTreeMap::new(),
    }
}

fn fields_from_object(map: &Map<String, Value>) -> BTreeMap<&'static str, String> {
    let mut fields = BTreeMap::new();
    collect_object(map, "", 0, &mut fields);
    fields
}

/// 중첩 객체는 부모 키를 접두어로 붙여 평탄화합니다. (`student.name` → `studentname`)
fn collect_object(
    map: &Map<String, Value>,
    prefix: &str,
    depth: usize,
    fields: &mut BTreeMap<&'static str, String>,
) {
    for (key, value) in map {
        let key = normalize_key(key);

        match value {
            Value::Object(nested) if depth < MAX_NESTING_DEPTH => {
                collect_object(nested, &format!("{}{}", prefix, key), depth + 1, fields);
            }
            _ => {
                let Some(text) = scalar_to_string(value) else { continue };
                let canonical = canonical_field(&format!("{}{}", prefix, key))
                    .or_else(|| if prefix.is_empty() { None } else { canonical_field(&key) });

                if let Some(canonical) = canonical {
                    fields.entry(canonical).or_insert(text);
                }
            }
        }
    }
}

fn fields_from_string(raw: &str, depth: usize) -> BTreeMap<&'static str, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return BTreeMap::new();
    }

    if let Ok(parsed) = serde_json::from_str::<Value>(raw) {
        match parsed {
            Value::Object(_) | Value::Array(_) => return extract_fields(&parsed, depth),
            Value::String(inner) if depth < MAX_NESTING_DEPTH => {
                return fields_from_string(&inner, depth + 1);
            }
            _ => {}
        }
    }

    // 두 해석 중 더 많은 필드를 복구한 쪽을 씁니다 (동률이면 key: value)
    let pairs = key_value_fields(raw);
    let positional = match dominant_delimiter(raw) {
        Some(delimiter) => fields_from_positions(raw.split(delimiter).map(clean_token)),
        None => fields_from_positions(std::iter::once(clean_token(raw))),
    };

    if pairs.len() >= positional.len() { pairs } else { positional }
}

/// `{name: Ada, status: late}` 형태에서 인식 가능한 키만 추출합니다.
fn key_value_fields(raw: &str) -> BTreeMap<&'static str, String> {
    let stripped: String = raw
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '"' | '\'' | '[' | ']'))
        .collect();

    let mut fields = BTreeMap::new();

    for pair in stripped.split(|c| matches!(c, ',' | ';' | '|' | '\n' | '\t')) {
        let Some((key, value)) = pair.split_once(|c| c == ':' || c == '=') else { continue };
        let Some(canonical) = canonical_field(&normalize_key(key)) else { continue };
        let Some(value) = clean_token(value) else { continue };

        fields.entry(canonical).or_insert(value);
    }

    fields
}

fn dominant_delimiter(raw: &str) -> Option<char> {
    DELIMITERS
        .iter()
        .map(|&d| (d, raw.matches(d).count()))
        .filter(|&(_, count)| count > 0)
        .max_by_key(|&(_, count)| count)
        .map(|(d, _)| d)
}

/// 값을 `CANONICAL_FIELDS` 순서대로 배치합니다. 빈 값은 건너뛰되 위치는 유지합니다.
fn fields_from_positions<I>(values: I) -> BTreeMap<&'static str, String>
where
    I: Iterator<Item = Option<String>>,
{
    CANONICAL_FIELDS
        .iter()
        .zip(values)
        .filter_map(|(field, value)| value.map(|v| (*field, v)))
        .collect()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => clean_token(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn clean_token(raw: &str) -> Option<String> {
    let cleaned = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();

    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("null") || cleaned.eq_ignore_ascii_case("undefined") {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// 대소문자와 구두점을 무시한 키 (`"Student-Name"` → `"studentname"`)
fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn canonical_field(normalized_key: &str) -> Option<&'static str> {
    let field = match normalized_key {
        "studentname" | "name" | "fullname" | "student" | "studentfullname" | "username" => "student_name",
        "studentid" | "studentnumber" | "studentno" | "matric" | "matricno" | "matricnumber"
        | "regno" | "registrationnumber" | "userid" => "student_id",
        "email" | "emailaddress" | "studentemail" | "mail" | "useremail" => "email",
        "course" | "coursecode" | "coursename" | "coursetitle" | "subject" | "class" | "classname" => "course",
        "session" | "sessiontitle" | "sessionname" | "lecture" | "lecturetitle" => "session",
        "date" | "attendancedate" | "sessiondate" | "markedat" | "timestamp" | "datetime" | "scannedat"
        | "createdat" | "sessionstartsat" | "day" => "date",
        "time" | "markedtime" | "checkintime" | "scantime" | "sessiontime" => "time",
        "status" | "attendancestatus" | "attendance" | "state" => "status",
        _ => return None,
    };

    Some(field)
}

/// `date`가 타임스탬프이면 날짜 부분만 남기고, `time`이 없을 때 시간 부분을 채웁니다.
fn split_timestamp(fields: &mut BTreeMap<&'static str, String>) {
    let Some(raw) = fields.get("date") else { return };
    let Some(timestamp) = parse_timestamp(raw) else { return };

    fields.insert("date", timestamp.format("%Y-%m-%d").to_string());
    fields
        .entry("time")
        .or_insert_with(|| timestamp.format("%H:%M:%S").to_string());
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 5] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];

    let raw = raw.trim();

    if let Ok(parsed) = ChronoDateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }

    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// `"under review"` → `"Under Review"`, `"LATE"` → `"Late"`
fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 레코드를 RFC 4180 CSV로 렌더링합니다. (헤더 포함, CRLF 줄바꿈)
pub fn to_csv(records: &[ExportRecord]) -> String {
    let mut out = CANONICAL_FIELDS.join(",");
    out.push_str("\r\n");

    for record in records {
        let row = record
            .values()
            .iter()
            .map(|value| escape_csv_field(value))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&row);
        out.push_str("\r\n");
    }

    out
}

fn escape_csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(sanitize_export_data(&[]).is_empty());
    }

    #[test]
    fn test_every_input_yields_one_record() {
        let items = vec![
            Value::Null,
            json!(42),
            json!(true),
            json!(""),
            json!([]),
            json!({}),
            json!("{{{{"),
            json!("::::"),
            json!("name: Ada, email: ada@example.com, status: present"),
        ];

        let records = sanitize_export_data(&items);
        assert_eq!(records.len(), items.len());
        assert!(records[..8].iter().all(ExportRecord::is_placeholder));
        assert!(!records[8].is_placeholder());
    }

    #[test]
    fn test_object_with_synonym_keys() {
        let items = vec![json!({
            "Student Name": "Ada Lovelace",
            "matric_no": "S1001",
            "E-mail": "ada@example.com",
            "courseCode": "CS101",
            "status": "present"
        })];

        let record = &sanitize_export_data(&items)[0];

        assert_eq!(record.student_name, "Ada Lovelace");
        assert_eq!(record.student_id, "S1001");
        assert_eq!(record.email, "ada@example.com");
        assert_eq!(record.course, "CS101");
        assert_eq!(record.status, "Present");
        assert_eq!(record.session, MISSING_VALUE);
        assert_eq!(record.date, MISSING_VALUE);
    }

    #[test]
    fn test_nested_objects_are_flattened() {
        let items = vec![json!({
            "student": { "name": "Grace", "email": "grace@example.com", "id": "S2002" },
            "session": { "title": "Week 2", "date": "2024-03-11T09:05:30Z" },
            "course": { "code": "MATH201", "title": "Linear Algebra" },
            "status": "LATE"
        })];

        let record = &sanitize_export_data(&items)[0];

        assert_eq!(record.student_name, "Grace");
        assert_eq!(record.student_id, "S2002");
        assert_eq!(record.email, "grace@example.com");
        assert_eq!(record.session, "Week 2");
        assert_eq!(record.course, "MATH201");
        assert_eq!(record.date, "2024-03-11");
        assert_eq!(record.time, "09:05:30");
        assert_eq!(record.status, "Late");
    }

    #[test]
    fn test_json_string_is_parsed() {
        let items = vec![json!(r#"{"name":"Alan","email":"alan@example.com","status":"absent"}"#)];
        let record = &sanitize_export_data(&items)[0];

        assert_eq!(record.student_name, "Alan");
        assert_eq!(record.status, "Absent");
    }

    #[test]
    fn test_malformed_json_key_value_string() {
        let items = vec![json!("{name: 'Alan Turing', email: alan@example.com, course: CS101, date: 2024-03-04 10:30}")];
        let record = &sanitize_export_data(&items)[0];

        assert_eq!(record.student_name, "Alan Turing");
        assert_eq!(record.email, "alan@example.com");
        assert_eq!(record.course, "CS101");
        assert_eq!(record.date, "2024-03-04");
        assert_eq!(record.time, "10:30:00");
        assert_eq!(record.status, MISSING_VALUE);
    }

    #[test]
    fn test_delimited_strings_use_dominant_delimiter() {
        let items = vec![
            json!("Ada,S1,ada@example.com,CS101,Week 1,2024-03-04,09:05,present"),
            json!("Grace;S2;grace@example.com;CS101"),
            json!("Alan|S3||CS101|Week 1"),
            json!("Edsger\tS4\tedsger@example.com"),
        ];

        let records = sanitize_export_data(&items);

        assert_eq!(records[0].student_name, "Ada");
        assert_eq!(records[0].time, "09:05");
        assert_eq!(records[0].status, "Present");

        assert_eq!(records[1].email, "grace@example.com");
        assert_eq!(records[1].course, "CS101");
        assert_eq!(records[1].session, MISSING_VALUE);

        assert_eq!(records[2].email, MISSING_VALUE);
        assert_eq!(records[2].session, "Week 1");

        assert_eq!(records[3].student_id, "S4");
    }

    #[test]
    fn test_delimited_cell_shaped_like_key_value_keeps_positions() {
        let items = vec![
            json!("Ada,S1,ada@example.com,CS101,Lecture: Recursion,2024-03-04,09:05,present"),
            json!("Grace;S2;grace@example.com;Class: A;Week 2"),
        ];

        let records = sanitize_export_data(&items);

        assert_eq!(records[0].student_name, "Ada");
        assert_eq!(records[0].student_id, "S1");
        assert_eq!(records[0].session, "Lecture: Recursion");
        assert_eq!(records[0].status, "Present");

        assert!(!records[1].is_placeholder());
        assert_eq!(records[1].course, "Class: A");
        assert_eq!(records[1].session, "Week 2");
    }

    #[test]
    fn test_fewer_than_three_fields_yields_placeholder() {
        let items = vec![
            json!({ "name": "Ada", "status": "Present" }),
            json!("Ada,S1"),
            json!({ "unrelated": "x", "other": "y", "more": "z" }),
        ];

        let records = sanitize_export_data(&items);

        for record in &records {
            assert!(record.is_placeholder());
            assert_eq!(record.student_name, "Error");
            assert_eq!(record.status, "Error");
            assert_eq!(record.course, "N/A");
        }
    }

    #[test]
    fn test_existing_time_is_not_overwritten() {
        let items = vec![json!({
            "name": "Ada",
            "date": "2024-03-04T09:05:00+09:00",
            "time": "09:00",
            "status": "excused"
        })];

        let record = &sanitize_export_data(&items)[0];
        assert_eq!(record.date, "2024-03-04");
        assert_eq!(record.time, "09:00");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("present"), "Present");
        assert_eq!(title_case("  under   REVIEW "), "Under Review");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_csv_quoting() {
        let mut record = ExportRecord::placeholder();
        record.student_name = "Lovelace, Ada".to_string();
        record.session = "Week \"1\"".to_string();
        record.course = "Line\nBreak".to_string();

        let csv = to_csv(&[record]);
        let mut lines = csv.split("\r\n");

        assert_eq!(lines.next().unwrap(), "student_name,student_id,email,course,session,date,time,status");
        assert!(csv.contains("\"Lovelace, Ada\",N/A,N/A,\"Line\nBreak\",\"Week \"\"1\"\"\",N/A,N/A,Error\r\n"));
    }

    #[test]
    fn test_csv_of_no_records_is_header_only() {
        assert_eq!(to_csv(&[]), "student_name,student_id,email,course,session,date,time,status\r\n");
    }
}
