//! Bulk athlete import from pasted or uploaded tabular text.
//!
//! Parsing is heuristic. Each line is split on the first delimiter found in
//! the order tab, comma, whitespace; the number of fields decides the column
//! mapping:
//!
//! | fields | columns                              |
//! |--------|--------------------------------------|
//! | 5+     | first, last, grade, level, gender    |
//! | 4      | first, last, grade, level            |
//! | 3      | first, last, grade                   |
//! | 2      | first, last                          |
//! | 1      | error row                            |
//!
//! A grade that is not an integer becomes `None`. Only a missing first or
//! last name rejects a row.

use serde::{Deserialize, Serialize};

use crate::athlete::{Athlete, Gender, Level, NewAthlete};
use crate::error::CoreError;
use crate::persistence::AthletePersistence;
use crate::types::DbId;

/// Error text for a line that does not yield a first and last name.
pub const MISSING_NAME_ERROR: &str = "needs first and last name";

const HEADER_KEYWORDS: [&str; 4] = ["first", "last", "name", "grade"];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Comma,
    Whitespace,
}

/// Level and gender applied when a row has no such column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ImportDefaults {
    pub level: Level,
    pub gender: Gender,
}

impl Default for ImportDefaults {
    fn default() -> Self {
        Self {
            level: Level::JV,
            gender: Gender::Boys,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedRow {
    /// 1-based line number in the raw input.
    pub line: usize,
    pub first_name: String,
    pub last_name: String,
    pub grade: Option<i32>,
    pub level: Level,
    pub gender: Gender,
    pub error: Option<String>,
}

impl ParsedRow {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// The athlete to create, or `None` for an error row.
    pub fn to_new_athlete(&self, team_id: DbId) -> Option<NewAthlete> {
        self.is_valid().then(|| NewAthlete {
            team_id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            grade: self.grade,
            level: self.level,
            gender: self.gender,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub created: Vec<Athlete>,
    pub failed: Vec<ImportFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportFailure {
    pub line: usize,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Line handling
// ---------------------------------------------------------------------------

pub fn detect_delimiter(line: &str) -> Delimiter {
    if line.contains('\t') {
        Delimiter::Tab
    } else if line.contains(',') {
        Delimiter::Comma
    } else {
        Delimiter::Whitespace
    }
}

/// Split a line into trimmed fields.
///
/// Tab and comma splits keep empty fields so column positions survive;
/// whitespace runs never produce empty fields.
pub fn split_fields(line: &str, delimiter: Delimiter) -> Vec<&str> {
    match delimiter {
        Delimiter::Tab => line.split('\t').map(str::trim).collect(),
        Delimiter::Comma => line.split(',').map(str::trim).collect(),
        Delimiter::Whitespace => line.split_whitespace().collect(),
    }
}

pub fn is_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    HEADER_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// `v…` is Varsity, anything else JV.
pub fn parse_level(s: &str) -> Level {
    if s.trim().to_lowercase().starts_with('v') {
        Level::Varsity
    } else {
        Level::JV
    }
}

/// `g…`, `f` and `female` are Girls, anything else Boys.
pub fn parse_gender(s: &str) -> Gender {
    let lower = s.trim().to_lowercase();
    if lower.starts_with('g') || lower == "f" || lower == "female" {
        Gender::Girls
    } else {
        Gender::Boys
    }
}

fn parse_grade(s: &str) -> Option<i32> {
    s.trim().parse().ok()
}

/// Map split fields to a row by field count.
pub fn map_fields(line: usize, fields: &[&str], defaults: &ImportDefaults) -> ParsedRow {
    let field = |i: usize| fields.get(i).copied().filter(|f| !f.is_empty());

    let first_name = field(0).unwrap_or_default().to_string();
    let last_name = if fields.len() >= 2 {
        field(1).unwrap_or_default().to_string()
    } else {
        String::new()
    };

    let error = (first_name.is_empty() || last_name.is_empty()).then(|| MISSING_NAME_ERROR.to_string());

    ParsedRow {
        line,
        first_name,
        last_name,
        grade: field(2).and_then(parse_grade),
        level: field(3).map_or(defaults.level, parse_level),
        gender: field(4).map_or(defaults.gender, parse_gender),
        error,
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

pub fn parse(raw: &str) -> Vec<ParsedRow> {
    parse_with(raw, &ImportDefaults::default())
}

pub fn parse_with(raw: &str, defaults: &ImportDefaults) -> Vec<ParsedRow> {
    let mut lines = raw
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .peekable();

    if lines.peek().is_some_and(|(_, first)| is_header(first)) {
        lines.next();
    }

    lines
        .map(|(number, line)| {
            let fields = split_fields(line, detect_delimiter(line));
            map_fields(number, &fields, defaults)
        })
        .collect()
}

pub fn valid_rows(rows: &[ParsedRow]) -> impl Iterator<Item = &ParsedRow> {
    rows.iter().filter(|r| r.is_valid())
}

/// Create the valid rows as athletes of `team_id`, one at a time.
///
/// Error rows are skipped. A failed insert is recorded and the rest still
/// run.
pub async fn submit(
    rows: &[ParsedRow],
    team_id: DbId,
    persistence: &dyn AthletePersistence,
) -> ImportReport {
    let mut report = ImportReport::default();

    for row in valid_rows(rows) {
        let Some(input) = row.to_new_athlete(team_id) else {
            continue;
        };
        match persistence.create_athlete(&input).await {
            Ok(athlete) => report.created.push(athlete),
            Err(e) => {
                tracing::warn!(team_id, line = row.line, error = %e, "Import row failed");
                report.failed.push(ImportFailure {
                    line: row.line,
                    message: client_message(&e),
                });
            }
        }
    }

    tracing::info!(
        team_id,
        created = report.created.len(),
        failed = report.failed.len(),
        "Athlete import finished"
    );
    report
}

fn client_message(err: &CoreError) -> String {
    match err {
        CoreError::Persistence(_) | CoreError::Internal(_) => "Could not save athlete".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;

    #[test]
    fn test_two_comma_lines_parse_fully() {
        let rows = parse("John, Smith, 10, JV, Boys\nJane, Doe, 11, Varsity, Girls");

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(ParsedRow::is_valid));
        assert_eq!(rows[0].first_name, "John");
        assert_eq!(rows[0].last_name, "Smith");
        assert_eq!(rows[0].grade, Some(10));
        assert_eq!(rows[0].level, Level::JV);
        assert_eq!(rows[0].gender, Gender::Boys);
        assert_eq!(rows[1].first_name, "Jane");
        assert_eq!(rows[1].last_name, "Doe");
        assert_eq!(rows[1].grade, Some(11));
        assert_eq!(rows[1].level, Level::Varsity);
        assert_eq!(rows[1].gender, Gender::Girls);
    }

    #[test]
    fn test_single_token_is_error_row() {
        let rows = parse("Madonna");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].first_name, "Madonna");
        assert_eq!(rows[0].error.as_deref(), Some(MISSING_NAME_ERROR));
    }

    #[test]
    fn test_header_line_dropped() {
        let rows = parse("First Name\tLast Name\tGrade\nAda\tLovelace\t12");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].first_name, "Ada");
        assert_eq!(rows[0].grade, Some(12));
        assert_eq!(rows[0].line, 2);
    }

    #[test]
    fn test_header_only_checked_on_first_line() {
        let rows = parse("Ada Lovelace\nGrace Lastname");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_blank_lines_skipped_but_numbered() {
        let rows = parse("\n  \nAda Lovelace\n\nAlan Turing 11\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 3);
        assert_eq!(rows[1].line, 5);
        assert_eq!(rows[1].grade, Some(11));
    }

    #[test]
    fn test_delimiter_priority() {
        assert_eq!(detect_delimiter("Smith, Jr.\tJohn"), Delimiter::Tab);
        assert_eq!(detect_delimiter("John Paul, Jones"), Delimiter::Comma);
        assert_eq!(detect_delimiter("John   Jones"), Delimiter::Whitespace);
    }

    #[test]
    fn test_split_fields_by_delimiter() {
        assert_eq!(split_fields("a\t b \t\tc", Delimiter::Tab), vec!["a", "b", "", "c"]);
        assert_eq!(split_fields("a , b,c", Delimiter::Comma), vec!["a", "b", "c"]);
        assert_eq!(split_fields("a   b\u{3000}c", Delimiter::Whitespace), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_comma_keeps_multiword_names() {
        let rows = parse("Mary Ann, Van Dyke, 9");
        assert_eq!(rows[0].first_name, "Mary Ann");
        assert_eq!(rows[0].last_name, "Van Dyke");
        assert_eq!(rows[0].grade, Some(9));
    }

    #[test]
    fn test_field_count_mapping() {
        let defaults = ImportDefaults::default();

        let four = map_fields(1, &["A", "B", "10", "varsity"], &defaults);
        assert_eq!(four.level, Level::Varsity);
        assert_eq!(four.gender, Gender::Boys);

        let three = map_fields(1, &["A", "B", "9"], &defaults);
        assert_eq!(three.grade, Some(9));
        assert_eq!(three.level, Level::JV);

        let two = map_fields(1, &["A", "B"], &defaults);
        assert!(two.is_valid());
        assert_eq!(two.grade, None);

        let six = map_fields(1, &["A", "B", "12", "V", "G", "extra"], &defaults);
        assert_eq!(six.level, Level::Varsity);
        assert_eq!(six.gender, Gender::Girls);
    }

    #[test]
    fn test_bad_grade_is_none_not_error() {
        let rows = parse("Ada, Lovelace, senior");
        assert!(rows[0].is_valid());
        assert_eq!(rows[0].grade, None);
    }

    #[test]
    fn test_empty_last_name_is_error() {
        let rows = parse("Ada,,10");
        assert_eq!(rows[0].error.as_deref(), Some(MISSING_NAME_ERROR));
    }

    #[test]
    fn test_gender_heuristic() {
        assert_eq!(parse_gender("Girls"), Gender::Girls);
        assert_eq!(parse_gender("g"), Gender::Girls);
        assert_eq!(parse_gender("F"), Gender::Girls);
        assert_eq!(parse_gender("female"), Gender::Girls);
        assert_eq!(parse_gender("Boys"), Gender::Boys);
        assert_eq!(parse_gender("M"), Gender::Boys);
        assert_eq!(parse_gender("femme"), Gender::Boys);
    }

    #[test]
    fn test_level_heuristic() {
        assert_eq!(parse_level("Varsity"), Level::Varsity);
        assert_eq!(parse_level("v"), Level::Varsity);
        assert_eq!(parse_level("JV"), Level::JV);
        assert_eq!(parse_level("junior"), Level::JV);
    }

    #[test]
    fn test_defaults_fill_missing_columns() {
        let defaults = ImportDefaults {
            level: Level::Varsity,
            gender: Gender::Girls,
        };
        let rows = parse_with("Ada Lovelace 12", &defaults);
        assert_eq!(rows[0].level, Level::Varsity);
        assert_eq!(rows[0].gender, Gender::Girls);
    }

    #[test]
    fn test_valid_rows_excludes_errors() {
        let rows = parse("Ada Lovelace\nCher\nAlan Turing");
        let names: Vec<_> = valid_rows(&rows).map(|r| r.first_name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Alan"]);
        assert!(rows[1].to_new_athlete(1).is_none());
    }

    #[tokio::test]
    async fn test_submit_creates_only_valid_rows() {
        let db = MemoryStore::default();
        let rows = parse("Ada Lovelace 12\nCher\nAlan Turing 11 V");

        let report = submit(&rows, 7, &db).await;

        assert_eq!(report.created.len(), 2);
        assert!(report.failed.is_empty());
        let athletes = db.athletes();
        assert_eq!(athletes.len(), 2);
        assert!(athletes.iter().all(|a| a.team_id == 7 && a.active));
        assert_eq!(athletes[1].level, Level::Varsity);
    }

    #[tokio::test]
    async fn test_submit_records_failures_and_continues() {
        let db = MemoryStore::default();
        let rows = parse("Ada Lovelace\nAlan Turing\nGrace Hopper");

        db.fail_next_creates(1);
        let report = submit(&rows, 7, &db).await;

        assert_eq!(report.created.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].line, 1);
        assert_eq!(report.failed[0].message, "Could not save athlete");
    }
}
