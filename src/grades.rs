// 🎓 Grades - student results from CSV lines into a text report
//
// Input lines are `id, full name, score` with no header row.
// The first bad line stops the run; nothing is written for a partial read.

use crate::error::{InputDefect, RecordError, RecordResult};
use crate::repository::Entity;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

const FIELDS_PER_LINE: usize = 3;

// ============================================================================
// STUDENT & GRADE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: i32) -> Self {
        match score {
            80..=i32::MAX => Grade::A,
            70..=79 => Grade::B,
            60..=69 => Grade::C,
            50..=59 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i32,
    pub full_name: String,
    pub score: i32,
}

impl Student {
    /// Scores live in 0..=100
    pub fn new(id: i32, full_name: &str, score: i32) -> RecordResult<Self> {
        if !(0..=100).contains(&score) {
            return Err(RecordError::invalid(
                "score",
                format!("{} is outside 0-100 for student {}", score, id),
            ));
        }
        Ok(Student {
            id,
            full_name: full_name.to_string(),
            score,
        })
    }

    pub fn grade(&self) -> Grade {
        Grade::from_score(self.score)
    }

    pub fn report_line(&self) -> String {
        format!(
            "{} (ID: {}): Score = {}, Grade = {}",
            self.full_name,
            self.id,
            self.score,
            self.grade()
        )
    }
}

impl Entity for Student {
    type Key = i32;

    fn id(&self) -> i32 {
        self.id
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Turn one CSV record into a student
///
/// `line` is 1-based and only used for error reporting.
pub fn parse_record(record: &StringRecord, line: usize) -> RecordResult<Student> {
    if record.len() != FIELDS_PER_LINE {
        return Err(RecordError::malformed(
            line,
            InputDefect::FieldCount {
                expected: FIELDS_PER_LINE,
                found: record.len(),
                raw: record.iter().collect::<Vec<_>>().join(","),
            },
        ));
    }

    let id = parse_number(&record[0], "ID", line)?;
    let full_name = &record[1];
    let score = parse_number(&record[2], "score", line)?;

    Student::new(id, full_name, score)
}

fn parse_number(value: &str, field: &str, line: usize) -> RecordResult<i32> {
    value.parse::<i32>().map_err(|_| {
        RecordError::malformed(
            line,
            InputDefect::NotANumber {
                field: field.to_string(),
                value: value.to_string(),
            },
        )
    })
}

/// Parse one physical line of input
///
/// Quoted fields follow CSV rules, so `1,"Smith, Ann",80` has three fields.
pub fn parse_line(text: &str, line: usize) -> Result<Student> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let record = match rdr.records().next() {
        Some(result) => result.with_context(|| format!("Failed to read CSV line {}", line))?,
        None => StringRecord::new(),
    };
    Ok(parse_record(&record, line)?)
}

/// Read students from any reader; blank lines are skipped but still counted
pub fn read_students_from_reader<R: Read>(reader: R) -> Result<Vec<Student>> {
    let mut students = Vec::new();

    for (index, text) in BufReader::new(reader).lines().enumerate() {
        let line = index + 1;
        let text = text.with_context(|| format!("Failed to read line {}", line))?;
        if text.trim().is_empty() {
            continue;
        }

        let student = parse_line(&text, line)?;
        debug!(id = student.id, line, "parsed student");
        students.push(student);
    }

    Ok(students)
}

pub fn read_students(input_path: &Path) -> Result<Vec<Student>> {
    let file = File::open(input_path)
        .with_context(|| format!("Failed to open input file: {}", input_path.display()))?;
    let students = read_students_from_reader(file)?;
    info!(count = students.len(), path = %input_path.display(), "loaded students");
    Ok(students)
}

// ============================================================================
// REPORT
// ============================================================================

pub fn write_report_to<W: Write>(students: &[Student], out: &mut W) -> Result<()> {
    for student in students {
        writeln!(out, "{}", student.report_line())?;
    }
    Ok(())
}

pub fn write_report(students: &[Student], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create report file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    write_report_to(students, &mut writer)?;
    writer.flush().context("Failed to flush report")?;
    info!(count = students.len(), path = %output_path.display(), "wrote report");
    Ok(())
}

/// Read `input_path`, grade everyone, write `output_path`
pub fn generate_report(input_path: &Path, output_path: &Path) -> Result<usize> {
    let students = read_students(input_path)?;
    write_report(&students, output_path)?;
    Ok(students.len())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn expect_record_error(result: Result<Vec<Student>>) -> RecordError {
        result
            .unwrap_err()
            .downcast::<RecordError>()
            .expect("should be a RecordError")
    }

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_score(100), Grade::A);
        assert_eq!(Grade::from_score(80), Grade::A);
        assert_eq!(Grade::from_score(79), Grade::B);
        assert_eq!(Grade::from_score(70), Grade::B);
        assert_eq!(Grade::from_score(69), Grade::C);
        assert_eq!(Grade::from_score(60), Grade::C);
        assert_eq!(Grade::from_score(59), Grade::D);
        assert_eq!(Grade::from_score(50), Grade::D);
        assert_eq!(Grade::from_score(49), Grade::F);
        assert_eq!(Grade::from_score(0), Grade::F);
    }

    #[test]
    fn test_report_line() {
        let student = Student::new(101, "Alice Smith", 84).unwrap();
        assert_eq!(
            student.report_line(),
            "Alice Smith (ID: 101): Score = 84, Grade = A"
        );
    }

    #[test]
    fn test_read_trims_and_skips_blank_lines() {
        let input = "101, Alice Smith , 84\n\n102,Bob Jones,67\n";
        let students = read_students_from_reader(input.as_bytes()).unwrap();

        assert_eq!(students.len(), 2);
        assert_eq!(students[0].full_name, "Alice Smith");
        assert_eq!(students[1].grade(), Grade::C);
    }

    #[test]
    fn test_missing_field_reports_line() {
        let input = "101,Alice Smith,84\n102,Bob Jones\n";
        let err = expect_record_error(read_students_from_reader(input.as_bytes()));

        match err {
            RecordError::MalformedInput { line, defect } => {
                assert_eq!(line, 2);
                assert!(matches!(
                    defect,
                    InputDefect::FieldCount { expected: 3, found: 2, .. }
                ));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_line_numbers_count_blank_lines() {
        let input = "1,A,80\n\n\n2,B\n";
        let err = expect_record_error(read_students_from_reader(input.as_bytes()));

        assert!(matches!(err, RecordError::MalformedInput { line: 4, .. }));
        assert_eq!(err.to_string(), "Line 4: expected 3 fields, found 2: \"2,B\"");
    }

    #[test]
    fn test_quoted_name_with_comma_is_one_field() {
        let input = "1,\"Smith, Ann\",80\n";
        let students = read_students_from_reader(input.as_bytes()).unwrap();

        assert_eq!(students.len(), 1);
        assert_eq!(students[0].full_name, "Smith, Ann");
        assert_eq!(students[0].grade(), Grade::A);
    }

    #[test]
    fn test_unquoted_extra_comma_rejected() {
        let err = expect_record_error(parse_line_result("1,Smith, Ann,80", 7));
        assert!(matches!(
            err,
            RecordError::MalformedInput {
                line: 7,
                defect: InputDefect::FieldCount { found: 4, .. },
            }
        ));
    }

    fn parse_line_result(text: &str, line: usize) -> Result<Vec<Student>> {
        parse_line(text, line).map(|student| vec![student])
    }

    #[test]
    fn test_crlf_line_endings() {
        let input = "1,Ann Lee,91\r\n2,Ben Ode,45\r\n";
        let students = read_students_from_reader(input.as_bytes()).unwrap();
        assert_eq!(students[1].score, 45);
    }

    #[test]
    fn test_extra_field_rejected() {
        let input = "101,Alice,Smith,84\n";
        let err = expect_record_error(read_students_from_reader(input.as_bytes()));
        assert!(matches!(
            err,
            RecordError::MalformedInput {
                defect: InputDefect::FieldCount { found: 4, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_non_numeric_score_rejected() {
        let input = "101,Alice Smith,eighty\n";
        let err = expect_record_error(read_students_from_reader(input.as_bytes()));
        assert_eq!(
            err.to_string(),
            "Line 1: invalid score format: \"eighty\""
        );
    }

    #[test]
    fn test_non_numeric_id_rejected() {
        let input = "A1,Alice Smith,80\n";
        let err = expect_record_error(read_students_from_reader(input.as_bytes()));
        assert!(matches!(
            err,
            RecordError::MalformedInput {
                defect: InputDefect::NotANumber { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_out_of_range_score_rejected() {
        let input = "101,Alice Smith,105\n";
        let err = expect_record_error(read_students_from_reader(input.as_bytes()));
        assert!(matches!(err, RecordError::InvalidValue { .. }));
    }

    #[test]
    fn test_missing_input_file_is_io_not_found() {
        let dir = tempdir().unwrap();
        let err = read_students(&dir.path().join("nope.txt")).unwrap_err();
        let io = err.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_generate_report_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("students.txt");
        let output = dir.path().join("report.txt");
        std::fs::write(&input, "1,Ann Lee,91\n2,Ben Ode,45\n").unwrap();

        let count = generate_report(&input, &output).unwrap();

        assert_eq!(count, 2);
        let report = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            report,
            "Ann Lee (ID: 1): Score = 91, Grade = A\nBen Ode (ID: 2): Score = 45, Grade = F\n"
        );
    }

    #[test]
    fn test_bad_input_writes_no_report() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("students.txt");
        let output = dir.path().join("report.txt");
        std::fs::write(&input, "1,Ann Lee,91\n2,Ben Ode\n").unwrap();

        assert!(generate_report(&input, &output).is_err());
        assert!(!output.exists());
    }
}
