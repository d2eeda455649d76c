//! Parser for the cutoff table CSV export.
//!
//! The first line is a header; columns are matched by name so the export
//! may order them freely. Rows are parsed in parallel once the header is
//! known.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 10] = [
    "year",
    "round",
    "institute_type",
    "institute_name",
    "branch",
    "quota",
    "category",
    "gender",
    "opening_rank",
    "closing_rank",
];

const PWD_COLUMN: &str = "is_pwd";

/// Column positions resolved from the header row
#[derive(Debug)]
struct Header {
    positions: HashMap<&'static str, usize>,
    width: usize,
}

impl Header {
    fn parse(line: &str, line_no: usize, file: &str) -> Result<Self> {
        let names: Vec<String> = split_csv_line(line)
            .map_err(|reason| DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason,
            })?
            .into_iter()
            .map(|name| name.trim().trim_start_matches('\u{feff}').to_lowercase())
            .collect();

        let mut positions = HashMap::new();
        for column in REQUIRED_COLUMNS {
            let pos = names.iter().position(|name| name == column).ok_or_else(|| {
                DataLoadError::MissingColumn {
                    file: file.to_string(),
                    column: column.to_string(),
                }
            })?;
            positions.insert(column, pos);
        }
        if let Some(pos) = names.iter().position(|name| name == PWD_COLUMN) {
            positions.insert(PWD_COLUMN, pos);
        }

        Ok(Self {
            positions,
            width: names.len(),
        })
    }

    fn field<'a>(&self, fields: &'a [String], column: &str) -> Option<&'a str> {
        self.positions
            .get(column)
            .and_then(|&pos| fields.get(pos))
            .map(|s| s.trim())
    }
}

/// Parse a cutoff table from disk
pub fn parse_cutoffs(path: &Path) -> Result<Vec<CutoffRecord>> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    parse_cutoffs_str(&content, &file)
}

/// Parse a cutoff table already held in memory
///
/// `file` is only used for error messages.
pub fn parse_cutoffs_str(content: &str, file: &str) -> Result<Vec<CutoffRecord>> {
    let mut lines = content.lines().enumerate();

    let (header_idx, header_line) = lines
        .by_ref()
        .find(|(_, line)| !line.trim().is_empty())
        .ok_or_else(|| DataLoadError::EmptyFile {
            file: file.to_string(),
        })?;
    let header = Header::parse(header_line, header_idx + 1, file)?;

    let rows: Vec<(usize, &str)> = lines
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line))
        .collect();

    rows.par_iter()
        .map(|&(line_no, line)| parse_row(&header, line, line_no, file))
        .collect()
}

fn parse_row(header: &Header, line: &str, line_no: usize, file: &str) -> Result<CutoffRecord> {
    let parse_error = |reason: String| DataLoadError::ParseError {
        file: file.to_string(),
        line: line_no,
        reason,
    };

    let fields = split_csv_line(line).map_err(parse_error)?;
    if fields.len() != header.width {
        return Err(DataLoadError::FieldCountMismatch {
            expected: header.width,
            found: fields.len(),
            line: line_no,
        });
    }

    let text = |column: &str| -> Result<String> {
        let value = header.field(&fields, column).unwrap_or_default();
        if value.is_empty() {
            return Err(parse_error(format!("Missing {}", column)));
        }
        Ok(value.to_string())
    };

    let year = text("year")?;
    let round = text("round")?;
    let opening_rank = text("opening_rank")?;
    let closing_rank = text("closing_rank")?;

    Ok(CutoffRecord {
        year: parse_integral(&year)
            .and_then(|v| Year::try_from(v).ok())
            .ok_or_else(|| parse_error(format!("Invalid year: {}", year)))?,
        round: parse_integral(&round)
            .and_then(|v| Round::try_from(v).ok())
            .ok_or_else(|| parse_error(format!("Invalid round: {}", round)))?,
        institute_type: text(Column::InstituteType.header())?,
        institute_name: text(Column::InstituteName.header())?,
        branch: text(Column::Branch.header())?,
        quota: text(Column::Quota.header())?,
        category: text(Column::Category.header())?,
        gender: text(Column::Gender.header())?,
        is_pwd: match header.field(&fields, PWD_COLUMN) {
            Some(value) => parse_flag(value)
                .ok_or_else(|| parse_error(format!("Invalid {}: {}", PWD_COLUMN, value)))?,
            None => false,
        },
        opening_rank: parse_rank(&opening_rank)
            .ok_or_else(|| parse_error(format!("Invalid opening_rank: {}", opening_rank)))?,
        closing_rank: parse_rank(&closing_rank)
            .ok_or_else(|| parse_error(format!("Invalid closing_rank: {}", closing_rank)))?,
    })
}

/// Split one CSV line into fields
///
/// Supports double-quoted fields containing commas, and `""` as an escaped
/// quote inside a quoted field.
pub(crate) fn split_csv_line(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err("Unterminated quoted field".to_string());
    }
    fields.push(current);
    Ok(fields)
}

/// Parse an integer that may have been exported as a float (`2023.0`)
fn parse_integral(s: &str) -> Option<u64> {
    if let Ok(value) = s.parse::<u64>() {
        return Some(value);
    }
    let value = s.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Some(value as u64)
    } else {
        None
    }
}

/// Parse a rank cell
///
/// Example: "1234" -> Some(1234)
///          "1234.0" -> Some(1234)
///          "1234P" -> Some(1234)  (preparatory course rank list)
fn parse_rank(s: &str) -> Option<Rank> {
    let digits = s.strip_suffix(['P', 'p']).unwrap_or(s).trim();
    parse_integral(digits).and_then(|v| Rank::try_from(v).ok())
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "" | "0" | "0.0" | "false" | "no" | "n" => Some(false),
        "1" | "1.0" | "true" | "yes" | "y" => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "year,round,institute_type,institute_name,branch,quota,category,gender,is_pwd,opening_rank,closing_rank";

    #[test]
    fn test_split_quoted_fields() {
        let fields = split_csv_line(r#"2023,"NIT, Trichy","He said ""hi""",x"#).unwrap();
        assert_eq!(fields, vec!["2023", "NIT, Trichy", r#"He said "hi""#, "x"]);

        assert!(split_csv_line(r#"2023,"open"#).is_err());
    }

    #[test]
    fn test_parse_rank() {
        assert_eq!(parse_rank("1234"), Some(1234));
        assert_eq!(parse_rank("1234.0"), Some(1234));
        assert_eq!(parse_rank("56P"), Some(56));
        assert_eq!(parse_rank("12.5"), None);
        assert_eq!(parse_rank("abc"), None);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_parse_rows() {
        let content = format!(
            "{HEADER}\n\
             2023,6,IIT,\"Indian Institute of Technology Bombay\",Computer Science and Engineering,AI,OPEN,Gender-Neutral,0,1,67\n\
             \n\
             2023,6,NIT,\"National Institute of Technology, Tiruchirappalli\",Civil Engineering,OS,OBC-NCL,Female-only (including Supernumerary),1,120P,450\n"
        );

        let records = parse_cutoffs_str(&content, "cutoffs.csv").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].closing_rank, 67);
        assert!(!records[0].is_pwd);
        assert_eq!(
            records[1].institute_name,
            "National Institute of Technology, Tiruchirappalli"
        );
        assert!(records[1].is_pwd);
        assert_eq!(records[1].opening_rank, 120);
    }

    #[test]
    fn test_header_order_is_free_and_pwd_optional() {
        let content = "closing_rank,opening_rank,gender,category,quota,branch,institute_name,institute_type,round,year\n\
                       500,100,Gender-Neutral,OPEN,AI,Mechanical Engineering,IIT Delhi,IIT,1,2022\n";

        let records = parse_cutoffs_str(content, "cutoffs.csv").unwrap();
        assert_eq!(records[0].year, 2022);
        assert_eq!(records[0].opening_rank, 100);
        assert_eq!(records[0].closing_rank, 500);
        assert!(!records[0].is_pwd);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let content = "year,round,institute_name\n2023,1,IIT Delhi\n";
        let err = parse_cutoffs_str(content, "cutoffs.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn { ref column, .. } if column == "institute_type"));
    }

    #[test]
    fn test_bad_row_reports_line() {
        let content = format!("{HEADER}\n2023,1,IIT,IIT Delhi,CSE,AI,OPEN,Gender-Neutral,0,abc,100\n");
        let err = parse_cutoffs_str(&content, "cutoffs.csv").unwrap_err();
        match err {
            DataLoadError::ParseError { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("opening_rank"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_field_count_mismatch() {
        let content = format!("{HEADER}\n2023,1,IIT\n");
        let err = parse_cutoffs_str(&content, "cutoffs.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::FieldCountMismatch { expected: 11, found: 3, line: 2 }));
    }

    #[test]
    fn test_header_after_blank_lines_reports_its_line() {
        let content = "\n\nyear,\"round\n2023,1\n";
        let err = parse_cutoffs_str(content, "cutoffs.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { line: 3, .. }), "{err}");
    }

    #[test]
    fn test_bad_pwd_flag_reports_file_and_line() {
        let content = format!(
            "{HEADER}\n\
             2023,1,IIT,IIT Delhi,CSE,AI,OPEN,Gender-Neutral,0,10,100\n\
             2023,1,IIT,IIT Delhi,CSE,AI,OPEN,Gender-Neutral,maybe,10,100\n"
        );
        let err = parse_cutoffs_str(&content, "cutoffs.csv").unwrap_err();
        match err {
            DataLoadError::ParseError { file, line, reason } => {
                assert_eq!(file, "cutoffs.csv");
                assert_eq!(line, 3);
                assert!(reason.contains("is_pwd"));
                assert!(reason.contains("maybe"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_file() {
        let err = parse_cutoffs_str("\n\n", "cutoffs.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::EmptyFile { .. }));
    }
}
