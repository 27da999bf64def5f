//! CSV data tables.
//!
//! Supports the subset of RFC 4180 that spreadsheet exports produce: a header
//! row, comma separators, double-quoted fields with `""` escapes and embedded
//! newlines, and either LF or CRLF line endings.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Number, Value};

use crate::ChartError;

/// A parsed CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Reads and parses a CSV file.
    pub fn read(path: &Path) -> Result<Self, ChartError> {
        let text = fs::read_to_string(path).map_err(|e| ChartError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&text).map_err(|reason| ChartError::Csv {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parses CSV text. The first record is the header.
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut records = parse_records(text)?.into_iter();
        let Some(headers) = records.next() else {
            return Err("file is empty".to_string());
        };
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();

        let mut rows = Vec::new();
        for (i, record) in records.enumerate() {
            if record.len() == 1 && record[0].is_empty() {
                continue;
            }
            if record.len() != headers.len() {
                return Err(format!(
                    "row {} has {} fields, expected {}",
                    i + 2,
                    record.len(),
                    headers.len()
                ));
            }
            rows.push(record);
        }

        Ok(Self { headers, rows })
    }

    /// Index of a column by header name.
    pub fn column_index(&self, name: &str) -> Result<usize, ChartError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ChartError::MissingColumn {
                column: name.to_string(),
                available: self.headers.clone(),
            })
    }

    /// Raw cells of a column.
    pub fn column(&self, name: &str) -> Result<Vec<&str>, ChartError> {
        let index = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    /// Cells of a column as JSON values (numbers where they parse).
    pub fn values(&self, name: &str) -> Result<Vec<Value>, ChartError> {
        Ok(self.column(name)?.into_iter().map(cell_value).collect())
    }

    /// Cells of a column as numbers. Empty cells are skipped as `None`.
    pub fn numbers(&self, name: &str) -> Result<Vec<Option<f64>>, ChartError> {
        self.column(name)?
            .into_iter()
            .map(|cell| {
                let cell = cell.trim();
                if cell.is_empty() {
                    return Ok(None);
                }
                cell.parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .map(Some)
                    .ok_or_else(|| ChartError::NotNumeric {
                        column: name.to_string(),
                        value: cell.to_string(),
                    })
            })
            .collect()
    }

    /// Splits the rows by the distinct values of `column`, in order of first
    /// appearance.
    pub fn group_by(&self, column: &str) -> Result<Vec<(String, Table)>, ChartError> {
        let index = self.column_index(column)?;
        let mut groups: Vec<(String, Table)> = Vec::new();

        for row in &self.rows {
            let key = row[index].clone();
            let group = match groups.iter().position(|(k, _)| *k == key) {
                Some(i) => &mut groups[i].1,
                None => {
                    groups.push((
                        key,
                        Table {
                            headers: self.headers.clone(),
                            rows: Vec::new(),
                        },
                    ));
                    let last = groups.len() - 1;
                    &mut groups[last].1
                }
            };
            group.rows.push(row.clone());
        }

        Ok(groups)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Converts a cell into a JSON number, `null` for blanks, or a string.
pub fn cell_value(cell: &str) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Number(i.into());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(cell.to_string()))
}

fn parse_records(text: &str) -> Result<Vec<Vec<String>>, String> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();
    let mut line = 1;

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
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                line += 1;
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(format!("unterminated quoted field at line {}", line));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}

/// Resolves the data file for a chart.
pub fn data_file(path: Option<&Path>) -> Result<PathBuf, ChartError> {
    path.map(Path::to_path_buf).ok_or(ChartError::NoData)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_parse_simple() {
        let table = Table::parse("year,north,south\n2023,10,12\n2024,11,15\n").unwrap();
        assert_eq!(table.headers, vec!["year", "north", "south"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("south").unwrap(), vec!["12", "15"]);
    }

    #[test]
    fn test_parse_quotes_and_crlf() {
        let text = "name,note\r\n\"Smith, J\",\"said \"\"hi\"\"\"\r\n\"multi\nline\",x\r\n";
        let table = Table::parse(text).unwrap();
        assert_eq!(
            table.rows,
            vec![
                vec!["Smith, J".to_string(), "said \"hi\"".to_string()],
                vec!["multi\nline".to_string(), "x".to_string()],
            ]
        );
    }

    #[test]
    fn test_parse_without_trailing_newline_and_blank_lines() {
        let table = Table::parse("a,b\n1,2\n\n3,4").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[rstest]
    #[case::empty("", "file is empty")]
    #[case::ragged("a,b\n1,2,3\n", "row 2 has 3 fields, expected 2")]
    #[case::unterminated("a,b\n\"1,2\n", "unterminated quoted field")]
    fn test_parse_errors(#[case] text: &str, #[case] expected: &str) {
        let err = Table::parse(text).unwrap_err();
        assert!(err.contains(expected), "'{}' should contain '{}'", err, expected);
    }

    #[test]
    fn test_missing_column() {
        let table = Table::parse("year,value\n2024,1\n").unwrap();
        let err = table.column("revenue").unwrap_err();
        assert!(matches!(err, ChartError::MissingColumn { .. }));
    }

    #[test]
    fn test_values_and_numbers() {
        let table = Table::parse("x,y\n2024,1.5\nQ2,\n").unwrap();
        assert_eq!(table.values("x").unwrap(), vec![json!(2024), json!("Q2")]);
        assert_eq!(table.values("y").unwrap(), vec![json!(1.5), Value::Null]);
        assert_eq!(table.numbers("y").unwrap(), vec![Some(1.5), None]);
        assert!(matches!(
            table.numbers("x").unwrap_err(),
            ChartError::NotNumeric { .. }
        ));
    }

    #[test]
    fn test_group_by_keeps_first_appearance_order() {
        let table = Table::parse("region,v\nsouth,1\nnorth,2\nsouth,3\n").unwrap();
        let groups = table.group_by("region").unwrap();
        let keys: Vec<_> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["south", "north"]);
        assert_eq!(groups[0].1.column("v").unwrap(), vec!["1", "3"]);
    }
}
