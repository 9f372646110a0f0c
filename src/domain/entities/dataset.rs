//! Training Dataset
//!
//! `(day, price)` samples parsed from a CSV file with a header row. Columns are
//! located by name, so their order does not matter and extra columns are ignored.

use std::path::Path;

use crate::domain::errors::DatasetError;

pub const DAY_COLUMN: &str = "day";
pub const PRICE_COLUMN: &str = "price";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSample {
    pub day: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    samples: Vec<PriceSample>,
}

impl Dataset {
    pub fn new(samples: Vec<PriceSample>) -> Result<Self, DatasetError> {
        if samples.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(Dataset { samples })
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_str(&content)
    }

    pub fn from_csv_str(content: &str) -> Result<Self, DatasetError> {
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (_, header) = lines.next().ok_or(DatasetError::MissingHeader)?;
        let columns: Vec<&str> = header
            .split(',')
            .map(|c| c.trim().trim_matches('"'))
            .collect();

        let day_idx = column_index(&columns, DAY_COLUMN)?;
        let price_idx = column_index(&columns, PRICE_COLUMN)?;
        let required = day_idx.max(price_idx) + 1;

        let mut samples = Vec::new();
        for (line_no, line) in lines {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() < required {
                return Err(DatasetError::MalformedRow {
                    line: line_no,
                    expected: required,
                    found: fields.len(),
                });
            }

            samples.push(PriceSample {
                day: parse_field(fields[day_idx], line_no, DAY_COLUMN)?,
                price: parse_field(fields[price_idx], line_no, PRICE_COLUMN)?,
            });
        }

        Self::new(samples)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[PriceSample] {
        &self.samples
    }

    pub fn days(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.day).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.price).collect()
    }
}

fn column_index(columns: &[&str], name: &'static str) -> Result<usize, DatasetError> {
    columns
        .iter()
        .position(|c| *c == name)
        .ok_or(DatasetError::MissingColumn(name))
}

fn parse_field(raw: &str, line: usize, column: &'static str) -> Result<f64, DatasetError> {
    let raw = raw.trim_matches('"');
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(DatasetError::InvalidValue {
            line,
            column,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_csv() {
        let data = Dataset::from_csv_str("day,price\n1,100.5\n2,101.0\n3,102.25\n").unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.days(), vec![1.0, 2.0, 3.0]);
        assert_eq!(data.prices(), vec![100.5, 101.0, 102.25]);
    }

    #[test]
    fn test_columns_located_by_name() {
        let data =
            Dataset::from_csv_str("date,price,day\n2024-01-01,10.0,1\n2024-01-02,12.0,2\n").unwrap();
        assert_eq!(
            data.samples()[1],
            PriceSample {
                day: 2.0,
                price: 12.0
            }
        );
    }

    #[test]
    fn test_blank_lines_skipped() {
        let data = Dataset::from_csv_str("\nday,price\n\n1,5\n\n2,6\n").unwrap();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_missing_column() {
        let err = Dataset::from_csv_str("day,close\n1,2\n").unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn("price")));
    }

    #[test]
    fn test_invalid_value_reports_line() {
        let err = Dataset::from_csv_str("day,price\n1,2\n2,abc\n").unwrap_err();
        match err {
            DatasetError::InvalidValue {
                line,
                column,
                value,
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, "price");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_short_row() {
        let err = Dataset::from_csv_str("day,price\n1\n").unwrap_err();
        assert!(matches!(err, DatasetError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(matches!(
            Dataset::from_csv_str("day,price\n"),
            Err(DatasetError::Empty)
        ));
        assert!(matches!(
            Dataset::from_csv_str(""),
            Err(DatasetError::MissingHeader)
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Dataset::from_csv_path("/nonexistent/prices.csv").unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}
