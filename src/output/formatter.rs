//! Output formatting for aggregation results
//!
//! Results are emitted as one `<key><separator><statistic>` line per key.

use crate::runtime::{Row, RunReport};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::io::{self, Write};
use std::str::FromStr;

/// Separator between key and statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Separator {
    #[default]
    Tab,
    Space,
}

impl Separator {
    fn as_str(&self) -> &'static str {
        match self {
            Separator::Tab => "\t",
            Separator::Space => " ",
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Separator::Tab => write!(f, "tab"),
            Separator::Space => write!(f, "space"),
        }
    }
}

impl FromStr for Separator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tab" => Ok(Separator::Tab),
            "space" => Ok(Separator::Space),
            other => Err(format!("unknown separator '{other}' (expected 'tab' or 'space')")),
        }
    }
}

/// Renders result rows as key/value text lines.
pub struct OutputFormatter {
    separator: Separator,
}

impl OutputFormatter {
    pub fn new(separator: Separator) -> Self {
        Self { separator }
    }

    /// Render a single row without the trailing newline.
    pub fn format_row(&self, row: &Row) -> String {
        format!("{}{}{}", row.key, self.separator.as_str(), row.value)
    }

    /// Render all rows, one per line.
    pub fn format(&self, rows: &[Row]) -> String {
        let mut output = String::new();
        for row in rows {
            // Writing into a String cannot fail
            let _ = writeln!(&mut output, "{}", self.format_row(row));
        }
        output
    }

    /// Stream all rows to `writer`.
    pub fn write_rows<W: Write>(&self, writer: &mut W, rows: &[Row]) -> io::Result<()> {
        for row in rows {
            writeln!(writer, "{}", self.format_row(row))?;
        }
        writer.flush()
    }

    /// One-line human readable summary of a run.
    pub fn summary(report: &RunReport) -> String {
        format!(
            "{} job: {} records, {} skipped, {} keys across {} partition(s)",
            report.job,
            report.records,
            report.skipped,
            report.rows.len(),
            report.partitions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregation::{JobKind, Statistic};

    fn rows() -> Vec<Row> {
        vec![
            Row {
                key: "sensorA 14:05".to_string(),
                value: Statistic::Count(3),
            },
            Row {
                key: "sensorB 14:06".to_string(),
                value: Statistic::Count(1),
            },
        ]
    }

    #[test]
    fn test_tab_format() {
        let formatter = OutputFormatter::new(Separator::Tab);
        assert_eq!(
            formatter.format(&rows()),
            "sensorA 14:05\t3\nsensorB 14:06\t1\n"
        );
    }

    #[test]
    fn test_space_format_with_mean() {
        let formatter = OutputFormatter::new(Separator::Space);
        let row = Row {
            key: "14:05".to_string(),
            value: Statistic::Mean(25.0),
        };
        assert_eq!(formatter.format_row(&row), "14:05 25.0");
    }

    #[test]
    fn test_write_rows_matches_format() {
        let formatter = OutputFormatter::new(Separator::Tab);
        let mut buffer = Vec::new();
        formatter.write_rows(&mut buffer, &rows()).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), formatter.format(&rows()));
    }

    #[test]
    fn test_empty_rows() {
        let formatter = OutputFormatter::new(Separator::Tab);
        assert_eq!(formatter.format(&[]), "");
    }

    #[test]
    fn test_summary() {
        let report = RunReport {
            job: JobKind::Count,
            rows: rows(),
            records: 4,
            skipped: 1,
            partitions: 2,
        };
        assert_eq!(
            OutputFormatter::summary(&report),
            "count job: 4 records, 1 skipped, 2 keys across 2 partition(s)"
        );
    }

    #[test]
    fn test_separator_parse() {
        assert_eq!("TAB".parse::<Separator>().unwrap(), Separator::Tab);
        assert_eq!("space".parse::<Separator>().unwrap(), Separator::Space);
        assert!(",".parse::<Separator>().is_err());
    }
}
