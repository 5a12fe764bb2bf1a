//! Parsing of the `order.schema.table.json` file naming convention.

use std::fmt;

use crate::error::{Error, invalid_filename};

const MIN_SEGMENTS: usize = 4;

/// The metadata encoded in a source file's name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileName {
    order: i64,
    schema: String,
    table: String,
}

impl FileName {
    pub fn new(order: i64, schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            order,
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// Splits `filename` on `.` into order, schema and table. Everything past the third segment is
    /// ignored, but at least one such segment (the extension) must be present.
    pub fn parse(filename: &str) -> Result<Self, Error> {
        let segments: Vec<&str> = filename.split('.').collect();
        if segments.len() < MIN_SEGMENTS {
            return Err(invalid_filename(
                filename,
                format!(
                    "expected at least {MIN_SEGMENTS} dot-separated segments, found {}",
                    segments.len()
                ),
            ));
        }

        let order = segments[0].parse::<i64>().map_err(|_| {
            invalid_filename(
                filename,
                format!("order segment '{}' is not an integer", segments[0]),
            )
        })?;

        Ok(Self::new(order, segments[1], segments[2]))
    }

    pub fn order(&self) -> i64 {
        self.order
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Canonical `<order>-<schema>-<table>` label, used in logs and progress output.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.order, self.schema, self.table)
    }
}
