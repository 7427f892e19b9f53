//! Chart output interface.
//!
//! Chart rendering is delegated to an external library; the core hands a
//! named table and a type hint to an injected sink and gets file paths
//! back. Keeping this behind a trait leaves the data core free of
//! filesystem dependencies.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::InvalidEnumValue;

/// Errors from chart persistence.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("invalid chart name '{0}': use letters, digits and underscores")]
    InvalidName(String),

    #[error("chart '{0}' not found")]
    NotFound(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Hint for how the sink should render the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Scatter,
    Histogram,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
            ChartKind::Scatter => "scatter",
            ChartKind::Histogram => "histogram",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            "pie" => Ok(ChartKind::Pie),
            "scatter" => Ok(ChartKind::Scatter),
            "histogram" => Ok(ChartKind::Histogram),
            _ => Err(InvalidEnumValue {
                field: "chart kind",
                value: s.to_string(),
                expected: "bar, line, pie, scatter, histogram",
            }),
        }
    }
}

/// Tabular query results to be charted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl ChartTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Paths of the files written for one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedChart {
    pub name: String,
    pub html_path: PathBuf,
    pub json_path: PathBuf,
}

/// Writes charts somewhere a human can see them.
#[async_trait]
pub trait ChartSink: Send + Sync {
    async fn save(
        &self,
        name: &str,
        kind: ChartKind,
        table: &ChartTable,
    ) -> Result<SavedChart, ChartError>;
}
