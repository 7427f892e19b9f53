//! File-based chart output.
//!
//! `FileChartSink` writes each chart twice: a JSON document holding the
//! kind and the raw table, and a self-contained HTML page that renders
//! the table with Plotly from a CDN. The JSON is the machine-readable
//! artifact; the HTML is for humans.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::interfaces::{ChartError, ChartKind, ChartSink, ChartTable, SavedChart};

/// Chart document persisted alongside the HTML page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredChart {
    pub kind: ChartKind,
    pub table: ChartTable,
}

/// Chart sink writing to a local directory.
pub struct FileChartSink {
    dir: PathBuf,
}

/// Chart names become file names; anything outside this set is rejected
/// rather than escaped.
fn validate_name(name: &str) -> Result<(), ChartError> {
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ChartError::InvalidName(name.to_string()));
    }
    Ok(())
}

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

// Builds a single trace from the embedded table: first column on the x
// axis, second column (when present) on the y axis.
const RENDER_SCRIPT: &str = r#"
const xs = DATA.table.rows.map(r => r[0]);
const ys = DATA.table.rows.map(r => r[1]);
let trace;
switch (DATA.kind) {
  case "pie":
    trace = { type: "pie", labels: xs, values: ys };
    break;
  case "histogram":
    trace = { type: "histogram", x: xs };
    break;
  case "line":
    trace = { type: "scatter", mode: "lines+markers", x: xs, y: ys };
    break;
  case "scatter":
    trace = { type: "scatter", mode: "markers", x: xs, y: ys };
    break;
  default:
    trace = { type: "bar", x: xs, y: ys };
}
const layout = { title: { text: document.title } };
Plotly.newPlot("chart", [trace], layout);
"#;

impl FileChartSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn json_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Path of the HTML page for a chart name.
    pub fn html_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.html"))
    }

    /// Names of all saved charts, sorted.
    pub fn list(&self) -> Result<Vec<String>, ChartError> {
        let mut names = Vec::new();
        if !self.dir.exists() {
            return Ok(names);
        }
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Load a previously saved chart document.
    pub fn load(&self, name: &str) -> Result<StoredChart, ChartError> {
        validate_name(name)?;
        let path = self.json_path(name);
        if !path.exists() {
            return Err(ChartError::NotFound(name.to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn render_html(name: &str, chart: &StoredChart) -> Result<String, ChartError> {
        let data = serde_json::to_string(chart)?;
        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{name}</title>\n\
             <script src=\"{PLOTLY_CDN}\"></script>\n</head>\n<body>\n\
             <div id=\"chart\"></div>\n<script>\nconst DATA = {data};\n{RENDER_SCRIPT}\n</script>\n\
             </body>\n</html>\n"
        ))
    }
}

/// Fixed-width text rendering of a chart table, for terminal preview.
pub fn ascii_preview(chart: &StoredChart) -> String {
    let table = &chart.table;
    let mut out = String::new();

    if table.is_empty() {
        out.push_str("(no rows)\n");
        return out;
    }

    // Bars scale against the largest value in the second column.
    let max = table
        .rows
        .iter()
        .filter_map(|r| r.get(1).and_then(serde_json::Value::as_f64))
        .fold(0.0f64, f64::max);

    for row in &table.rows {
        let label = row
            .first()
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_default();
        let value = row.get(1).and_then(serde_json::Value::as_f64);

        match value {
            Some(v) if max > 0.0 => {
                let width = ((v / max) * 40.0).round() as usize;
                out.push_str(&format!("{label:>20} | {} {v}\n", "#".repeat(width)));
            }
            Some(v) => {
                out.push_str(&format!("{label:>20} | {v}\n"));
            }
            None => {
                out.push_str(&format!("{label:>20} |\n"));
            }
        }
    }
    out
}

#[async_trait]
impl ChartSink for FileChartSink {
    async fn save(
        &self,
        name: &str,
        kind: ChartKind,
        table: &ChartTable,
    ) -> Result<SavedChart, ChartError> {
        validate_name(name)?;
        std::fs::create_dir_all(&self.dir)?;

        let chart = StoredChart {
            kind,
            table: table.clone(),
        };

        let json_path = self.json_path(name);
        std::fs::write(&json_path, serde_json::to_string_pretty(&chart)?)?;

        let html_path = self.html_path(name);
        std::fs::write(&html_path, Self::render_html(name, &chart)?)?;

        Ok(SavedChart {
            name: name.to_string(),
            html_path,
            json_path,
        })
    }
}
