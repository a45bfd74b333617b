use serde::{Deserialize, Serialize};

/// One proposed textual edit. `original` is expected to be a verbatim
/// fragment of the submitted case text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSuggestion {
    pub category: String,
    pub original: String,
    pub replacement: String,
    pub explanation: String,
}

/// A table whose data is literally present in the case text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    /// Rows as tab-separated lines, ready to paste into a spreadsheet.
    pub fn to_tsv(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table the case text does not contain but a reviewer would expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableIdea {
    pub title: String,
    /// Wire name is `rational`; kept verbatim.
    pub rational: String,
    pub suggested_columns: Vec<String>,
}

/// Structured editorial review returned by one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorAnalysis {
    pub score: f64,
    pub score_explanation: String,
    pub style_suggestions: Vec<StyleSuggestion>,
    pub improved_text: String,
    pub tables: Vec<TableData>,
    pub table_ideas: Vec<TableIdea>,
    pub discussion_points: Vec<String>,
}

/// Non-fatal shape observations about a returned analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    /// A table row whose cell count differs from the header count.
    RaggedRow {
        table: usize,
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A suggestion whose `original` fragment is not in the submitted text.
    FragmentNotFound { suggestion: usize },
    ScoreOutOfRange { score: f64 },
}

impl std::fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RaggedRow { table, row, expected, found } => write!(
                f,
                "table {table} row {row} has {found} cells, header declares {expected}"
            ),
            Self::FragmentNotFound { suggestion } => {
                write!(f, "suggestion {suggestion} quotes text not present in the case")
            }
            Self::ScoreOutOfRange { score } => write!(f, "score {score} outside 0..=100"),
        }
    }
}

impl EditorAnalysis {
    /// Inspect the result against the text it was produced from.
    /// Nothing here rejects the analysis; callers log or display the warnings.
    pub fn diagnostics(&self, source_text: &str) -> Vec<AnalysisWarning> {
        let mut warnings = Vec::new();

        if !(0.0..=100.0).contains(&self.score) {
            warnings.push(AnalysisWarning::ScoreOutOfRange { score: self.score });
        }

        for (t, table) in self.tables.iter().enumerate() {
            let expected = table.headers.len();
            for (r, row) in table.rows.iter().enumerate() {
                if row.len() != expected {
                    warnings.push(AnalysisWarning::RaggedRow {
                        table: t,
                        row: r,
                        expected,
                        found: row.len(),
                    });
                }
            }
        }

        for (i, s) in self.style_suggestions.iter().enumerate() {
            if !s.original.is_empty() && !source_text.contains(s.original.as_str()) {
                warnings.push(AnalysisWarning::FragmentNotFound { suggestion: i });
            }
        }

        warnings
    }
}

/// Lifecycle of one analysis session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl std::fmt::Display for AppStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "IDLE",
            Self::Loading => "LOADING",
            Self::Success => "SUCCESS",
            Self::Error => "ERROR",
        };
        f.write_str(s)
    }
}
