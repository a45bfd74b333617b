//! Read-only projections of the session for whatever renders it.

use pedscribe_core::{AnalysisWarning, AppStatus, EditorAnalysis, StyleSuggestion, TableIdea};
use serde::Serialize;

use crate::controller::SessionController;

/// Editorial verdict derived from the score, for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Strong,
    NeedsRevision,
    MajorRevision,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Strong
        } else if score >= 60.0 {
            Self::NeedsRevision
        } else {
            Self::MajorRevision
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Strong => "ready for submission with minor edits",
            Self::NeedsRevision => "needs revision",
            Self::MajorRevision => "major revision required",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub status: AppStatus,
    pub text: String,
    pub is_extracting: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub can_analyze: bool,
    pub can_retry: bool,
    pub can_reset: bool,
    pub can_upload: bool,
    pub can_load_example: bool,
    pub analysis: Option<AnalysisView>,
}

impl From<&SessionController> for SessionView {
    fn from(c: &SessionController) -> Self {
        // Only a successful session exposes its result.
        let analysis = match c.status() {
            AppStatus::Success => c
                .analysis()
                .map(|a| AnalysisView::build(a, c.last_submitted().unwrap_or_default())),
            _ => None,
        };
        let error = match c.status() {
            AppStatus::Error => c.error().map(str::to_string),
            _ => None,
        };

        Self {
            status: c.status(),
            text: c.input_text().to_string(),
            is_extracting: c.is_extracting(),
            error,
            notice: c.notice().map(str::to_string),
            can_analyze: c.can_analyze(),
            can_retry: c.can_retry(),
            can_reset: c.can_reset(),
            can_upload: c.can_upload(),
            can_load_example: c.can_load_example(),
            analysis,
        }
    }
}

/// The four result tabs.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub review: ReviewTab,
    pub manuscript: ManuscriptTab,
    pub tables: TablesTab,
    pub discussion: DiscussionTab,
    pub warnings: Vec<AnalysisWarning>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewTab {
    pub score: f64,
    pub band: ScoreBand,
    pub explanation: String,
    pub suggestions: Vec<StyleSuggestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManuscriptTab {
    pub improved_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TablesTab {
    pub extracted: Vec<TableView>,
    pub ideas: Vec<TableIdea>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Clipboard payload for spreadsheets.
    pub tsv: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscussionTab {
    pub points: Vec<String>,
}

impl AnalysisView {
    pub fn build(analysis: &EditorAnalysis, source_text: &str) -> Self {
        Self {
            review: ReviewTab {
                score: analysis.score,
                band: ScoreBand::from_score(analysis.score),
                explanation: analysis.score_explanation.clone(),
                suggestions: analysis.style_suggestions.clone(),
            },
            manuscript: ManuscriptTab {
                improved_text: analysis.improved_text.clone(),
            },
            tables: TablesTab {
                extracted: analysis
                    .tables
                    .iter()
                    .map(|t| TableView {
                        title: t.title.clone(),
                        headers: t.headers.clone(),
                        rows: t.rows.clone(),
                        tsv: t.to_tsv(),
                    })
                    .collect(),
                ideas: analysis.table_ideas.clone(),
            },
            discussion: DiscussionTab {
                points: analysis.discussion_points.clone(),
            },
            warnings: analysis.diagnostics(source_text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedscribe_core::TableData;
    use pedscribe_llm::AnalysisError;

    fn analysis() -> EditorAnalysis {
        EditorAnalysis {
            score: 64.5,
            score_explanation: "Faltan antecedentes perinatales".into(),
            style_suggestions: vec![],
            improved_text: "Preescolar de 4 años...".into(),
            tables: vec![TableData {
                title: "Signos vitales".into(),
                headers: vec!["FC".into(), "FR".into()],
                rows: vec![vec!["110".into(), "24".into()]],
            }],
            table_ideas: vec![],
            discussion_points: vec!["Celulitis vs. osteomielitis".into()],
        }
    }

    #[test]
    fn score_bands() {
        assert_eq!(ScoreBand::from_score(92.0), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(80.0), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(64.5), ScoreBand::NeedsRevision);
        assert_eq!(ScoreBand::from_score(12.0), ScoreBand::MajorRevision);
    }

    #[test]
    fn idle_view_has_no_result() {
        let view = SessionView::from(&SessionController::new());
        assert_eq!(view.status, AppStatus::Idle);
        assert!(view.analysis.is_none());
        assert!(view.error.is_none());
        assert!(!view.can_analyze);
        assert!(view.can_load_example);
    }

    #[test]
    fn success_view_exposes_tabs() {
        let mut c = SessionController::new();
        c.set_text("FC 110, FR 24").unwrap();
        let ticket = c.begin_analysis().unwrap();
        c.complete_analysis(&ticket, Ok(analysis()));

        let view = SessionView::from(&c);
        let tabs = view.analysis.expect("success exposes analysis");
        assert_eq!(tabs.review.band, ScoreBand::NeedsRevision);
        assert_eq!(tabs.manuscript.improved_text, "Preescolar de 4 años...");
        assert_eq!(tabs.tables.extracted[0].tsv, "110\t24");
        assert_eq!(tabs.discussion.points.len(), 1);
        assert!(tabs.warnings.is_empty());
        assert!(view.can_reset);
    }

    #[test]
    fn error_view_carries_message_only() {
        let mut c = SessionController::new();
        c.set_text("caso").unwrap();
        let ticket = c.begin_analysis().unwrap();
        c.complete_analysis(&ticket, Err(AnalysisError::NoResponse));

        let view = SessionView::from(&c);
        assert_eq!(view.status, AppStatus::Error);
        assert!(view.error.as_deref().unwrap().contains("No usable response"));
        assert!(view.analysis.is_none());
        assert!(view.can_retry);
    }

    #[test]
    fn view_serializes_status_uppercase() {
        let json = serde_json::to_value(SessionView::from(&SessionController::new())).unwrap();
        assert_eq!(json["status"], "IDLE");
        assert_eq!(json["can_analyze"], false);
    }
}
