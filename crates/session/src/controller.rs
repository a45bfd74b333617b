//! Single source of truth for one editing session.
//!
//! Every mutation goes through a transition method. Long-running work is
//! split into `begin_*` (synchronous, hands out a ticket) and `complete_*`
//! (applies the result only if the ticket is still current).

use pedscribe_core::{AppStatus, EditorAnalysis};
use pedscribe_ingest::{DocumentKind, ExtractionError};
use pedscribe_llm::AnalysisError;
use tracing::{debug, info, warn};

/// Sample case offered on an empty, idle session.
pub const EXAMPLE_CASE: &str = "Paciente de 4 años que llega a consulta con fiebre de 3 días. \
Tiene una mancha en la pierna que parece celulitis. El niño está decaído pero come algo. \
Le dimos amoxicilina ayer pero sigue igual. No tiene alergias. Peso 16kg. Talla 102cm. \
FC 110, FR 24, T 38.5.";

const INVALID_FILE_MESSAGE: &str = "Please upload a valid PDF file.";
const EXTRACTION_FAILED_MESSAGE: &str =
    "Could not extract text from the PDF. Make sure it is not password-protected or scanned as an image.";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("an analysis is already running")]
    AnalysisInFlight,
    #[error("a PDF is still being extracted")]
    ExtractionInFlight,
    #[error("there is no case text to analyze")]
    EmptyText,
    #[error("retry is only available after a failed analysis")]
    NothingToRetry,
    #[error("the example case can only be loaded into an empty session")]
    ExampleUnavailable,
    #[error("{0}")]
    InvalidFileType(String),
}

/// Proof that an analysis was started; carries the exact text submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisTicket {
    pub generation: u64,
    pub text: String,
}

/// Proof that a PDF extraction was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionTicket {
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct SessionController {
    status: AppStatus,
    input_text: String,
    analysis: Option<EditorAnalysis>,
    error: Option<String>,
    /// Upload/extraction message; independent of `status`.
    notice: Option<String>,
    extracting: bool,
    last_submitted: Option<String>,
    /// Bumped on reset; completions carrying an older value are stale.
    generation: u64,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn status(&self) -> AppStatus {
        self.status
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    /// Present only in `Success`.
    pub fn analysis(&self) -> Option<&EditorAnalysis> {
        self.analysis.as_ref()
    }

    /// Present only in `Error`.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_extracting(&self) -> bool {
        self.extracting
    }

    pub fn last_submitted(&self) -> Option<&str> {
        self.last_submitted.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ── Affordances ───────────────────────────────────────────

    pub fn can_edit_text(&self) -> bool {
        self.status != AppStatus::Loading && !self.extracting
    }

    pub fn can_analyze(&self) -> bool {
        self.can_edit_text() && !self.input_text.trim().is_empty()
    }

    pub fn can_retry(&self) -> bool {
        self.status == AppStatus::Error && !self.extracting && self.last_submitted.is_some()
    }

    pub fn can_reset(&self) -> bool {
        matches!(self.status, AppStatus::Success | AppStatus::Loading)
    }

    /// Only a running extraction blocks another upload.
    pub fn can_upload(&self) -> bool {
        !self.extracting
    }

    pub fn can_load_example(&self) -> bool {
        self.status == AppStatus::Idle && self.input_text.is_empty() && !self.extracting
    }

    // ── Text input ────────────────────────────────────────────

    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.input_text = text.into();
        Ok(())
    }

    pub fn load_example(&mut self) -> Result<(), SessionError> {
        if !self.can_load_example() {
            return Err(SessionError::ExampleUnavailable);
        }
        self.input_text = EXAMPLE_CASE.to_string();
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), SessionError> {
        if self.status == AppStatus::Loading {
            return Err(SessionError::AnalysisInFlight);
        }
        if self.extracting {
            return Err(SessionError::ExtractionInFlight);
        }
        Ok(())
    }

    // ── Analysis ──────────────────────────────────────────────

    /// `Idle | Success | Error → Loading` with the current text.
    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket, SessionError> {
        self.ensure_editable()?;
        if self.input_text.trim().is_empty() {
            return Err(SessionError::EmptyText);
        }
        let text = self.input_text.clone();
        Ok(self.enter_loading(text))
    }

    /// `Error → Loading` with the text that produced the error.
    pub fn begin_retry(&mut self) -> Result<AnalysisTicket, SessionError> {
        if self.extracting {
            return Err(SessionError::ExtractionInFlight);
        }
        if self.status != AppStatus::Error {
            return Err(SessionError::NothingToRetry);
        }
        let text = self
            .last_submitted
            .clone()
            .ok_or(SessionError::NothingToRetry)?;
        Ok(self.enter_loading(text))
    }

    fn enter_loading(&mut self, text: String) -> AnalysisTicket {
        info!(from = %self.status, chars = text.len(), "analysis started");
        self.status = AppStatus::Loading;
        self.error = None;
        self.last_submitted = Some(text.clone());
        AnalysisTicket {
            generation: self.generation,
            text,
        }
    }

    /// Apply a finished analysis. Returns `false` when the ticket is stale
    /// (session reset meanwhile) and the result was dropped.
    pub fn complete_analysis(
        &mut self,
        ticket: &AnalysisTicket,
        result: Result<EditorAnalysis, AnalysisError>,
    ) -> bool {
        if ticket.generation != self.generation || self.status != AppStatus::Loading {
            warn!(
                ticket = ticket.generation,
                current = self.generation,
                status = %self.status,
                "dropping stale analysis result"
            );
            return false;
        }

        match result {
            Ok(analysis) => {
                for warning in analysis.diagnostics(&ticket.text) {
                    warn!(%warning, "analysis shape warning");
                }
                info!(score = analysis.score, "analysis succeeded");
                self.analysis = Some(analysis);
                self.status = AppStatus::Success;
            }
            Err(e) => {
                warn!(error = %e, "analysis failed");
                self.analysis = None;
                self.error = Some(e.to_string());
                self.status = AppStatus::Error;
            }
        }
        true
    }

    // ── Reset ─────────────────────────────────────────────────

    /// Any state → `Idle`, clearing text, result and messages.
    pub fn reset(&mut self) {
        info!(from = %self.status, "session reset");
        self.generation += 1;
        self.status = AppStatus::Idle;
        self.input_text.clear();
        self.analysis = None;
        self.error = None;
        self.notice = None;
        self.last_submitted = None;
    }

    // ── PDF ingestion ─────────────────────────────────────────

    /// Gate an upload by MIME type and mark extraction busy.
    pub fn begin_extraction(&mut self, mime: &str) -> Result<ExtractionTicket, SessionError> {
        if self.extracting {
            return Err(SessionError::ExtractionInFlight);
        }
        if let Err(e) = DocumentKind::from_mime(mime) {
            debug!(error = %e, "upload rejected");
            self.notice = Some(INVALID_FILE_MESSAGE.to_string());
            return Err(SessionError::InvalidFileType(INVALID_FILE_MESSAGE.to_string()));
        }
        self.extracting = true;
        self.notice = None;
        Ok(ExtractionTicket {
            generation: self.generation,
        })
    }

    /// Apply extracted text, or record why it failed. Analysis status is
    /// never touched. Stale tickets only release the busy flag and return `false`.
    pub fn complete_extraction(
        &mut self,
        ticket: ExtractionTicket,
        result: Result<String, ExtractionError>,
    ) -> bool {
        self.extracting = false;
        if ticket.generation != self.generation {
            warn!("dropping stale extraction result");
            return false;
        }

        match result {
            Ok(text) => {
                info!(chars = text.len(), "PDF text loaded");
                self.input_text = text;
            }
            Err(e) => {
                warn!(error = %e, "PDF extraction failed");
                self.notice = Some(EXTRACTION_FAILED_MESSAGE.to_string());
            }
        }
        true
    }
}
