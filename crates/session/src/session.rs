use std::sync::Arc;

use pedscribe_ingest::{extract_case_text, DocumentKind, ExtractionError, TextExtractor};
use pedscribe_llm::Analyzer;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::controller::{AnalysisTicket, ExtractionTicket, SessionController, SessionError};
use crate::view::SessionView;

/// Async driver around a [`SessionController`].
///
/// The controller lock is never held across the outbound call or the PDF
/// extraction; both are bracketed by `begin_*`/`complete_*` transitions.
#[derive(Clone)]
pub struct Session {
    controller: Arc<Mutex<SessionController>>,
    analyzer: Arc<dyn Analyzer>,
    extractor: Arc<dyn TextExtractor>,
}

impl Session {
    pub fn new(analyzer: Arc<dyn Analyzer>, extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            controller: Arc::new(Mutex::new(SessionController::new())),
            analyzer,
            extractor,
        }
    }

    pub async fn snapshot(&self) -> SessionView {
        SessionView::from(&*self.controller.lock().await)
    }

    pub async fn set_text(&self, text: impl Into<String>) -> Result<SessionView, SessionError> {
        let mut c = self.controller.lock().await;
        c.set_text(text)?;
        Ok(SessionView::from(&*c))
    }

    pub async fn load_example(&self) -> Result<SessionView, SessionError> {
        let mut c = self.controller.lock().await;
        c.load_example()?;
        Ok(SessionView::from(&*c))
    }

    pub async fn reset(&self) -> SessionView {
        let mut c = self.controller.lock().await;
        c.reset();
        SessionView::from(&*c)
    }

    /// Analyze the current text and wait for the outcome.
    pub async fn analyze(&self) -> Result<SessionView, SessionError> {
        let ticket = self.controller.lock().await.begin_analysis()?;
        self.run(ticket).await;
        Ok(self.snapshot().await)
    }

    /// Re-issue the failed request and wait for the outcome.
    pub async fn retry(&self) -> Result<SessionView, SessionError> {
        let ticket = self.controller.lock().await.begin_retry()?;
        self.run(ticket).await;
        Ok(self.snapshot().await)
    }

    /// Enter `Loading` now and finish the call on a background task.
    /// The returned view is the `Loading` snapshot.
    pub async fn spawn_analyze(&self) -> Result<SessionView, SessionError> {
        let (ticket, view) = {
            let mut c = self.controller.lock().await;
            let ticket = c.begin_analysis()?;
            (ticket, SessionView::from(&*c))
        };
        self.spawn_run(ticket);
        Ok(view)
    }

    pub async fn spawn_retry(&self) -> Result<SessionView, SessionError> {
        let (ticket, view) = {
            let mut c = self.controller.lock().await;
            let ticket = c.begin_retry()?;
            (ticket, SessionView::from(&*c))
        };
        self.spawn_run(ticket);
        Ok(view)
    }

    fn spawn_run(&self, ticket: AnalysisTicket) {
        let session = self.clone();
        tokio::spawn(async move { session.run(ticket).await });
    }

    async fn run(&self, ticket: AnalysisTicket) {
        let result = self.analyzer.analyze(&ticket.text).await;
        let applied = self.controller.lock().await.complete_analysis(&ticket, result);
        debug!(generation = ticket.generation, applied, "analysis resolved");
    }

    /// Extract an uploaded PDF into the input text. Non-PDF MIME types are
    /// rejected before the extractor runs.
    ///
    /// Once accepted, extraction and its completion run on a detached task,
    /// so a dropped caller cannot leave the session marked busy.
    pub async fn upload(&self, bytes: Vec<u8>, mime: &str) -> Result<SessionView, SessionError> {
        let ticket = self.controller.lock().await.begin_extraction(mime)?;

        let session = self.clone();
        let task = tokio::spawn(async move { session.extract(ticket, bytes).await });
        match task.await {
            Ok(view) => Ok(view),
            Err(e) => {
                warn!(error = %e, "extraction task did not finish");
                Ok(self.snapshot().await)
            }
        }
    }

    async fn extract(&self, ticket: ExtractionTicket, bytes: Vec<u8>) -> SessionView {
        let extractor = Arc::clone(&self.extractor);
        let result = tokio::task::spawn_blocking(move || {
            extract_case_text(extractor.as_ref(), &bytes, DocumentKind::Pdf)
        })
        .await
        .unwrap_or_else(|e| Err(ExtractionError::PdfError(format!("extraction task failed: {e}"))));

        let mut c = self.controller.lock().await;
        c.complete_extraction(ticket, result);
        SessionView::from(&*c)
    }
}
