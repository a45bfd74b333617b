pub mod controller;
pub mod session;
pub mod view;

pub use controller::{AnalysisTicket, ExtractionTicket, SessionController, SessionError, EXAMPLE_CASE};
pub use session::Session;
pub use view::{AnalysisView, ScoreBand, SessionView};
