use pedscribe_session::Session;

/// Shared handler state: one editing session per server process.
pub struct AppState {
    pub session: Session,
    pub config: pedscribe_core::Config,
}
