/// Domain error taxonomy.
///
/// Persistence failures are not represented here: they surface as
/// `sqlx::Error` and are wrapped at the API boundary.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A date or period expression could not be resolved. Carries the
    /// offending input verbatim.
    #[error("unable to parse date or period: {input}")]
    Parse { input: String },

    /// A lookup by name/number/id found nothing.
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    /// A required precondition is not met (missing configuration,
    /// inactive contract, empty unbilled set). The message tells the
    /// caller what to do about it.
    #[error("{0}")]
    Precondition(String),

    /// The operation contradicts existing state, e.g. an entry already
    /// linked to a different invoice.
    #[error("{0}")]
    Conflict(String),

    /// Document generation failed.
    #[error("document rendering failed: {0}")]
    Render(String),
}
