/// All database primary keys are SQLite rowid integers, except time
/// entries which use opaque UUID strings.
pub type DbId = i64;

/// Row timestamps are stored as `YYYY-MM-DD HH:MM:SS` UTC text.
pub type Timestamp = chrono::NaiveDateTime;
