/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Business dates (allocation dates, return dates, required-by dates) carry
/// no time component.
pub type Date = chrono::NaiveDate;
