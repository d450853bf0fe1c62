/// All persisted identifiers are database-generated UUIDs.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC and written by the database.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
