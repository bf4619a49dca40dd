/// All entity identifiers are UUIDs assigned at creation time.
pub type EntityId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
