/// Database primary keys for ledger-style tables are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// User identifiers are opaque UUIDs, assigned once at creation.
pub type UserId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
