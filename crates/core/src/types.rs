/// Opaque document identifier assigned by the store.
pub type DocId = String;

/// Identity subject taken from a verified bearer token.
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
