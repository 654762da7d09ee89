/// Record identifiers are UUIDv4, assigned when a record is first created.
pub type RecordId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (campaign windows, event days) carry no time zone.
pub type Day = chrono::NaiveDate;
