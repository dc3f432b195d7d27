use std::collections::HashMap;

/// User rows are keyed by a store-assigned integer, like a SERIAL column.
pub type UserRecordId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Point-in-time copy of every live claim: `spot_id -> user_id`.
pub type ClaimMap = HashMap<String, String>;
