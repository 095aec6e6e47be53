use crate::model::id::RoomId;
use chrono::{DateTime, Utc};

/// Reference data; rooms are seeded out-of-band and read-only here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub room_id: RoomId,
    pub room_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The id-and-name projection returned by availability searches and
/// embedded in reservation listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub room_name: String,
}
