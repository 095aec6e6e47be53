use kernel::model::room::{Room, RoomSummary};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub struct RoomRow {
    pub room_id: Uuid,
    pub room_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoomRow> for Room {
    fn from(value: RoomRow) -> Self {
        let RoomRow {
            room_id,
            room_name,
            created_at,
            updated_at,
        } = value;
        Room {
            room_id: room_id.into(),
            room_name,
            created_at,
            updated_at,
        }
    }
}

// availability searches only project id and name
#[derive(sqlx::FromRow)]
pub struct RoomSummaryRow {
    pub room_id: Uuid,
    pub room_name: String,
}

impl From<RoomSummaryRow> for RoomSummary {
    fn from(value: RoomSummaryRow) -> Self {
        RoomSummary {
            room_id: value.room_id.into(),
            room_name: value.room_name,
        }
    }
}
