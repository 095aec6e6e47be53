use chrono::NaiveDate;
use kernel::model::{period::StayPeriod, reservation::Reservation, room::RoomSummary};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

// listing type; joined with the room so operators see the room name
#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: Uuid,
    pub room_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub processed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub room_name: String,
}

impl From<ReservationRow> for Reservation {
    fn from(value: ReservationRow) -> Self {
        let ReservationRow {
            reservation_id,
            room_id,
            first_name,
            last_name,
            email,
            phone,
            start_date,
            end_date,
            processed,
            created_at,
            updated_at,
            room_name,
        } = value;
        Reservation {
            reservation_id: reservation_id.into(),
            first_name,
            last_name,
            email,
            phone,
            stay: StayPeriod::new(start_date, end_date),
            processed,
            created_at,
            updated_at,
            room: RoomSummary {
                room_id: room_id.into(),
                room_name,
            },
        }
    }
}
