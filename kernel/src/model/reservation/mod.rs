use crate::model::{id::ReservationId, period::StayPeriod, room::RoomSummary};
use chrono::{DateTime, Utc};

pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub stay: StayPeriod,
    pub processed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub room: RoomSummary,
}

impl Reservation {
    pub fn guest_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
