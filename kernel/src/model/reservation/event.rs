use crate::model::{
    id::{ReservationId, RoomId},
    period::StayPeriod,
};
use derive_new::new;

#[derive(Debug, Clone, new)]
pub struct CreateReservation {
    pub room_id: RoomId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub stay: StayPeriod,
}

/// Operator correction of the guest contact fields; the stay itself and
/// the room never change through this event.
#[derive(Debug, Clone, new)]
pub struct UpdateReservation {
    pub reservation_id: ReservationId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}
