use crate::model::{
    id::{ReservationId, RoomId},
    notification::Notification,
    period::StayPeriod,
    reservation::event::CreateReservation,
    room::RoomSummary,
};
use crate::repository::{
    notification::NotificationQueue, reservation::ReservationRepository, room::RoomRepository,
};
use derive_new::new;
use shared::error::{AppError, AppResult};
use std::sync::Arc;

#[derive(Debug, Clone, new)]
pub struct BookingRequest {
    pub room_id: RoomId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub stay: StayPeriod,
}

/// The booking sequence: validate, resolve the room, pre-check
/// availability, store reservation plus restriction atomically, then
/// queue the confirmation mails. Mail is best effort and never fails
/// the booking.
#[derive(new)]
pub struct BookingService {
    rooms: Arc<dyn RoomRepository>,
    reservations: Arc<dyn ReservationRepository>,
    notifications: Arc<dyn NotificationQueue>,
    mail_from: String,
}

impl BookingService {
    pub async fn book(&self, req: BookingRequest) -> AppResult<ReservationId> {
        req.stay.validate()?;

        let room = self.rooms.find_by_id(req.room_id).await?;

        // optimistic pre-check; reserve() repeats it inside the transaction
        if !self.rooms.is_available(req.room_id, req.stay).await? {
            return Err(AppError::RoomUnavailable(format!(
                "{} is already booked between {} and {}",
                room.room_name, req.stay.start, req.stay.end
            )));
        }

        let event = CreateReservation::new(
            req.room_id,
            req.first_name.clone(),
            req.last_name.clone(),
            req.email.clone(),
            req.phone.clone(),
            req.stay,
        );
        let reservation_id = self.reservations.reserve(event).await?;
        tracing::info!(%reservation_id, room = %room.room_name, "reservation stored");

        self.notifications.enqueue(Notification::new(
            self.mail_from.clone(),
            req.email.clone(),
            "Reservation confirmation".into(),
            format!(
                "Dear {} {},<br>This confirms your reservation of {} from {} to {}.",
                req.first_name, req.last_name, room.room_name, req.stay.start, req.stay.end
            ),
            Some("basic".into()),
        ));
        self.notifications.enqueue(Notification::new(
            self.mail_from.clone(),
            self.mail_from.clone(),
            "New reservation".into(),
            format!(
                "{} has been reserved from {} to {}.",
                room.room_name, req.stay.start, req.stay.end
            ),
            None,
        ));

        Ok(reservation_id)
    }

    pub async fn search_availability(&self, stay: StayPeriod) -> AppResult<Vec<RoomSummary>> {
        stay.validate()?;
        self.rooms.find_available(stay).await
    }
}
