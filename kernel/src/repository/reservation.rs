use crate::model::{
    id::ReservationId,
    reservation::{
        event::{CreateReservation, UpdateReservation},
        Reservation,
    },
    restriction::CreateRoomRestriction,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId>;
    async fn create_restriction(&self, event: CreateRoomRestriction) -> AppResult<()>;
    // atomic booking step: re-checks the overlap and inserts the
    // reservation together with its matching restriction
    async fn reserve(&self, event: CreateReservation) -> AppResult<ReservationId>;
    // all listings are joined with the room name and ordered by stay start
    async fn find_all(&self) -> AppResult<Vec<Reservation>>;
    async fn find_unprocessed(&self) -> AppResult<Vec<Reservation>>;
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Reservation>;
    async fn update_guest(&self, event: UpdateReservation) -> AppResult<()>;
    async fn delete(&self, reservation_id: ReservationId) -> AppResult<()>;
    async fn set_processed(&self, reservation_id: ReservationId, processed: bool) -> AppResult<()>;
}
