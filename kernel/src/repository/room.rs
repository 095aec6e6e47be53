use crate::model::{
    id::RoomId,
    period::StayPeriod,
    room::{Room, RoomSummary},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn find_by_id(&self, room_id: RoomId) -> AppResult<Room>;
    // true iff no restriction on the room overlaps the stay; a room with
    // no restriction rows (or an unknown id) counts as available
    async fn is_available(&self, room_id: RoomId, stay: StayPeriod) -> AppResult<bool>;
    // rooms with zero overlapping restrictions; empty vec when none qualify
    async fn find_available(&self, stay: StayPeriod) -> AppResult<Vec<RoomSummary>>;
}
