use crate::database::{
    model::room::{RoomRow, RoomSummaryRow},
    with_statement_timeout, ConnectionPool,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::RoomId,
    period::StayPeriod,
    room::{Room, RoomSummary},
};
use kernel::repository::room::RoomRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct PgRoomRepository {
    db: ConnectionPool,
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    async fn find_by_id(&self, room_id: RoomId) -> AppResult<Room> {
        with_statement_timeout("rooms.find_by_id", async {
            let row: Option<RoomRow> = sqlx::query_as(
                r#"
                    SELECT room_id, room_name, created_at, updated_at
                    FROM rooms
                    WHERE room_id = $1
                "#,
            )
            .bind(room_id.raw())
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

            row.map(Room::from)
                .ok_or_else(|| AppError::EntityNotFound(format!("room {room_id} was not found")))
        })
        .await
    }

    async fn is_available(&self, room_id: RoomId, stay: StayPeriod) -> AppResult<bool> {
        with_statement_timeout("room_restrictions.count_overlapping", async {
            // half-open overlap: a stay starting on another's end date is fine
            let overlapping: i64 = sqlx::query_scalar(
                r#"
                    SELECT COUNT(restriction_id)
                    FROM room_restrictions
                    WHERE room_id = $1
                      AND $2 < end_date
                      AND $3 > start_date
                "#,
            )
            .bind(room_id.raw())
            .bind(stay.start)
            .bind(stay.end)
            .fetch_one(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

            Ok(overlapping == 0)
        })
        .await
    }

    async fn find_available(&self, stay: StayPeriod) -> AppResult<Vec<RoomSummary>> {
        with_statement_timeout("rooms.find_available", async {
            let rows: Vec<RoomSummaryRow> = sqlx::query_as(
                r#"
                    SELECT r.room_id, r.room_name
                    FROM rooms AS r
                    WHERE r.room_id NOT IN (
                        SELECT rr.room_id
                        FROM room_restrictions AS rr
                        WHERE $1 < rr.end_date
                          AND $2 > rr.start_date
                    )
                "#,
            )
            .bind(stay.start)
            .bind(stay.end)
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

            Ok(rows.into_iter().map(RoomSummary::from).collect())
        })
        .await
    }
}
