use crate::database::{model::reservation::ReservationRow, with_statement_timeout, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{ReservationId, RestrictionId},
    reservation::{
        event::{CreateReservation, UpdateReservation},
        Reservation,
    },
    restriction::{CreateRoomRestriction, RestrictionKind},
};
use kernel::repository::reservation::ReservationRepository;
use shared::error::{AppError, AppResult};

const RESERVATION_COLUMNS: &str = r#"
    r.reservation_id,
    r.room_id,
    r.first_name,
    r.last_name,
    r.email,
    r.phone,
    r.start_date,
    r.end_date,
    r.processed,
    r.created_at,
    r.updated_at,
    rm.room_name
"#;

#[derive(new)]
pub struct PgReservationRepository {
    db: ConnectionPool,
}

#[async_trait]
impl ReservationRepository for PgReservationRepository {
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId> {
        with_statement_timeout("reservations.insert", async {
            let reservation_id = ReservationId::new();
            let res = sqlx::query(
                r#"
                    INSERT INTO reservations
                    (reservation_id, first_name, last_name, email, phone, start_date, end_date, room_id)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(reservation_id.raw())
            .bind(&event.first_name)
            .bind(&event.last_name)
            .bind(&event.email)
            .bind(&event.phone)
            .bind(event.stay.start)
            .bind(event.stay.end)
            .bind(event.room_id.raw())
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

            if res.rows_affected() < 1 {
                return Err(AppError::NoRowsAffectedError(
                    "no reservation record has been created".into(),
                ));
            }
            Ok(reservation_id)
        })
        .await
    }

    async fn create_restriction(&self, event: CreateRoomRestriction) -> AppResult<()> {
        with_statement_timeout("room_restrictions.insert", async {
            let res = sqlx::query(
                r#"
                    INSERT INTO room_restrictions
                    (restriction_id, start_date, end_date, room_id, reservation_id, kind)
                    VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(RestrictionId::new().raw())
            .bind(event.stay.start)
            .bind(event.stay.end)
            .bind(event.room_id.raw())
            .bind(event.reservation_id.map(|id| id.raw()))
            .bind(event.kind.as_str())
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

            if res.rows_affected() < 1 {
                return Err(AppError::NoRowsAffectedError(
                    "no room restriction record has been created".into(),
                ));
            }
            Ok(())
        })
        .await
    }

    // The availability pre-check and the two inserts run in one
    // SERIALIZABLE transaction, so two concurrent bookings for the same
    // room and dates cannot both commit.
    async fn reserve(&self, event: CreateReservation) -> AppResult<ReservationId> {
        with_statement_timeout("reservations.reserve", async {
            let mut tx = self.db.begin().await?;
            self.set_transaction_serializable(&mut tx).await?;

            let overlapping: i64 = sqlx::query_scalar(
                r#"
                    SELECT COUNT(restriction_id)
                    FROM room_restrictions
                    WHERE room_id = $1
                      AND $2 < end_date
                      AND $3 > start_date
                "#,
            )
            .bind(event.room_id.raw())
            .bind(event.stay.start)
            .bind(event.stay.end)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_reserve_error)?;

            if overlapping > 0 {
                return Err(AppError::RoomUnavailable(format!(
                    "room {} is already restricted between {} and {}",
                    event.room_id, event.stay.start, event.stay.end
                )));
            }

            let reservation_id = ReservationId::new();
            let res = sqlx::query(
                r#"
                    INSERT INTO reservations
                    (reservation_id, first_name, last_name, email, phone, start_date, end_date, room_id)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(reservation_id.raw())
            .bind(&event.first_name)
            .bind(&event.last_name)
            .bind(&event.email)
            .bind(&event.phone)
            .bind(event.stay.start)
            .bind(event.stay.end)
            .bind(event.room_id.raw())
            .execute(&mut *tx)
            .await
            .map_err(map_reserve_error)?;

            if res.rows_affected() < 1 {
                return Err(AppError::NoRowsAffectedError(
                    "no reservation record has been created".into(),
                ));
            }

            let res = sqlx::query(
                r#"
                    INSERT INTO room_restrictions
                    (restriction_id, start_date, end_date, room_id, reservation_id, kind)
                    VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(RestrictionId::new().raw())
            .bind(event.stay.start)
            .bind(event.stay.end)
            .bind(event.room_id.raw())
            .bind(reservation_id.raw())
            .bind(RestrictionKind::Reservation.as_str())
            .execute(&mut *tx)
            .await
            .map_err(map_reserve_error)?;

            if res.rows_affected() < 1 {
                return Err(AppError::NoRowsAffectedError(
                    "no room restriction record has been created".into(),
                ));
            }

            tx.commit().await.map_err(|e| {
                if is_serialization_abort(&e) {
                    map_reserve_error(e)
                } else {
                    AppError::TransactionError(e)
                }
            })?;

            Ok(reservation_id)
        })
        .await
    }

    async fn find_all(&self) -> AppResult<Vec<Reservation>> {
        with_statement_timeout("reservations.find_all", async {
            let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
                r#"
                    SELECT {RESERVATION_COLUMNS}
                    FROM reservations AS r
                    INNER JOIN rooms AS rm ON r.room_id = rm.room_id
                    ORDER BY r.start_date ASC
                "#
            ))
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

            Ok(rows.into_iter().map(Reservation::from).collect())
        })
        .await
    }

    async fn find_unprocessed(&self) -> AppResult<Vec<Reservation>> {
        with_statement_timeout("reservations.find_unprocessed", async {
            let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
                r#"
                    SELECT {RESERVATION_COLUMNS}
                    FROM reservations AS r
                    INNER JOIN rooms AS rm ON r.room_id = rm.room_id
                    WHERE r.processed = FALSE
                    ORDER BY r.start_date ASC
                "#
            ))
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

            Ok(rows.into_iter().map(Reservation::from).collect())
        })
        .await
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Reservation> {
        with_statement_timeout("reservations.find_by_id", async {
            let row: Option<ReservationRow> = sqlx::query_as(&format!(
                r#"
                    SELECT {RESERVATION_COLUMNS}
                    FROM reservations AS r
                    INNER JOIN rooms AS rm ON r.room_id = rm.room_id
                    WHERE r.reservation_id = $1
                "#
            ))
            .bind(reservation_id.raw())
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

            row.map(Reservation::from).ok_or_else(|| {
                AppError::EntityNotFound(format!("reservation {reservation_id} was not found"))
            })
        })
        .await
    }

    async fn update_guest(&self, event: UpdateReservation) -> AppResult<()> {
        with_statement_timeout("reservations.update_guest", async {
            let res = sqlx::query(
                r#"
                    UPDATE reservations
                    SET
                        first_name = $1,
                        last_name = $2,
                        email = $3,
                        phone = $4,
                        updated_at = CURRENT_TIMESTAMP
                    WHERE reservation_id = $5
                "#,
            )
            .bind(&event.first_name)
            .bind(&event.last_name)
            .bind(&event.email)
            .bind(&event.phone)
            .bind(event.reservation_id.raw())
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

            if res.rows_affected() < 1 {
                return Err(AppError::EntityNotFound(
                    "specified reservation not found".into(),
                ));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, reservation_id: ReservationId) -> AppResult<()> {
        with_statement_timeout("reservations.delete", async {
            let res = sqlx::query("DELETE FROM reservations WHERE reservation_id = $1")
                .bind(reservation_id.raw())
                .execute(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;

            if res.rows_affected() < 1 {
                return Err(AppError::EntityNotFound(
                    "specified reservation not found".into(),
                ));
            }
            Ok(())
        })
        .await
    }

    async fn set_processed(&self, reservation_id: ReservationId, processed: bool) -> AppResult<()> {
        with_statement_timeout("reservations.set_processed", async {
            let res = sqlx::query(
                r#"
                    UPDATE reservations
                    SET processed = $1, updated_at = CURRENT_TIMESTAMP
                    WHERE reservation_id = $2
                "#,
            )
            .bind(processed)
            .bind(reservation_id.raw())
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

            if res.rows_affected() < 1 {
                return Err(AppError::EntityNotFound(
                    "specified reservation not found".into(),
                ));
            }
            Ok(())
        })
        .await
    }
}

impl PgReservationRepository {
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }
}

/// SQLSTATE raised when a serializable transaction loses to a concurrent
/// writer.
const SERIALIZATION_FAILURE: &str = "40001";

fn is_serialization_abort(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(e) if e.code().as_deref() == Some(SERIALIZATION_FAILURE))
}

// Inside reserve() a serialization abort means a concurrent booking won
// the race for the same dates; callers get the same conflict error the
// in-transaction overlap check produces, not a system failure.
fn map_reserve_error(err: sqlx::Error) -> AppError {
    if is_serialization_abort(&err) {
        AppError::RoomUnavailable("a concurrent booking claimed the dates first".into())
    } else {
        AppError::SpecificOperationError(err)
    }
}
