use async_trait::async_trait;
use chrono::Utc;
use kernel::model::{
    id::{ReservationId, RestrictionId, RoomId, UserId},
    period::StayPeriod,
    reservation::{
        event::{CreateReservation, UpdateReservation},
        Reservation,
    },
    restriction::{CreateRoomRestriction, RestrictionKind, RoomRestriction},
    room::{Room, RoomSummary},
    user::{AccessLevel, AuthenticatedUser, UpdateUser, User},
};
use kernel::repository::{
    reservation::ReservationRepository, room::RoomRepository, user::UserRepository,
};
use shared::error::{AppError, AppResult};
use std::sync::Mutex;
use uuid::Uuid;

/// First seeded room ("General's Quarters"). Inserts against it behave
/// normally.
pub const SEEDED_ROOM_ID: RoomId = RoomId::from_raw(Uuid::from_u128(1));

/// Second seeded room ("Major's Suite"). Reservation inserts for this
/// room always fail with NoRowsAffectedError, a canned fixture for
/// exercising the storage-failure path without a database.
pub const FAILING_ROOM_ID: RoomId = RoomId::from_raw(Uuid::from_u128(2));

/// Restriction inserts for this room id always fail, the fixture for the
/// orphan-reservation path.
pub const FAILING_RESTRICTION_ROOM_ID: RoomId = RoomId::from_raw(Uuid::from_u128(1000));

/// Deterministic in-memory stand-in for the Postgres repositories.
///
/// Implements the real availability logic over the same half-open
/// overlap rule, seeds two rooms on construction and hands out
/// sequential ids, so behavior can be asserted without a live database.
pub struct InMemoryRepository {
    inner: Mutex<Inner>,
}

struct Inner {
    rooms: Vec<Room>,
    reservations: Vec<Reservation>,
    restrictions: Vec<RoomRestriction>,
    users: Vec<User>,
    next_raw_id: u128,
}

impl Inner {
    fn allocate_id(&mut self) -> Uuid {
        let id = Uuid::from_u128(self.next_raw_id);
        self.next_raw_id += 1;
        id
    }

    fn room_name(&self, room_id: RoomId) -> String {
        self.rooms
            .iter()
            .find(|r| r.room_id == room_id)
            .map(|r| r.room_name.clone())
            .unwrap_or_default()
    }

    fn overlapping_restriction(&self, room_id: RoomId, stay: &StayPeriod) -> bool {
        self.restrictions
            .iter()
            .any(|r| r.room_id == room_id && r.stay.overlaps(stay))
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        let now = Utc::now();
        let rooms = vec![
            Room {
                room_id: SEEDED_ROOM_ID,
                room_name: "General's Quarters".into(),
                created_at: now,
                updated_at: now,
            },
            Room {
                room_id: FAILING_ROOM_ID,
                room_name: "Major's Suite".into(),
                created_at: now,
                updated_at: now,
            },
        ];
        Self {
            inner: Mutex::new(Inner {
                rooms,
                reservations: Vec::new(),
                restrictions: Vec::new(),
                users: Vec::new(),
                next_raw_id: 3,
            }),
        }
    }

    pub fn add_room(&self, room_name: &str) -> RoomId {
        let mut inner = self.inner.lock().unwrap();
        let now = Utc::now();
        let room_id = RoomId::from_raw(inner.allocate_id());
        inner.rooms.push(Room {
            room_id,
            room_name: room_name.into(),
            created_at: now,
            updated_at: now,
        });
        room_id
    }

    pub fn add_user(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password_hash: &str,
        access_level: AccessLevel,
    ) -> UserId {
        let mut inner = self.inner.lock().unwrap();
        let now = Utc::now();
        let user_id = UserId::from_raw(inner.allocate_id());
        inner.users.push(User {
            user_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            access_level,
            created_at: now,
            updated_at: now,
        });
        user_id
    }

    /// Operator block: a restriction that exists without a reservation.
    pub fn block_room(&self, room_id: RoomId, stay: StayPeriod) -> RestrictionId {
        let mut inner = self.inner.lock().unwrap();
        let now = Utc::now();
        let restriction_id = RestrictionId::from_raw(inner.allocate_id());
        inner.restrictions.push(RoomRestriction {
            restriction_id,
            room_id,
            reservation_id: None,
            kind: RestrictionKind::OwnerBlock,
            stay,
            created_at: now,
            updated_at: now,
        });
        restriction_id
    }

    /// Test inspection helper; avoids disambiguating between the three
    /// `find_by_id` trait methods this double implements.
    pub fn reservation(&self, reservation_id: ReservationId) -> Option<Reservation> {
        let inner = self.inner.lock().unwrap();
        inner
            .reservations
            .iter()
            .find(|r| r.reservation_id == reservation_id)
            .cloned()
    }

    pub fn restrictions_for(&self, room_id: RoomId) -> Vec<RoomRestriction> {
        let inner = self.inner.lock().unwrap();
        inner
            .restrictions
            .iter()
            .filter(|r| r.room_id == room_id)
            .cloned()
            .collect()
    }

    pub fn reservation_count(&self) -> usize {
        self.inner.lock().unwrap().reservations.len()
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRepository {
    async fn find_by_id(&self, room_id: RoomId) -> AppResult<Room> {
        let inner = self.inner.lock().unwrap();
        inner
            .rooms
            .iter()
            .find(|r| r.room_id == room_id)
            .cloned()
            .ok_or_else(|| AppError::EntityNotFound(format!("room {room_id} was not found")))
    }

    async fn is_available(&self, room_id: RoomId, stay: StayPeriod) -> AppResult<bool> {
        let inner = self.inner.lock().unwrap();
        Ok(!inner.overlapping_restriction(room_id, &stay))
    }

    async fn find_available(&self, stay: StayPeriod) -> AppResult<Vec<RoomSummary>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .rooms
            .iter()
            .filter(|room| !inner.overlapping_restriction(room.room_id, &stay))
            .map(|room| RoomSummary {
                room_id: room.room_id,
                room_name: room.room_name.clone(),
            })
            .collect())
    }
}

#[async_trait]
impl ReservationRepository for InMemoryRepository {
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId> {
        let mut inner = self.inner.lock().unwrap();
        if event.room_id == FAILING_ROOM_ID {
            return Err(AppError::NoRowsAffectedError(
                "no reservation record has been created".into(),
            ));
        }
        let now = Utc::now();
        let reservation_id = ReservationId::from_raw(inner.allocate_id());
        let room_name = inner.room_name(event.room_id);
        inner.reservations.push(Reservation {
            reservation_id,
            first_name: event.first_name,
            last_name: event.last_name,
            email: event.email,
            phone: event.phone,
            stay: event.stay,
            processed: false,
            created_at: now,
            updated_at: now,
            room: RoomSummary {
                room_id: event.room_id,
                room_name,
            },
        });
        Ok(reservation_id)
    }

    async fn create_restriction(&self, event: CreateRoomRestriction) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if event.room_id == FAILING_RESTRICTION_ROOM_ID {
            return Err(AppError::NoRowsAffectedError(
                "no room restriction record has been created".into(),
            ));
        }
        let now = Utc::now();
        let restriction_id = RestrictionId::from_raw(inner.allocate_id());
        inner.restrictions.push(RoomRestriction {
            restriction_id,
            room_id: event.room_id,
            reservation_id: event.reservation_id,
            kind: event.kind,
            stay: event.stay,
            created_at: now,
            updated_at: now,
        });
        Ok(())
    }

    async fn reserve(&self, event: CreateReservation) -> AppResult<ReservationId> {
        // one lock for the whole check-then-insert sequence keeps the
        // double as atomic as the serializable transaction it stands for
        let mut inner = self.inner.lock().unwrap();
        if event.room_id == FAILING_ROOM_ID {
            return Err(AppError::NoRowsAffectedError(
                "no reservation record has been created".into(),
            ));
        }
        if inner.overlapping_restriction(event.room_id, &event.stay) {
            return Err(AppError::RoomUnavailable(format!(
                "room {} is already restricted between {} and {}",
                event.room_id, event.stay.start, event.stay.end
            )));
        }

        let now = Utc::now();
        let reservation_id = ReservationId::from_raw(inner.allocate_id());
        let room_name = inner.room_name(event.room_id);
        inner.reservations.push(Reservation {
            reservation_id,
            first_name: event.first_name,
            last_name: event.last_name,
            email: event.email,
            phone: event.phone,
            stay: event.stay,
            processed: false,
            created_at: now,
            updated_at: now,
            room: RoomSummary {
                room_id: event.room_id,
                room_name,
            },
        });
        let restriction_id = RestrictionId::from_raw(inner.allocate_id());
        inner.restrictions.push(RoomRestriction {
            restriction_id,
            room_id: event.room_id,
            reservation_id: Some(reservation_id),
            kind: RestrictionKind::Reservation,
            stay: event.stay,
            created_at: now,
            updated_at: now,
        });
        Ok(reservation_id)
    }

    async fn find_all(&self) -> AppResult<Vec<Reservation>> {
        let inner = self.inner.lock().unwrap();
        let mut reservations = inner.reservations.clone();
        reservations.sort_by_key(|r| r.stay.start);
        Ok(reservations)
    }

    async fn find_unprocessed(&self) -> AppResult<Vec<Reservation>> {
        let inner = self.inner.lock().unwrap();
        let mut reservations: Vec<Reservation> = inner
            .reservations
            .iter()
            .filter(|r| !r.processed)
            .cloned()
            .collect();
        reservations.sort_by_key(|r| r.stay.start);
        Ok(reservations)
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Reservation> {
        let inner = self.inner.lock().unwrap();
        inner
            .reservations
            .iter()
            .find(|r| r.reservation_id == reservation_id)
            .cloned()
            .ok_or_else(|| {
                AppError::EntityNotFound(format!("reservation {reservation_id} was not found"))
            })
    }

    async fn update_guest(&self, event: UpdateReservation) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let reservation = inner
            .reservations
            .iter_mut()
            .find(|r| r.reservation_id == event.reservation_id)
            .ok_or_else(|| AppError::EntityNotFound("specified reservation not found".into()))?;
        reservation.first_name = event.first_name;
        reservation.last_name = event.last_name;
        reservation.email = event.email;
        reservation.phone = event.phone;
        reservation.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, reservation_id: ReservationId) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.reservations.len();
        inner
            .reservations
            .retain(|r| r.reservation_id != reservation_id);
        if inner.reservations.len() == before {
            return Err(AppError::EntityNotFound(
                "specified reservation not found".into(),
            ));
        }
        Ok(())
    }

    async fn set_processed(&self, reservation_id: ReservationId, processed: bool) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let reservation = inner
            .reservations
            .iter_mut()
            .find(|r| r.reservation_id == reservation_id)
            .ok_or_else(|| AppError::EntityNotFound("specified reservation not found".into()))?;
        reservation.processed = processed;
        reservation.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<User> {
        let inner = self.inner.lock().unwrap();
        inner
            .users
            .iter()
            .find(|u| u.user_id == user_id)
            .cloned()
            .ok_or_else(|| AppError::EntityNotFound(format!("user {user_id} was not found")))
    }

    async fn update(&self, event: UpdateUser) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.user_id == event.user_id)
            .ok_or_else(|| AppError::EntityNotFound("specified user not found".into()))?;
        user.first_name = event.first_name;
        user.last_name = event.last_name;
        user.email = event.email;
        user.access_level = event.access_level;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<AuthenticatedUser> {
        let (user_id, password_hash) = {
            let inner = self.inner.lock().unwrap();
            let Some(user) = inner.users.iter().find(|u| u.email == email) else {
                return Err(AppError::InvalidCredentials);
            };
            (user.user_id, user.password_hash.clone())
        };

        let matches =
            bcrypt::verify(password, &password_hash).map_err(|_| AppError::InvalidCredentials)?;
        if !matches {
            return Err(AppError::InvalidCredentials);
        }

        Ok(AuthenticatedUser {
            user_id,
            password_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stay(start: (i32, u32, u32), end: (i32, u32, u32)) -> StayPeriod {
        StayPeriod::new(date(start.0, start.1, start.2), date(end.0, end.1, end.2))
    }

    fn booking_event(room_id: RoomId, period: StayPeriod) -> CreateReservation {
        CreateReservation::new(
            room_id,
            "John".into(),
            "Smith".into(),
            "john@example.com".into(),
            "555-0100".into(),
            period,
        )
    }

    #[tokio::test]
    async fn room_with_no_restrictions_is_available() {
        let repo = InMemoryRepository::new();
        let period = stay((2024, 6, 1), (2024, 6, 5));

        assert!(repo.is_available(SEEDED_ROOM_ID, period).await.unwrap());
        // unknown room ids also read as available rather than erroring
        assert!(repo.is_available(RoomId::new(), period).await.unwrap());
    }

    #[tokio::test]
    async fn overlapping_restriction_blocks_the_room() {
        let repo = InMemoryRepository::new();
        let room_id = repo.add_room("Room 5");
        repo.block_room(room_id, stay((2024, 6, 1), (2024, 6, 5)));

        let overlapping = stay((2024, 6, 3), (2024, 6, 7));
        assert!(!repo.is_available(room_id, overlapping).await.unwrap());

        let touching = stay((2024, 6, 5), (2024, 6, 10));
        assert!(repo.is_available(room_id, touching).await.unwrap());
    }

    #[tokio::test]
    async fn disjoint_restriction_leaves_other_dates_untouched() {
        let repo = InMemoryRepository::new();
        repo.block_room(SEEDED_ROOM_ID, stay((2024, 6, 1), (2024, 6, 3)));

        let elsewhere = stay((2024, 6, 10), (2024, 6, 12));
        assert!(repo.is_available(SEEDED_ROOM_ID, elsewhere).await.unwrap());
    }

    #[tokio::test]
    async fn availability_check_is_idempotent() {
        let repo = InMemoryRepository::new();
        repo.block_room(SEEDED_ROOM_ID, stay((2024, 6, 1), (2024, 6, 5)));
        let period = stay((2024, 6, 3), (2024, 6, 7));

        let first = repo.is_available(SEEDED_ROOM_ID, period).await.unwrap();
        let second = repo.is_available(SEEDED_ROOM_ID, period).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn find_available_returns_every_room_when_nothing_is_restricted() {
        let repo = InMemoryRepository::new();
        let rooms = repo
            .find_available(stay((2024, 6, 1), (2024, 6, 5)))
            .await
            .unwrap();
        assert_eq!(rooms.len(), 2);
    }

    #[tokio::test]
    async fn find_available_skips_restricted_rooms() {
        let repo = InMemoryRepository::new();
        repo.block_room(SEEDED_ROOM_ID, stay((2024, 6, 1), (2024, 6, 5)));

        let rooms = repo
            .find_available(stay((2024, 6, 3), (2024, 6, 7)))
            .await
            .unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].room_id, FAILING_ROOM_ID);
    }

    #[tokio::test]
    async fn reserve_records_reservation_and_matching_restriction() {
        let repo = InMemoryRepository::new();
        let period = stay((2024, 6, 1), (2024, 6, 5));

        let reservation_id = repo
            .reserve(booking_event(SEEDED_ROOM_ID, period))
            .await
            .unwrap();

        let reservation = repo.reservation(reservation_id).unwrap();
        assert_eq!(reservation.stay, period);
        assert_eq!(reservation.room.room_name, "General's Quarters");

        let restrictions = repo.restrictions_for(SEEDED_ROOM_ID);
        assert_eq!(restrictions.len(), 1);
        assert_eq!(restrictions[0].stay, period);
        assert_eq!(restrictions[0].reservation_id, Some(reservation_id));
        assert_eq!(restrictions[0].kind, RestrictionKind::Reservation);
    }

    #[tokio::test]
    async fn reserve_rejects_an_overlapping_stay() {
        let repo = InMemoryRepository::new();
        repo.reserve(booking_event(SEEDED_ROOM_ID, stay((2024, 6, 1), (2024, 6, 5))))
            .await
            .unwrap();

        let err = repo
            .reserve(booking_event(SEEDED_ROOM_ID, stay((2024, 6, 3), (2024, 6, 7))))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RoomUnavailable(_)));
        assert_eq!(repo.reservation_count(), 1);
    }

    #[tokio::test]
    async fn reserve_allows_back_to_back_stays() {
        let repo = InMemoryRepository::new();
        repo.reserve(booking_event(SEEDED_ROOM_ID, stay((2024, 6, 1), (2024, 6, 5))))
            .await
            .unwrap();

        repo.reserve(booking_event(SEEDED_ROOM_ID, stay((2024, 6, 5), (2024, 6, 10))))
            .await
            .unwrap();
        assert_eq!(repo.reservation_count(), 2);
    }

    #[tokio::test]
    async fn inserting_for_the_failing_room_returns_the_canned_error() {
        let repo = InMemoryRepository::new();
        let err = repo
            .create(booking_event(FAILING_ROOM_ID, stay((2024, 6, 1), (2024, 6, 5))))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoRowsAffectedError(_)));

        let err = repo
            .create_restriction(CreateRoomRestriction::new(
                FAILING_RESTRICTION_ROOM_ID,
                None,
                RestrictionKind::OwnerBlock,
                stay((2024, 6, 1), (2024, 6, 5)),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoRowsAffectedError(_)));
    }

    #[tokio::test]
    async fn listings_are_ordered_by_stay_start() {
        let repo = InMemoryRepository::new();
        let late = repo
            .reserve(booking_event(SEEDED_ROOM_ID, stay((2024, 7, 1), (2024, 7, 5))))
            .await
            .unwrap();
        let early = repo
            .reserve(booking_event(SEEDED_ROOM_ID, stay((2024, 6, 1), (2024, 6, 5))))
            .await
            .unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all[0].reservation_id, early);
        assert_eq!(all[1].reservation_id, late);
    }

    #[tokio::test]
    async fn processed_reservations_drop_out_of_the_unprocessed_listing() {
        let repo = InMemoryRepository::new();
        let reservation_id = repo
            .reserve(booking_event(SEEDED_ROOM_ID, stay((2024, 6, 1), (2024, 6, 5))))
            .await
            .unwrap();
        assert_eq!(repo.find_unprocessed().await.unwrap().len(), 1);

        repo.set_processed(reservation_id, true).await.unwrap();
        assert!(repo.find_unprocessed().await.unwrap().is_empty());
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_guest_rewrites_contact_fields_only() {
        let repo = InMemoryRepository::new();
        let period = stay((2024, 6, 1), (2024, 6, 5));
        let reservation_id = repo
            .reserve(booking_event(SEEDED_ROOM_ID, period))
            .await
            .unwrap();

        repo.update_guest(UpdateReservation::new(
            reservation_id,
            "Jane".into(),
            "Doe".into(),
            "jane@example.com".into(),
            "555-0199".into(),
        ))
        .await
        .unwrap();

        let reservation = repo.reservation(reservation_id).unwrap();
        assert_eq!(reservation.guest_name(), "Jane Doe");
        assert_eq!(reservation.stay, period);
    }

    #[tokio::test]
    async fn delete_removes_the_reservation() {
        let repo = InMemoryRepository::new();
        let reservation_id = repo
            .reserve(booking_event(SEEDED_ROOM_ID, stay((2024, 6, 1), (2024, 6, 5))))
            .await
            .unwrap();

        repo.delete(reservation_id).await.unwrap();
        assert!(repo.reservation(reservation_id).is_none());

        let err = repo.delete(reservation_id).await.unwrap_err();
        assert!(matches!(err, AppError::EntityNotFound(_)));
    }

    #[tokio::test]
    async fn user_updates_rewrite_profile_but_not_the_password() {
        let repo = InMemoryRepository::new();
        let user_id = repo.add_user(
            "Ada",
            "Admin",
            "ada@example.com",
            "$2b$04$not-a-real-hash",
            AccessLevel::Standard,
        );

        repo.update(UpdateUser::new(
            user_id,
            "Ada".into(),
            "Lovelace".into(),
            "ada@lovelace.example.com".into(),
            AccessLevel::Admin,
        ))
        .await
        .unwrap();

        let user = UserRepository::find_by_id(&repo, user_id).await.unwrap();
        assert_eq!(user.last_name, "Lovelace");
        assert_eq!(user.email, "ada@lovelace.example.com");
        assert_eq!(user.access_level, AccessLevel::Admin);
        assert_eq!(user.password_hash, "$2b$04$not-a-real-hash");
    }

    #[tokio::test]
    async fn unknown_users_are_reported_as_not_found() {
        let repo = InMemoryRepository::new();

        let err = UserRepository::find_by_id(&repo, UserId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EntityNotFound(_)));

        let err = repo
            .update(UpdateUser::new(
                UserId::new(),
                "Ada".into(),
                "Lovelace".into(),
                "ada@example.com".into(),
                AccessLevel::Standard,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EntityNotFound(_)));
    }

    #[tokio::test]
    async fn authenticate_accepts_the_right_password_and_nothing_else() {
        let repo = InMemoryRepository::new();
        // minimum cost keeps the test fast
        let hash = bcrypt::hash("password", 4).unwrap();
        let user_id = repo.add_user("Ada", "Admin", "ada@example.com", &hash, AccessLevel::Admin);

        let authenticated = repo.authenticate("ada@example.com", "password").await.unwrap();
        assert_eq!(authenticated.user_id, user_id);

        let err = repo
            .authenticate("ada@example.com", "wrong-password")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));

        // unknown address must not read differently from a bad password
        let err = repo
            .authenticate("nobody@example.com", "password")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }
}
