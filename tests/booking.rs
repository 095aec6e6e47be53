use adapter::repository::memory::{InMemoryRepository, FAILING_ROOM_ID, SEEDED_ROOM_ID};
use chrono::NaiveDate;
use kernel::booking::{BookingRequest, BookingService};
use kernel::model::{id::RoomId, notification::Notification, period::StayPeriod};
use kernel::repository::{notification::NotificationQueue, reservation::ReservationRepository};
use shared::error::AppError;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingQueue {
    queued: Mutex<Vec<Notification>>,
}

impl RecordingQueue {
    fn queued(&self) -> Vec<Notification> {
        self.queued.lock().unwrap().clone()
    }
}

impl NotificationQueue for RecordingQueue {
    fn enqueue(&self, notification: Notification) {
        self.queued.lock().unwrap().push(notification);
    }
}

fn setup() -> (Arc<InMemoryRepository>, Arc<RecordingQueue>, BookingService) {
    let repo = Arc::new(InMemoryRepository::new());
    let queue = Arc::new(RecordingQueue::default());
    let service = BookingService::new(
        repo.clone(),
        repo.clone(),
        queue.clone(),
        "desk@example.com".into(),
    );
    (repo, queue, service)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn request(room_id: RoomId, start: NaiveDate, end: NaiveDate) -> BookingRequest {
    BookingRequest::new(
        room_id,
        "John".into(),
        "Smith".into(),
        "john@example.com".into(),
        "555-0100".into(),
        StayPeriod::new(start, end),
    )
}

#[tokio::test]
async fn a_booking_stores_reservation_restriction_and_two_mails() {
    let (repo, queue, service) = setup();

    let reservation_id = service
        .book(request(SEEDED_ROOM_ID, date(2024, 6, 1), date(2024, 6, 5)))
        .await
        .unwrap();

    let reservation = repo.find_by_id(reservation_id).await.unwrap();
    assert_eq!(reservation.stay, StayPeriod::new(date(2024, 6, 1), date(2024, 6, 5)));
    assert!(!reservation.processed);

    let restrictions = repo.restrictions_for(SEEDED_ROOM_ID);
    assert_eq!(restrictions.len(), 1);
    assert_eq!(restrictions[0].stay, reservation.stay);
    assert_eq!(restrictions[0].reservation_id, Some(reservation_id));

    let queued = queue.queued();
    assert_eq!(queued.len(), 2);
    // guest confirmation goes out wrapped in the HTML shell
    assert_eq!(queued[0].to, "john@example.com");
    assert_eq!(queued[0].template.as_deref(), Some("basic"));
    // the house copy is plain content
    assert_eq!(queued[1].to, "desk@example.com");
    assert_eq!(queued[1].template, None);
}

#[tokio::test]
async fn a_conflicting_booking_leaves_no_side_effects() {
    let (repo, queue, service) = setup();
    service
        .book(request(SEEDED_ROOM_ID, date(2024, 6, 1), date(2024, 6, 5)))
        .await
        .unwrap();
    let mails_after_first = queue.queued().len();

    let err = service
        .book(request(SEEDED_ROOM_ID, date(2024, 6, 3), date(2024, 6, 7)))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::RoomUnavailable(_)));
    assert_eq!(repo.reservation_count(), 1);
    assert_eq!(repo.restrictions_for(SEEDED_ROOM_ID).len(), 1);
    assert_eq!(queue.queued().len(), mails_after_first);
}

#[tokio::test]
async fn back_to_back_stays_are_both_accepted() {
    let (repo, _queue, service) = setup();
    service
        .book(request(SEEDED_ROOM_ID, date(2024, 6, 1), date(2024, 6, 5)))
        .await
        .unwrap();
    service
        .book(request(SEEDED_ROOM_ID, date(2024, 6, 5), date(2024, 6, 10)))
        .await
        .unwrap();

    assert_eq!(repo.reservation_count(), 2);
}

#[tokio::test]
async fn an_inverted_stay_is_rejected_before_touching_storage() {
    let (repo, queue, service) = setup();

    let err = service
        .book(request(SEEDED_ROOM_ID, date(2024, 6, 5), date(2024, 6, 1)))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
    assert_eq!(repo.reservation_count(), 0);
    assert!(queue.queued().is_empty());
}

#[tokio::test]
async fn an_unknown_room_is_reported_as_not_found() {
    let (_repo, _queue, service) = setup();

    let err = service
        .book(request(RoomId::new(), date(2024, 6, 1), date(2024, 6, 5)))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::EntityNotFound(_)));
}

#[tokio::test]
async fn a_storage_failure_surfaces_and_queues_no_mail() {
    let (repo, queue, service) = setup();

    // the second seeded room is the documented insertion-failure fixture
    let err = service
        .book(request(FAILING_ROOM_ID, date(2024, 6, 1), date(2024, 6, 5)))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NoRowsAffectedError(_)));
    assert_eq!(repo.reservation_count(), 0);
    assert!(queue.queued().is_empty());
}

#[tokio::test]
async fn availability_search_narrows_as_rooms_fill_up() {
    let (_repo, _queue, service) = setup();
    let stay = StayPeriod::new(date(2024, 6, 1), date(2024, 6, 5));

    let rooms = service.search_availability(stay).await.unwrap();
    assert_eq!(rooms.len(), 2);

    service
        .book(request(SEEDED_ROOM_ID, date(2024, 6, 1), date(2024, 6, 5)))
        .await
        .unwrap();

    let rooms = service.search_availability(stay).await.unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].room_id, FAILING_ROOM_ID);
}

#[tokio::test]
async fn availability_search_validates_the_period() {
    let (_repo, _queue, service) = setup();

    let err = service
        .search_availability(StayPeriod::new(date(2024, 6, 5), date(2024, 6, 5)))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
}
