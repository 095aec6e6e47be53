use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::repository::{
    reservation::PgReservationRepository, room::PgRoomRepository, user::PgUserRepository,
};
use kernel::booking::BookingService;
use kernel::repository::{
    notification::NotificationQueue, reservation::ReservationRepository, room::RoomRepository,
    user::UserRepository,
};
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    room_repository: Arc<dyn RoomRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
    user_repository: Arc<dyn UserRepository>,
    booking_service: Arc<BookingService>,
}

impl AppRegistry {
    pub fn new(
        pool: ConnectionPool,
        notification_queue: Arc<dyn NotificationQueue>,
        app_config: AppConfig,
    ) -> Self {
        let room_repository: Arc<dyn RoomRepository> =
            Arc::new(PgRoomRepository::new(pool.clone()));
        let reservation_repository: Arc<dyn ReservationRepository> =
            Arc::new(PgReservationRepository::new(pool.clone()));
        let user_repository: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool));
        let booking_service = Arc::new(BookingService::new(
            room_repository.clone(),
            reservation_repository.clone(),
            notification_queue,
            app_config.mail.from.clone(),
        ));
        Self {
            room_repository,
            reservation_repository,
            user_repository,
            booking_service,
        }
    }

    pub fn room_repository(&self) -> Arc<dyn RoomRepository> {
        self.room_repository.clone()
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn booking_service(&self) -> Arc<BookingService> {
        self.booking_service.clone()
    }
}
