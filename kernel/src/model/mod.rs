pub mod id;
pub mod notification;
pub mod period;
pub mod reservation;
pub mod restriction;
pub mod room;
pub mod user;
