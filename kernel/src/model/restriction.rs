use crate::model::{
    id::{ReservationId, RestrictionId, RoomId},
    period::StayPeriod,
};
use chrono::{DateTime, Utc};
use derive_new::new;
use shared::error::AppError;

/// A blocked date interval on a room. This is the unit availability is
/// computed against; a booked stay is recorded as exactly one restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRestriction {
    pub restriction_id: RestrictionId,
    pub room_id: RoomId,
    /// None for operator blocks that exist without an owning reservation.
    pub reservation_id: Option<ReservationId>,
    pub kind: RestrictionKind,
    pub stay: StayPeriod,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionKind {
    Reservation,
    OwnerBlock,
}

impl RestrictionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestrictionKind::Reservation => "reservation",
            RestrictionKind::OwnerBlock => "owner_block",
        }
    }
}

impl TryFrom<&str> for RestrictionKind {
    type Error = AppError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "reservation" => Ok(RestrictionKind::Reservation),
            "owner_block" => Ok(RestrictionKind::OwnerBlock),
            v => Err(AppError::ConversionEntityError(format!(
                "unknown restriction kind: {v}"
            ))),
        }
    }
}

#[derive(Debug, Clone, new)]
pub struct CreateRoomRestriction {
    pub room_id: RoomId,
    pub reservation_id: Option<ReservationId>,
    pub kind: RestrictionKind,
    pub stay: StayPeriod,
}
