use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::bookings::domain::model::BookingEntity;
use crate::core::sharing::{BookingStatus, SharingError};
use crate::utils::date::format_date;

/// Selector used when listing bookings, each one is evaluated against "now".
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingState {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl FromStr for BookingState {
    type Err = SharingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALL" => Ok(BookingState::All),
            "CURRENT" => Ok(BookingState::Current),
            "PAST" => Ok(BookingState::Past),
            "FUTURE" => Ok(BookingState::Future),
            "WAITING" => Ok(BookingState::Waiting),
            "REJECTED" => Ok(BookingState::Rejected),
            _ => Err(SharingError::invalid_argument(format!("unknown state: {}", s).as_str())),
        }
    }
}

impl Display for BookingState {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            BookingState::All => write!(f, "ALL"),
            BookingState::Current => write!(f, "CURRENT"),
            BookingState::Past => write!(f, "PAST"),
            BookingState::Future => write!(f, "FUTURE"),
            BookingState::Waiting => write!(f, "WAITING"),
            BookingState::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// Which side of the booking a listing is filtered by.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Viewpoint {
    Booker,
    Owner,
}

impl Viewpoint {
    pub fn attribute(&self) -> &'static str {
        match self {
            Viewpoint::Booker => "booker_id",
            Viewpoint::Owner => "owner_id",
        }
    }

    pub fn user_of<'a>(&self, booking: &'a BookingEntity) -> &'a str {
        match self {
            Viewpoint::Booker => booking.booker_id.as_str(),
            Viewpoint::Owner => booking.owner_id.as_str(),
        }
    }
}

/// StatePredicate binds a state to the instant it is evaluated at. CURRENT includes both bounds.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct StatePredicate {
    pub state: BookingState,
    pub now: NaiveDateTime,
}

impl StatePredicate {
    pub fn new(state: BookingState, now: NaiveDateTime) -> Self {
        Self { state, now }
    }

    pub fn matches(&self, booking: &BookingEntity) -> bool {
        match self.state {
            BookingState::All => true,
            BookingState::Current => booking.start_at <= self.now && self.now <= booking.end_at,
            BookingState::Past => booking.end_at < self.now,
            BookingState::Future => booking.start_at > self.now,
            BookingState::Waiting => booking.booking_status == BookingStatus::Waiting,
            BookingState::Rejected => booking.booking_status == BookingStatus::Rejected,
        }
    }

    // attribute conditions using the "name:op" convention of the repositories
    pub fn conditions(&self) -> HashMap<String, String> {
        let now = format_date(self.now);
        match self.state {
            BookingState::All => HashMap::new(),
            BookingState::Current => HashMap::from([
                ("start_at:<=".to_string(), now.clone()),
                ("end_at:>=".to_string(), now),
            ]),
            BookingState::Past => HashMap::from([("end_at:<".to_string(), now)]),
            BookingState::Future => HashMap::from([("start_at:>".to_string(), now)]),
            BookingState::Waiting => HashMap::from([
                ("booking_status".to_string(), BookingStatus::Waiting.to_string())]),
            BookingState::Rejected => HashMap::from([
                ("booking_status".to_string(), BookingStatus::Rejected.to_string())]),
        }
    }
}

// newest start first, ties broken by id so that pages are stable
pub(crate) fn sort_by_start_desc(bookings: &mut [BookingEntity]) {
    bookings.sort_by(|a, b| b.start_at.cmp(&a.start_at).then_with(|| b.booking_id.cmp(&a.booking_id)));
}
