use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::{Sqlite, SqliteValue};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a booking
///
/// A booking is created as `Waiting` and moves to `Approved` or `Rejected`
/// when the item's owner decides on it. `Canceled` is reserved for bookers
/// withdrawing their own bookings.
///
/// Stored in the `status` column as its SCREAMING_SNAKE_CASE name, which is
/// also how it appears on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
    Canceled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(BookingStatus::Waiting),
            "APPROVED" => Ok(BookingStatus::Approved),
            "REJECTED" => Ok(BookingStatus::Rejected),
            "CANCELED" => Ok(BookingStatus::Canceled),
            other => Err(format!("Unknown booking status: {other}")),
        }
    }
}

impl ToSql<Text, Sqlite> for BookingStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for BookingStatus {
    fn from_sql(bytes: SqliteValue<'_, '_, '_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        s.parse::<BookingStatus>().map_err(Into::into)
    }
}

/// State filter for booking list queries
///
/// Unlike [`BookingStatus`] this is not stored anywhere; it selects which
/// bookings a list endpoint returns. `Waiting` and `Rejected` filter on
/// status, the rest compare the booking interval against the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl FromStr for BookingState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(BookingState::All),
            "CURRENT" => Ok(BookingState::Current),
            "PAST" => Ok(BookingState::Past),
            "FUTURE" => Ok(BookingState::Future),
            "WAITING" => Ok(BookingState::Waiting),
            "REJECTED" => Ok(BookingState::Rejected),
            other => Err(format!("Unknown state: {other}")),
        }
    }
}

/// A reservation of an item for a time interval
///
/// This struct maps directly to the `bookings` table. The interval is
/// half-open in spirit: a booking is "current" while
/// `start_date <= now < end_date`.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::bookings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Booking {
    /// Unique identifier, assigned by the database
    id: i64,

    /// When the reservation begins
    start_date: NaiveDateTime,

    /// When the reservation ends
    end_date: NaiveDateTime,

    /// The reserved item
    item_id: i64,

    /// The user who placed the booking
    booker_id: i64,

    /// Current lifecycle status
    status: BookingStatus,
}

/// Insertable companion of [`Booking`]
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::bookings)]
pub struct NewBooking {
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub item_id: i64,
    pub booker_id: i64,
    pub status: BookingStatus,
}

impl Booking {
    pub fn get_id(&self) -> i64 {
        self.id
    }

    pub fn get_start(&self) -> NaiveDateTime {
        self.start_date
    }

    pub fn get_end(&self) -> NaiveDateTime {
        self.end_date
    }

    pub fn get_item_id(&self) -> i64 {
        self.item_id
    }

    pub fn get_booker_id(&self) -> i64 {
        self.booker_id
    }

    pub fn get_status(&self) -> BookingStatus {
        self.status
    }
}
