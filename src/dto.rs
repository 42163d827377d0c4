use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{Booking, BookingStatus, Comment, Item, ItemRequest, User};

/// Data transfer object for creating a new user
#[derive(Deserialize, Debug)]
pub struct CreateUserDto {
    /// Display name of the user
    pub name: String,

    /// Email address, unique per user
    pub email: String,
}

/// Data transfer object for partially updating a user
///
/// Absent fields are left unchanged.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct UpdateUserDto {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Data transfer object for listing a new item
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemDto {
    /// Short name of the item
    pub name: Option<String>,

    /// Free-form description
    pub description: Option<String>,

    /// Whether the item can be booked right away
    pub available: Option<bool>,

    /// The item request this listing answers, if any
    #[serde(default)]
    pub request_id: Option<i64>,
}

/// Data transfer object for partially updating an item
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct UpdateItemDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

/// Data transfer object for placing a booking
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingDto {
    /// The item to reserve
    pub item_id: i64,

    /// When the reservation begins
    pub start: Option<NaiveDateTime>,

    /// When the reservation ends
    pub end: Option<NaiveDateTime>,
}

/// Data transfer object for posting a comment on an item
#[derive(Deserialize, Debug)]
pub struct CreateCommentDto {
    /// The comment body
    pub text: String,
}

/// Data transfer object for posting an item request
#[derive(Deserialize, Debug)]
pub struct CreateRequestDto {
    /// What the requestor is looking for
    pub description: String,
}

/// Query parameters shared by paginated list endpoints
///
/// Pagination only applies when both `from` and `size` are present, matching
/// the behavior clients of this API rely on.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct PageQuery {
    /// Offset of the first element to return
    pub from: Option<i64>,

    /// Maximum number of elements to return
    pub size: Option<i64>,
}

/// Query parameters for booking list endpoints
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct BookingListQuery {
    /// State filter, defaults to ALL
    pub state: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// Query parameters for the item search endpoint
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct SearchQuery {
    /// Text to match against item names and descriptions
    pub text: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// Query parameter for the booking decision endpoint
#[derive(Deserialize, Debug)]
pub struct ApprovedQuery {
    pub approved: bool,
}

/// An item as rendered in list and creation responses
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<i64>,
}

impl ItemDto {
    pub fn from_item(item: &Item) -> Self {
        Self {
            id: item.get_id(),
            name: item.get_name(),
            description: item.get_description(),
            available: item.is_available(),
            request_id: item.get_request_id(),
        }
    }
}

/// A compact booking reference, used for an item's last/next booking
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookingRefDto {
    pub id: i64,
    pub booker_id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: BookingStatus,
}

impl BookingRefDto {
    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            id: booking.get_id(),
            booker_id: booking.get_booker_id(),
            start: booking.get_start(),
            end: booking.get_end(),
            status: booking.get_status(),
        }
    }
}

/// A booking with its item and booker expanded
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BookingDto {
    pub id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: BookingStatus,
    pub item: ItemDto,
    pub booker: User,
}

impl BookingDto {
    pub fn from_parts(booking: &Booking, item: &Item, booker: User) -> Self {
        Self {
            id: booking.get_id(),
            start: booking.get_start(),
            end: booking.get_end(),
            status: booking.get_status(),
            item: ItemDto::from_item(item),
            booker,
        }
    }
}

/// A comment with its author's name resolved
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: i64,
    pub text: String,
    pub author_name: String,
    pub created: NaiveDateTime,
}

impl CommentDto {
    pub fn from_parts(comment: &Comment, author_name: String) -> Self {
        Self {
            id: comment.get_id(),
            text: comment.get_text(),
            author_name,
            created: comment.get_created(),
        }
    }
}

/// An item with booking context and comments, as rendered to its owner
///
/// `last_booking` and `next_booking` are only populated when the requesting
/// user owns the item; other users see them as null.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetailsDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub last_booking: Option<BookingRefDto>,
    pub next_booking: Option<BookingRefDto>,
    pub comments: Vec<CommentDto>,
}

impl ItemDetailsDto {
    pub fn from_item(item: &Item) -> Self {
        Self {
            id: item.get_id(),
            name: item.get_name(),
            description: item.get_description(),
            available: item.is_available(),
            last_booking: None,
            next_booking: None,
            comments: Vec::new(),
        }
    }
}

/// An item request with the items posted in answer to it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RequestDto {
    pub id: i64,
    pub description: String,
    pub requestor: i64,
    pub created: NaiveDateTime,
    pub items: Vec<ItemDto>,
}

impl RequestDto {
    pub fn from_parts(request: &ItemRequest, items: Vec<ItemDto>) -> Self {
        Self {
            id: request.get_id(),
            description: request.get_description(),
            requestor: request.get_requestor_id(),
            created: request.get_created(),
            items,
        }
    }
}
