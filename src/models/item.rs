use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A shareable item listed by an owner
///
/// This struct maps directly to the `items` table. `available` controls
/// whether new bookings may be placed against the item; `request_id` is set
/// when the item was listed in answer to an item request.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Item {
    /// Unique identifier, assigned by the database
    id: i64,

    /// Short name of the item
    name: String,

    /// Free-form description
    description: String,

    /// Whether the item can currently be booked
    available: bool,

    /// The user who listed the item
    owner_id: i64,

    /// The item request this item answers, if any
    request_id: Option<i64>,
}

/// Insertable companion of [`Item`]
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::items)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
}

impl Item {
    pub fn get_id(&self) -> i64 {
        self.id
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_description(&self) -> String {
        self.description.clone()
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn get_owner_id(&self) -> i64 {
        self.owner_id
    }

    pub fn get_request_id(&self) -> Option<i64> {
        self.request_id
    }
}
