use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A request for an item nobody has listed yet
///
/// This struct maps directly to the `requests` table. Items listed later may
/// point back at the request through their `request_id` column, which is how
/// "answers" to a request are found.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ItemRequest {
    /// Unique identifier, assigned by the database
    id: i64,

    /// What the requestor is looking for
    description: String,

    /// The user who posted the request
    requestor_id: i64,

    /// When the request was posted
    created: NaiveDateTime,
}

/// Insertable companion of [`ItemRequest`]
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::requests)]
pub struct NewItemRequest {
    pub description: String,
    pub requestor_id: i64,
    pub created: NaiveDateTime,
}

impl ItemRequest {
    pub fn get_id(&self) -> i64 {
        self.id
    }

    pub fn get_description(&self) -> String {
        self.description.clone()
    }

    pub fn get_requestor_id(&self) -> i64 {
        self.requestor_id
    }

    pub fn get_created(&self) -> NaiveDateTime {
        self.created
    }
}
