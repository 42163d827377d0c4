use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A comment left on an item by a past booker
///
/// This struct maps directly to the `comments` table. Only users with a
/// completed (approved and started) booking of the item may comment; that
/// rule lives in the comment handler.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::comments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Comment {
    /// Unique identifier, assigned by the database
    id: i64,

    /// The comment body
    text: String,

    /// The commented item
    item_id: i64,

    /// The user who wrote the comment
    author_id: i64,

    /// When the comment was posted
    created: NaiveDateTime,
}

/// Insertable companion of [`Comment`]
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment {
    pub text: String,
    pub item_id: i64,
    pub author_id: i64,
    pub created: NaiveDateTime,
}

impl Comment {
    pub fn get_id(&self) -> i64 {
        self.id
    }

    pub fn get_text(&self) -> String {
        self.text.clone()
    }

    pub fn get_item_id(&self) -> i64 {
        self.item_id
    }

    pub fn get_author_id(&self) -> i64 {
        self.author_id
    }

    pub fn get_created(&self) -> NaiveDateTime {
        self.created
    }
}
