use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A registered user of the sharing service
///
/// This struct maps directly to the `users` table. The email address is
/// unique across all users; the database enforces that.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    /// Unique identifier, assigned by the database
    id: i64,

    /// Display name of the user
    name: String,

    /// Email address, unique per user
    email: String,
}

/// Insertable companion of [`User`]
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl User {
    /// Gets the user's ID
    pub fn get_id(&self) -> i64 {
        self.id
    }

    /// Gets the user's display name
    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    /// Gets the user's email address
    pub fn get_email(&self) -> String {
        self.email.clone()
    }
}
