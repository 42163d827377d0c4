use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::models::{Comment, NewComment};
use crate::schema::{comments, users};

/// Creates a new comment in the database
#[instrument(skip(pool, new_comment), fields(item_id = %new_comment.item_id, author_id = %new_comment.author_id))]
pub fn create_comment(pool: &DbPool, new_comment: NewComment) -> Result<Comment> {
    debug!("Creating new comment");

    let conn = &mut pool.get()?;

    let comment = diesel::insert_into(comments::table)
        .values(&new_comment)
        .get_result::<Comment>(conn)?;

    info!("Successfully created comment with id: {}", comment.get_id());
    Ok(comment)
}

/// Retrieves an item's comments with their author names, oldest first
#[instrument(skip(pool))]
pub fn comments_for_item(pool: &DbPool, item_id: i64) -> Result<Vec<(Comment, String)>> {
    let conn = &mut pool.get()?;

    let result = comments::table
        .inner_join(users::table)
        .filter(comments::item_id.eq(item_id))
        .select((Comment::as_select(), users::name))
        .order(comments::created.asc())
        .load::<(Comment, String)>(conn)?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewItem, NewUser};
    use crate::repo::tests::setup_test_db;
    use crate::repo::{create_item, create_user};
    use chrono::{Duration, Utc};

    #[test]
    fn test_create_and_list_comments() {
        let pool = setup_test_db();

        let owner = create_user(
            &pool,
            NewUser {
                name: "Owner".into(),
                email: "owner@example.com".into(),
            },
        )
        .unwrap();
        let author = create_user(
            &pool,
            NewUser {
                name: "Ada".into(),
                email: "ada@example.com".into(),
            },
        )
        .unwrap();
        let item = create_item(
            &pool,
            NewItem {
                name: "Drill".into(),
                description: "Cordless drill".into(),
                available: true,
                owner_id: owner.get_id(),
                request_id: None,
            },
        )
        .unwrap();

        let now = Utc::now().naive_utc();
        let later = create_comment(
            &pool,
            NewComment {
                text: "Second".into(),
                item_id: item.get_id(),
                author_id: author.get_id(),
                created: now,
            },
        )
        .unwrap();
        let earlier = create_comment(
            &pool,
            NewComment {
                text: "First".into(),
                item_id: item.get_id(),
                author_id: author.get_id(),
                created: now - Duration::hours(1),
            },
        )
        .unwrap();

        let listed = comments_for_item(&pool, item.get_id()).unwrap();
        assert_eq!(listed.len(), 2);
        // Oldest first, each paired with the author's name
        assert_eq!(listed[0].0.get_id(), earlier.get_id());
        assert_eq!(listed[0].1, "Ada");
        assert_eq!(listed[1].0.get_id(), later.get_id());
    }

    #[test]
    fn test_comments_for_item_without_comments() {
        let pool = setup_test_db();
        assert!(comments_for_item(&pool, 9999).unwrap().is_empty());
    }
}
