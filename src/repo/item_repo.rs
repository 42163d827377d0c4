use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::models::{Item, NewItem};
use crate::schema::items;

/// Creates a new item in the database
#[instrument(skip(pool, new_item), fields(owner_id = %new_item.owner_id, name = %new_item.name))]
pub fn create_item(pool: &DbPool, new_item: NewItem) -> Result<Item> {
    debug!("Creating new item");

    let conn = &mut pool.get()?;

    let item = diesel::insert_into(items::table)
        .values(&new_item)
        .get_result::<Item>(conn)?;

    info!("Successfully created item with id: {}", item.get_id());
    Ok(item)
}

/// Retrieves an item by id, or None when no such item exists
#[instrument(skip(pool))]
pub fn get_item(pool: &DbPool, item_id: i64) -> Result<Option<Item>> {
    let conn = &mut pool.get()?;

    let result = items::table
        .find(item_id)
        .first::<Item>(conn)
        .optional()?;

    Ok(result)
}

/// Checks whether an item with the given id exists
#[instrument(skip(pool))]
pub fn item_exists(pool: &DbPool, item_id: i64) -> Result<bool> {
    let conn = &mut pool.get()?;

    let exists = diesel::select(diesel::dsl::exists(items::table.find(item_id)))
        .get_result::<bool>(conn)?;

    Ok(exists)
}

/// Updates an item's name, description and/or availability by id
///
/// Fields passed as None are left unchanged. The caller must have verified
/// the item exists and that the requester owns it.
#[instrument(skip(pool, name, description, available))]
pub fn update_item(
    pool: &DbPool,
    item_id: i64,
    name: Option<String>,
    description: Option<String>,
    available: Option<bool>,
) -> Result<Item> {
    debug!("Updating item by id");

    // Changeset with only the fields that are Some
    #[derive(AsChangeset)]
    #[diesel(table_name = items)]
    struct ItemChangeset {
        name: Option<String>,
        description: Option<String>,
        available: Option<bool>,
    }

    let changeset = ItemChangeset {
        name,
        description,
        available,
    };

    if changeset.name.is_some() || changeset.description.is_some() || changeset.available.is_some()
    {
        let conn = &mut pool.get()?;
        diesel::update(items::table.find(item_id))
            .set(changeset)
            .execute(conn)?;
    }

    let updated = get_item(pool, item_id)?
        .ok_or_else(|| anyhow::anyhow!("Item with id {} not found", item_id))?;

    Ok(updated)
}

/// Deletes an item by id, returning the number of rows removed
#[instrument(skip(pool))]
pub fn delete_item(pool: &DbPool, item_id: i64) -> Result<usize> {
    debug!("Deleting item by id");

    let conn = &mut pool.get()?;

    let deleted = diesel::delete(items::table.find(item_id)).execute(conn)?;

    debug!("Deleted {} item rows for id: {}", deleted, item_id);
    Ok(deleted)
}

/// Retrieves the items listed by an owner, ordered by id
///
/// `page` is an optional `(offset, limit)` pair.
#[instrument(skip(pool))]
pub fn items_by_owner(pool: &DbPool, owner_id: i64, page: Option<(i64, i64)>) -> Result<Vec<Item>> {
    debug!("Listing items by owner");

    let conn = &mut pool.get()?;

    let mut query = items::table
        .filter(items::owner_id.eq(owner_id))
        .order(items::id.asc())
        .into_boxed();

    if let Some((offset, limit)) = page {
        query = query.offset(offset).limit(limit);
    }

    let result = query.load::<Item>(conn)?;

    info!("Retrieved {} items for owner {}", result.len(), owner_id);
    Ok(result)
}

/// Searches available items whose name or description contains the text
///
/// Matching is case-insensitive (SQLite LIKE is case-insensitive for ASCII).
/// Blank search text is handled by the caller, which short-circuits to an
/// empty list without touching the database.
#[instrument(skip(pool))]
pub fn search_items(pool: &DbPool, text: &str, page: Option<(i64, i64)>) -> Result<Vec<Item>> {
    debug!("Searching items");

    let conn = &mut pool.get()?;

    let pattern = format!("%{text}%");
    let mut query = items::table
        .filter(items::available.eq(true))
        .filter(
            items::name
                .like(pattern.clone())
                .or(items::description.like(pattern)),
        )
        .order(items::id.asc())
        .into_boxed();

    if let Some((offset, limit)) = page {
        query = query.offset(offset).limit(limit);
    }

    let result = query.load::<Item>(conn)?;

    info!("Search matched {} items", result.len());
    Ok(result)
}

/// Retrieves the items posted in answer to a given request
#[instrument(skip(pool))]
pub fn items_by_request(pool: &DbPool, request_id: i64) -> Result<Vec<Item>> {
    let conn = &mut pool.get()?;

    let result = items::table
        .filter(items::request_id.eq(request_id))
        .order(items::id.asc())
        .load::<Item>(conn)?;

    Ok(result)
}
