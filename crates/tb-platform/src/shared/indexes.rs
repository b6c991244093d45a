//! MongoDB Index Initialization
//!
//! Creates the unique indexes the platform relies on at application startup.
//! Account uniqueness (email, full name; username is the `_id`) is enforced
//! here rather than in application code, so concurrent registrations with
//! colliding fields have exactly one winner.

use mongodb::{bson::doc, options::IndexOptions, Database, IndexModel};
use tracing::info;

/// Initialize all MongoDB indexes.
pub async fn initialize_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    create_user_indexes(db).await?;
    create_task_indexes(db).await?;

    info!("MongoDB indexes initialized");
    Ok(())
}

async fn create_user_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let users = db.collection::<mongodb::bson::Document>("users");

    // Email lookup (unique)
    users
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        )
        .await?;

    // Full name (unique)
    users
        .create_index(
            IndexModel::builder()
                .keys(doc! { "fullName": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        )
        .await?;

    // Role filtering for the same-role username listing
    users
        .create_index(
            IndexModel::builder()
                .keys(doc! { "role": 1 })
                .build(),
        )
        .await?;

    info!("Created indexes on users");
    Ok(())
}

async fn create_task_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let tasks = db.collection::<mongodb::bson::Document>("tasks");

    // Owner filtering
    tasks
        .create_index(
            IndexModel::builder()
                .keys(doc! { "userId": 1 })
                .build(),
        )
        .await?;

    info!("Created indexes on tasks");
    Ok(())
}
