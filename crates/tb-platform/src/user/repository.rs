//! User Repository

use futures::TryStreamExt;
use mongodb::{bson::doc, Collection, Database};

use crate::shared::error::{is_duplicate_key, PlatformError, Result};
use crate::user::entity::{Role, User};

pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }

    /// Insert a new account. A unique-index collision on username, email,
    /// or full name surfaces as `Duplicate`.
    pub async fn insert(&self, user: &User) -> Result<()> {
        self.collection.insert_one(user).await.map_err(|e| {
            if is_duplicate_key(&e) {
                PlatformError::duplicate(
                    "user",
                    "username, email or full name",
                    user.username.as_str(),
                )
            } else {
                e.into()
            }
        })?;
        Ok(())
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.collection.find_one(doc! { "_id": username }).await?)
    }

    pub async fn find_all(&self) -> Result<Vec<User>> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_role(&self, role: Role) -> Result<Vec<User>> {
        let cursor = self
            .collection
            .find(doc! { "role": role.as_str() })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// All accounts except the given username (the approval listing never
    /// includes the requesting administrator).
    pub async fn find_all_except(&self, username: &str) -> Result<Vec<User>> {
        let cursor = self
            .collection
            .find(doc! { "_id": { "$ne": username } })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn update(&self, user: &User) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &user.username }, user)
            .await?;
        Ok(())
    }
}
