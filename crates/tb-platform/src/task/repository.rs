//! Task Repository

use futures::TryStreamExt;
use mongodb::{bson::doc, Collection, Database};

use crate::shared::error::Result;
use crate::task::entity::Task;

pub struct TaskRepository {
    collection: Collection<Task>,
}

impl TaskRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("tasks"),
        }
    }

    pub async fn insert(&self, task: &Task) -> Result<()> {
        self.collection.insert_one(task).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_all(&self) -> Result<Vec<Task>> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<Task>> {
        let cursor = self.collection.find(doc! { "userId": user_id }).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn update(&self, task: &Task) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &task.id }, task)
            .await?;
        Ok(())
    }
}
