//! Development Data Seeder
//!
//! Seeds development data on application startup: a couple of approved
//! accounts, a couple still pending approval, and one sample task. Seeding
//! is idempotent; existing records are left alone.
//!
//! Default credentials (all accounts): DevPassword123!

use mongodb::Database;
use tracing::info;

use crate::auth::password_service::{Argon2Config, PasswordService};
use crate::shared::error::Result;
use crate::task::entity::Task;
use crate::task::repository::TaskRepository;
use crate::user::entity::{Role, User};
use crate::user::repository::UserRepository;

const DEV_PASSWORD: &str = "DevPassword123!";

/// Development data seeder.
pub struct DevDataSeeder {
    user_repo: UserRepository,
    task_repo: TaskRepository,
    password_service: PasswordService,
}

impl DevDataSeeder {
    pub fn new(db: &Database) -> Self {
        // Low-cost hashing keeps startup fast; still Argon2id.
        Self {
            user_repo: UserRepository::new(db),
            task_repo: TaskRepository::new(db),
            password_service: PasswordService::new(Argon2Config::testing()),
        }
    }

    /// Seed all development data.
    pub async fn seed(&self) -> Result<()> {
        info!("Seeding development data...");

        self.seed_users().await?;
        self.seed_tasks().await?;

        info!("Development data seeded");
        info!("Default logins (password {}):", DEV_PASSWORD);
        info!("  Admin:        admin");
        info!("  Active user:  ramesh");
        info!("  Pending user: roja");

        Ok(())
    }

    async fn seed_users(&self) -> Result<()> {
        let password_hash = self.password_service.hash_password(DEV_PASSWORD)?;

        let seeds = [
            User::new(
                "admin",
                "admin@taskboard.local",
                password_hash.clone(),
                "Admin Ramesh",
            )
            .with_role(Role::Admin)
            .with_enabled(true),
            User::new(
                "ramesh",
                "ramesh@taskboard.local",
                password_hash.clone(),
                "M Ramesh K",
            )
            .with_enabled(true),
            User::new(
                "roja",
                "roja@taskboard.local",
                password_hash.clone(),
                "M Roja X",
            ),
            User::new(
                "jatin",
                "jatin@taskboard.local",
                password_hash,
                "Jatin Trivedi",
            ),
        ];

        for user in seeds {
            self.create_user_if_not_exists(user).await?;
        }

        Ok(())
    }

    async fn create_user_if_not_exists(&self, user: User) -> Result<()> {
        if self
            .user_repo
            .find_by_username(&user.username)
            .await?
            .is_some()
        {
            return Ok(());
        }

        info!(username = %user.username, role = user.role.as_str(), "Created dev account");
        self.user_repo.insert(&user).await?;

        Ok(())
    }

    async fn seed_tasks(&self) -> Result<()> {
        if !self.task_repo.find_by_user("ramesh").await?.is_empty() {
            return Ok(());
        }

        let task = Task::new("Report Generation", "ramesh", None);
        self.task_repo.insert(&task).await?;
        info!(task_id = %task.id, "Created sample task");

        Ok(())
    }
}
