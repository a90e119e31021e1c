//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations
//! with proper error handling.

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
};

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> &DatabaseConnection {
        self.pool.conn()
    }

    // ========================================================================
    // User Operations
    // ========================================================================

    /// Create a new user; fails with `Duplicate` when the username is taken
    pub async fn create_user(&self, username: String, password_hash: String) -> Result<User> {
        let user = UserActiveModel {
            username: Set(username.clone()),
            password_hash: Set(password_hash),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        user.insert(self.conn()).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Duplicate {
                message: format!("username '{}' is already taken", username),
            },
            _ => e.into(),
        })
    }

    /// Find user by ID
    pub async fn find_user_by_id(&self, id: i32) -> Result<Option<User>> {
        UserEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Find user by username
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        UserEntity::find()
            .filter(UserColumn::Username.eq(username))
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Article Operations
    // ========================================================================

    /// Create a new article owned by `user_id`
    pub async fn create_article(
        &self,
        user_id: i32,
        title: String,
        content: String,
    ) -> Result<Article> {
        let article = ArticleActiveModel {
            title: Set(title),
            content: Set(content),
            user_id: Set(user_id),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        article.insert(self.conn()).await.map_err(Into::into)
    }

    /// List a user's articles, newest first
    pub async fn list_articles_by_user(&self, user_id: i32) -> Result<Vec<Article>> {
        ArticleEntity::find()
            .filter(ArticleColumn::UserId.eq(user_id))
            .order_by_desc(ArticleColumn::CreatedAt)
            .order_by_desc(ArticleColumn::Id)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Find article by ID
    pub async fn find_article_by_id(&self, id: i32) -> Result<Option<Article>> {
        ArticleEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Find article by ID together with its author
    pub async fn find_article_with_author(
        &self,
        id: i32,
    ) -> Result<Option<(Article, Option<User>)>> {
        ArticleEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Delete article by ID
    pub async fn delete_article(&self, id: i32) -> Result<bool> {
        let result = ArticleEntity::delete_by_id(id).exec(self.conn()).await?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;

    async fn setup() -> Repository {
        let pool = DbPool::new(&DatabaseConfig::in_memory()).await.unwrap();
        pool.ensure_schema().await.unwrap();
        Repository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let repo = setup().await;
        let user = repo
            .create_user("alice".to_string(), "hash".to_string())
            .await
            .unwrap();

        let found = repo.find_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(repo.find_user_by_username("bob").await.unwrap().is_none());
        assert_eq!(repo.find_user_by_id(user.id).await.unwrap().unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let repo = setup().await;
        repo.create_user("alice".to_string(), "h1".to_string())
            .await
            .unwrap();

        let err = repo
            .create_user("alice".to_string(), "h2".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_list_articles_is_scoped_and_newest_first() {
        let repo = setup().await;
        let alice = repo.create_user("alice".into(), "h".into()).await.unwrap();
        let bob = repo.create_user("bob".into(), "h".into()).await.unwrap();

        let first = repo
            .create_article(alice.id, "first".into(), "a".into())
            .await
            .unwrap();
        let second = repo
            .create_article(alice.id, "second".into(), "b".into())
            .await
            .unwrap();
        repo.create_article(bob.id, "bob's".into(), "c".into())
            .await
            .unwrap();

        let articles = repo.list_articles_by_user(alice.id).await.unwrap();
        let ids: Vec<i32> = articles.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert!(articles.iter().all(|a| a.user_id == alice.id));
    }

    #[tokio::test]
    async fn test_find_article_with_author() {
        let repo = setup().await;
        let alice = repo.create_user("alice".into(), "h".into()).await.unwrap();
        let article = repo
            .create_article(alice.id, "T".into(), "C".into())
            .await
            .unwrap();

        let (found, author) = repo
            .find_article_with_author(article.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, article.id);
        assert_eq!(found.title, "T");
        assert_eq!(found.user_id, alice.id);
        assert_eq!(author.unwrap().username, "alice");
        assert!(repo.find_article_with_author(article.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_article() {
        let repo = setup().await;
        let alice = repo.create_user("alice".into(), "h".into()).await.unwrap();
        let article = repo
            .create_article(alice.id, "T".into(), "C".into())
            .await
            .unwrap();

        assert!(repo.delete_article(article.id).await.unwrap());
        assert!(!repo.delete_article(article.id).await.unwrap());
        assert!(repo.find_article_by_id(article.id).await.unwrap().is_none());
    }
}
