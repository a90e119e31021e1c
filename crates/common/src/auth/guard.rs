//! Article ownership guard
//!
//! Every owner-scoped operation goes through `require_owned_article`:
//! unknown ids are 404, articles of other users are 403.

use super::CurrentUser;
use crate::db::models::{Article, User};
use crate::db::Repository;
use crate::errors::{AppError, Result};

/// An article the current user is allowed to act on, with its author
#[derive(Debug, Clone)]
pub struct OwnedArticle {
    pub article: Article,
    pub author: User,
}

/// Fail with `Forbidden` unless `user` owns `article`
pub fn ensure_owner(article: &Article, user: &CurrentUser) -> Result<()> {
    if article.user_id == user.id {
        Ok(())
    } else {
        Err(AppError::Forbidden {
            message: "You do not have permission to access this article".to_string(),
        })
    }
}

/// Load an article and check that `user` owns it
pub async fn require_owned_article(
    repo: &Repository,
    user: &CurrentUser,
    article_id: i32,
) -> Result<OwnedArticle> {
    let (article, author) = repo
        .find_article_with_author(article_id)
        .await?
        .ok_or(AppError::ArticleNotFound { id: article_id })?;

    if let Err(err) = ensure_owner(&article, user) {
        tracing::warn!(
            article_id = article_id,
            owner_id = article.user_id,
            user_id = user.id,
            "Ownership check failed"
        );
        return Err(err);
    }

    let author = author.ok_or_else(|| AppError::Internal {
        message: format!("Article {} has no author", article_id),
    })?;

    Ok(OwnedArticle { article, author })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::DbPool;

    fn user(id: i32) -> CurrentUser {
        CurrentUser {
            id,
            username: format!("user{}", id),
        }
    }

    #[test]
    fn test_ensure_owner() {
        let article = Article {
            id: 1,
            title: "T".into(),
            content: "C".into(),
            user_id: 5,
            created_at: chrono::Utc::now().into(),
        };
        assert!(ensure_owner(&article, &user(5)).is_ok());
        assert!(matches!(
            ensure_owner(&article, &user(6)),
            Err(AppError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn test_require_owned_article() {
        let pool = DbPool::new(&DatabaseConfig::in_memory()).await.unwrap();
        pool.ensure_schema().await.unwrap();
        let repo = Repository::new(pool);

        let alice = repo.create_user("alice".into(), "h".into()).await.unwrap();
        let bob = repo.create_user("bob".into(), "h".into()).await.unwrap();
        let article = repo
            .create_article(alice.id, "T".into(), "C".into())
            .await
            .unwrap();

        let owned = require_owned_article(&repo, &CurrentUser::from(&alice), article.id)
            .await
            .unwrap();
        assert_eq!(owned.article.id, article.id);
        assert_eq!(owned.author.username, "alice");

        let err = require_owned_article(&repo, &CurrentUser::from(&bob), article.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));

        let err = require_owned_article(&repo, &CurrentUser::from(&alice), 9999)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ArticleNotFound { id: 9999 }));
    }
}
