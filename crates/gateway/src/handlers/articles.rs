//! Article management handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};

use super::{MessageResponse, STATUS_SUCCESS};
use crate::AppState;
use blogforge_common::{
    auth::{require_owned_article, CurrentUser},
    db::{models::Article, Repository},
    errors::{AppError, Result},
    export::default_title,
    metrics,
};

/// Request to create a new article
#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub content: Option<String>,
}

/// Article as returned by the API
#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub user_id: i32,
    pub created_at: String,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            title: article.title,
            content: article.content,
            user_id: article.user_id,
            created_at: article.created_at.to_rfc3339(),
        }
    }
}

/// Response after creating an article
#[derive(Serialize)]
pub struct CreateArticleResponse {
    pub status: &'static str,
    pub message: String,
    pub article: ArticleResponse,
}

/// Response for listing articles
#[derive(Serialize)]
pub struct ArticleListResponse {
    pub status: &'static str,
    pub articles: Vec<ArticleResponse>,
}

/// Take the content field, rejecting a missing or empty body
pub(crate) fn require_content(content: Option<String>) -> Result<String> {
    content
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::MissingField {
            field: "content".to_string(),
        })
}

/// Create a new article owned by the caller
pub async fn create_article(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: std::result::Result<Json<CreateArticleRequest>, JsonRejection>,
) -> Result<Json<CreateArticleResponse>> {
    let Json(request) = payload?;

    let content = require_content(request.content)?;
    let title = request
        .title
        .unwrap_or_else(|| default_title(&chrono::Local::now()));

    let repo = Repository::new(state.db.clone());
    let article = repo.create_article(user.id, title, content).await?;

    metrics::record_article_created();
    tracing::info!(
        article_id = article.id,
        user_id = user.id,
        "Article created"
    );

    Ok(Json(CreateArticleResponse {
        status: STATUS_SUCCESS,
        message: "Article saved".to_string(),
        article: article.into(),
    }))
}

/// List the caller's articles, newest first
pub async fn list_articles(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ArticleListResponse>> {
    let repo = Repository::new(state.db.clone());
    let articles = repo.list_articles_by_user(user.id).await?;

    Ok(Json(ArticleListResponse {
        status: STATUS_SUCCESS,
        articles: articles.into_iter().map(Into::into).collect(),
    }))
}

/// Delete one of the caller's articles
pub async fn delete_article(
    State(state): State<AppState>,
    user: CurrentUser,
    path: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<MessageResponse>> {
    let Path(article_id) = path?;
    let repo = Repository::new(state.db.clone());

    let owned = require_owned_article(&repo, &user, article_id).await?;

    if !repo.delete_article(owned.article.id).await? {
        return Err(AppError::ArticleNotFound { id: article_id });
    }

    metrics::record_article_deleted();
    tracing::info!(
        article_id = article_id,
        user_id = user.id,
        "Article deleted"
    );

    Ok(Json(MessageResponse::success("Article deleted")))
}
