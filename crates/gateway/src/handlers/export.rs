//! Text export handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use super::articles::{require_content, CreateArticleRequest};
use crate::AppState;
use blogforge_common::{
    auth::{require_owned_article, CurrentUser},
    db::Repository,
    errors::Result,
    export::{default_title, export_text as render_export, TextExport, TEXT_CONTENT_TYPE},
    metrics,
};

fn attachment(export: TextExport) -> Response {
    let disposition = export.content_disposition();
    (
        [
            (header::CONTENT_TYPE, TEXT_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.body,
    )
        .into_response()
}

/// Download a stored article as a text file
pub async fn export_article(
    State(state): State<AppState>,
    user: CurrentUser,
    path: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Response> {
    let Path(article_id) = path?;
    let repo = Repository::new(state.db.clone());

    let owned = require_owned_article(&repo, &user, article_id).await?;
    let export = render_export(
        &owned.article.title,
        &owned.article.content,
        &owned.author.username,
        Some(owned.article.id),
    );

    metrics::record_export("article");
    tracing::info!(
        article_id = article_id,
        filename = %export.filename,
        "Article exported"
    );

    Ok(attachment(export))
}

/// Render ad-hoc text as a download without storing anything
pub async fn export_text(
    user: CurrentUser,
    payload: std::result::Result<Json<CreateArticleRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload?;

    let content = require_content(request.content)?;
    let title = request
        .title
        .unwrap_or_else(|| default_title(&chrono::Local::now()));

    let export = render_export(&title, &content, &user.username, None);

    metrics::record_export("adhoc");
    tracing::debug!(user_id = user.id, filename = %export.filename, "Text exported");

    Ok(attachment(export))
}
