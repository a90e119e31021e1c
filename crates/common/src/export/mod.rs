//! Plain-text export of articles
//!
//! Builds the downloadable text rendition of an article entirely in
//! memory: a header block (title, export timestamp, author) followed by
//! the body, plus a timestamped filename.

use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

/// MIME type of exported files
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// A rendered text file ready to be sent as an attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextExport {
    pub filename: String,
    pub body: String,
}

impl TextExport {
    /// Value for the `Content-Disposition` header
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Placeholder title used when the caller omits one
pub fn default_title<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("Blog article - {}", now.format("%Y-%m-%d %H:%M"))
}

/// Render an article at the given instant
pub fn render_text<Tz>(
    title: &str,
    content: &str,
    author: &str,
    article_id: Option<i32>,
    now: &DateTime<Tz>,
) -> TextExport
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let body = format!(
        "Title: {}\nCreated: {}\nAuthor: {}\n\n{}\n",
        title,
        now.format("%Y-%m-%d %H:%M:%S"),
        author,
        content
    );

    let id_part = article_id.map(|id| format!("_{}", id)).unwrap_or_default();
    let filename = format!("article{}_{}.txt", id_part, now.format("%Y%m%d_%H%M%S"));

    TextExport { filename, body }
}

/// Render an article stamped with the current local time
pub fn export_text(
    title: &str,
    content: &str,
    author: &str,
    article_id: Option<i32>,
) -> TextExport {
    render_text(title, content, author, article_id, &Local::now())
}
