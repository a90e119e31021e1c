//! API handlers module

pub mod articles;
pub mod auth;
pub mod export;
pub mod generate;
pub mod health;
pub mod index;

use serde::Serialize;

/// Status field of every success envelope
pub const STATUS_SUCCESS: &str = "success";

/// `{status, message}` envelope
#[derive(Serialize)]
pub struct MessageResponse {
    pub status: &'static str,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_SUCCESS,
            message: message.into(),
        }
    }
}
