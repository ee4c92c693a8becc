//! Domain layer - core business types.
//!
//! This layer contains pure domain models, configuration and error types
//! without any external I/O.

pub mod config;
pub mod error;
pub mod models;

pub use config::{AppConfig, Credentials};
pub use error::{AppError, Result};
pub use models::{
    ApiResponse, Conversation, ConversationMessageGroup, DateFilter, ExportRow, ExportStats,
    Message, EXPORT_HEADER,
};
