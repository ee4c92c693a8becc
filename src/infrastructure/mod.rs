//! Infrastructure layer - external adapters (HTTP API, filesystem, clipboard).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod clipboard;
pub mod config;
pub mod crisp_client;
pub mod xlsx_writer;

pub use clipboard::copy_to_clipboard;
pub use config::{ensure_config_exists, load_config, save_config};
pub use crisp_client::{ConversationSource, CrispClient};
pub use xlsx_writer::write_workbook;
