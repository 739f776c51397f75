//! # File Storage Module
//!
//! File-backed key-value store. Every key is one JSON file in the data
//! directory, next to a YAML board configuration.
//!
//! ## File Structure
//!
//! ```text
//! Quest Board/
//! ├── .quest_board_redirect          ← optional, points at another directory
//! ├── board_config.yaml
//! ├── aurora-settings-v2.json
//! ├── aurora-daily-2024-03-10.json
//! └── aurora-spent-2024-03.json
//! ```

pub mod board_config_repository;
pub mod connection;

pub use board_config_repository::{BoardConfig, BoardConfigRepository};
pub use connection::FileStore;
