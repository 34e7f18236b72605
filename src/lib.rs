#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Receipt Core
//!
//! Client-side data store for receipt capture and archive management.
//!
//! ## Overview
//!
//! Receipt Core mediates between an unreliable long-running extraction
//! backend (OCR of uploaded receipt images can take seconds, fail, or
//! detect duplicates) and a UI that must always show an accurate,
//! responsive view of both the in-flight upload and the historical archive.
//!
//! ## Architecture
//!
//! The crate composes three sub-components behind one facade:
//!
//! - a **job tracker** driving a single submission through a bounded
//!   polling protocol to a terminal state,
//! - a **collection manager** keeping the paginated, filtered, sorted, and
//!   searched archive view consistent, with optimistic removal, and
//! - a **statistics cache** holding one wholesale-replaced aggregate
//!   snapshot.
//!
//! The backend is reached through the [`api::ReceiptService`] trait; the
//! bundled [`api::HttpReceiptService`] speaks HTTP, and tests substitute
//! scripted implementations.
//!
//! ## Module Organization
//!
//! - [`store`] - The facade, its observed state, and the three sub-components
//! - [`models`] - Receipts, lifecycle enums, query criteria, statistics
//! - [`api`] - The remote service boundary and its HTTP implementation
//! - [`config`] - Store and boundary tuning with environment overrides
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use receipt_core::api::HttpReceiptService;
//! use receipt_core::config::{ReceiptApiConfig, StoreConfig};
//! use receipt_core::models::receipt::UploadPayload;
//! use receipt_core::store::ReceiptStore;
//!
//! # async fn example() -> receipt_core::error::StoreResult<()> {
//! let service = Arc::new(HttpReceiptService::new(ReceiptApiConfig::from_env()?)?);
//! let store = ReceiptStore::new(service, StoreConfig::default());
//!
//! // Submit an image and track extraction in the background
//! let image_bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
//! let payload = UploadPayload::new("lunch.jpg", "image/jpeg", image_bytes);
//! let receipt_id = store.submit(payload).await?;
//! println!("Tracking receipt {receipt_id}");
//!
//! // Browse the archive
//! store.fetch_page(true).await?;
//! for receipt in &store.snapshot().collection.receipts {
//!     println!("{}", receipt.receipt_id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod store;

pub use api::{HttpReceiptService, ReceiptService};
pub use config::{ReceiptApiConfig, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use models::{JobPhase, Receipt, ReceiptStatus};
pub use store::state::{CollectionState, JobState, StoreState};
pub use store::ReceiptStore;
