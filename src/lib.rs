//! # Waterkit
//!
//! Cross-platform utilities for building applications with WaterUI.
//!
//! ## Features
//!
//! - `push`: Push notification coordination (Play Services probing, Firebase
//!   setup, keep-alive jobs, badges, launch payloads).
//!
//! Use the `full` feature to enable everything.
//!
//! ## Example
//!
//! ```toml
//! [dependencies]
//! waterkit = { version = "0.1", features = ["push"] }
//! ```
//!
//! ```rust,ignore
//! use waterkit::push::PushNotificationsService;
//!
//! fn on_pause(service: &PushNotificationsService) {
//!     service.on_lifecycle_event("pause");
//! }
//! ```

#[cfg(feature = "push")]
pub use waterkit_push as push;
