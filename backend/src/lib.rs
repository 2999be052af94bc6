//! Image gallery backed by an object-storage bucket

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

/// Paginated listing, uploads and deletion
pub mod gallery;

/// Object store adapter
pub mod image_storage;

/// HTTP routes
pub mod routes;

/// Server startup
pub mod server;

/// Configuration and error types
pub mod types;

/// HTML rendering
pub mod views;
