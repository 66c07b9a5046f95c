//! Gateway HTTP Surface
//!
//! The thin CRUD layer in front of the pool and the metadata store. Routes
//! live under `/api/v1`; every request carries an opaque caller identity in
//! the `user-email` header and is answered with JSON.
//!
//! - **Auth** (`auth.rs`): identity extraction
//! - **Server** (`server.rs`): hyper plumbing and route dispatch
//! - **Files** (`files.rs`): upload, download redirect, info, delete
//! - **Folders** (`folders.rs`): folder creation and the tree view
//! - **Response** (`response.rs`): JSON bodies and error status mapping

pub mod auth;
pub mod files;
pub mod folders;
pub mod response;
pub mod server;

pub use server::{bind, run, serve, AppState};
