//! Bookshelf: an in-memory book catalog served over HTTP
//!
//! Records live in a mutex-guarded map for the lifetime of the process and are
//! exposed as a JSON resource under `/books`.

pub mod config;
pub mod error;
pub mod model;
pub mod server;
pub mod store;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use model::Book;
pub use server::Server;
pub use store::Store;
