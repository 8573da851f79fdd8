//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID generation and lookup)
//!     → handlers.rs (extract `message`, call the log facade, echo)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use handlers::{ABSENT_MESSAGE, MESSAGE_PARAM, RESPONSE_PREFIX};
pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
