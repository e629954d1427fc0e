//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (assign and echo request ID)
//!     → session gate (page paths only)
//!     → /api/* handlers, /healthz, or proxy.rs (forward page to renderer)
//!     → Send to client
//! ```

pub mod proxy;
pub mod request;
pub mod server;

pub use proxy::PageProxy;
pub use request::X_REQUEST_ID;
pub use server::{HttpServer, ServerError};
