//! HTTP layer: routes, handlers and error mapping.
//!
//! ```text
//! GET  /                          homepage (index.html)
//! POST /generate-schedule         full schedule as one JSON value
//! POST /generate-schedule-stream  schedule as ND-JSON, one record per line
//! GET  /youtube-videos?topic=     up to 5 tutorial videos
//! GET  /health                    liveness and configuration summary
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
