//! Rate-limited gateway to the Pinboard v1 API.
//!
//! [`PinboardGateway`] admits a bounded number of requests at a time and
//! normalizes failures into [`SyncError`](pinsync_core::SyncError). The wire
//! itself sits behind [`HttpTransport`] so the policy can be exercised
//! without a network.

mod pinboard;
mod transport;

pub use pinboard::PinboardGateway;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
