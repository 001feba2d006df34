//! Session ownership for the storefront client.
//!
//! The [`RefreshCoordinator`] is the single writer of persisted credentials:
//! it runs single-flight token refreshes, persists sign-ins, and ends
//! sessions that cannot be recovered.

pub mod coordinator;

pub use coordinator::RefreshCoordinator;
