// ABOUTME: HTTP client, session persistence, and load-state tracking
// ABOUTME: The only package that talks to the LLC backend

pub mod client;
pub mod error;
pub mod loader;
pub mod session;

pub use client::{ApiClient, ClientConfig, ReviewVerdict, SignupRequest};
pub use error::{LlcError, LlcResult};
pub use loader::{Loadable, StatusBoard};
pub use session::{Session, SessionStore};
