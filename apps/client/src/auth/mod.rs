// Session lifecycle: persisted tokens, the shared session context, auth endpoints and the auth store.
// The API client reads the session on every request and rewrites it on refresh.

pub mod service;
pub mod session;
pub mod store;
pub mod token_store;

pub use session::Session;
pub use token_store::{FileTokenStore, TokenStore};
