// Interview sessions: REST wrappers and the store that tracks the question being answered.

pub mod service;
pub mod store;
