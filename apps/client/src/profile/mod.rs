// Profile and CV documents: REST wrappers, the profile store, and experience-level detection.

pub mod level;
pub mod service;
pub mod store;
