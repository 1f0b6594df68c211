pub mod analytics;
pub mod interview;
pub mod profile;
pub mod role;
pub mod user;
