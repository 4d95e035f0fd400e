pub mod achievement;
pub mod auth;
pub mod project;
pub mod upload;
