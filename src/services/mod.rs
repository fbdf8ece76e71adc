pub mod auth;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod events;
pub mod gateway;
pub mod http;
pub(crate) mod paths;
pub mod prompts;
pub mod upload;
