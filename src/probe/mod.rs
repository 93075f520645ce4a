pub mod config;
pub mod kind;
pub mod request;
