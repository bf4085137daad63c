pub mod canned;
pub mod config;
pub mod message;
pub mod pipeline;
pub mod timeline;
pub mod transport;
