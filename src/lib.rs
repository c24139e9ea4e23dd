pub mod aggregate;
pub mod cache;
pub mod classify;
pub mod config;
pub mod dates;
pub mod dedup;
pub mod document;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod locate;
pub mod model;
pub mod parser;
pub mod pipeline;
