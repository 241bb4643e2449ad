pub mod aggregate;
pub mod args;
pub mod common;
pub mod constants;
pub mod distance;
pub mod export;
pub mod geocode;
pub mod parser;
pub mod prompt;
pub mod reader;
pub mod render;
