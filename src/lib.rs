pub mod cipher;
pub mod cli;
pub mod config;
pub mod error;
pub mod formats;
pub mod model;
pub mod pipeline;
pub mod stats;
pub mod tokenize;
