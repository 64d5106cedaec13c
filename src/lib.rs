pub mod analyzer;
pub mod config;
pub mod errors;
pub mod merger;
pub mod segmenter;
