#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Chunk size must be greater than zero")]
    ZeroChunkSize,

    #[error("Overlap ({overlap}) must be smaller than chunk size ({size})")]
    OverlapTooLarge { size: usize, overlap: usize },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
