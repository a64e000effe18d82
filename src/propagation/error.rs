use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropagationError {
    #[error("instant not representable relative to element epoch: {0}")]
    Epoch(String),
    #[error("degenerate orbit: {0}")]
    Degenerate(String),
}
