use thiserror::Error;

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("device i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("device disconnected")]
    Disconnected,
}
