use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("gpio error: {0}")]
    Gpio(String),
    #[error("pin {0} does not exist on this board")]
    PinUnavailable(u8),
    #[error("pin {0} is already in use")]
    PinBusy(u8),
    #[error("capture buffer capacity must be >= 1")]
    ZeroCapacity,
    #[error("link not connected")]
    NotConnected,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
