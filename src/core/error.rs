use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Beat {beat} produced a non-finite {quantity}")]
    NonFinite { beat: u8, quantity: &'static str },

    #[error("Run cancelled after {completed} beats")]
    Cancelled { completed: usize },
}

impl SimulationError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
