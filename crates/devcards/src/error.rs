#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Cache error: {0}")]
    Cache(String),
}
