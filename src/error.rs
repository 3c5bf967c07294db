use stage::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("invalid stage config: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid argument `{field}`: {reason}")]
    Argument { field: &'static str, reason: String },
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
}
