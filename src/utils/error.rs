use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Could not open serial port {port}: {source}")]
    SerialOpenError {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Serial error: {0}")]
    SerialError(#[from] serialport::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// 錯誤分級：致命錯誤終止程序，其餘錯誤只影響當前迭代
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Recoverable,
    Fatal,
}

impl RelayError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RelayError::SerialOpenError { .. }
            | RelayError::ConfigError { .. }
            | RelayError::InvalidConfigValueError { .. } => ErrorSeverity::Fatal,
            RelayError::SerialError(_) | RelayError::IoError(_) | RelayError::HttpError(_) => {
                ErrorSeverity::Recoverable
            }
        }
    }

    /// Process exit code used when this error ends the program.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Fatal => 1,
            ErrorSeverity::Recoverable => 0,
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
