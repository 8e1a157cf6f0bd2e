use crate::config::RelayConfig;
use crate::utils::error::{RelayError, Result};
use serde::Deserialize;
use std::path::Path;

/// Optional overrides read from a TOML file; missing keys keep their defaults.
///
/// ```toml
/// [serial]
/// port = "COM5"
/// baud_rate = 115200
///
/// [forward]
/// accept_invalid_certs = true
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayFile {
    pub serial: Option<SerialSection>,
    pub forward: Option<ForwardSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SerialSection {
    pub port: Option<String>,
    pub baud_rate: Option<u32>,
    pub read_timeout_ms: Option<u64>,
    pub max_line_bytes: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForwardSection {
    pub accept_invalid_certs: Option<bool>,
    pub request_timeout_secs: Option<u64>,
}

impl RelayFile {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RelayError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RelayError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RELAY_PORT})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RelayError::ConfigError {
            message: format!("Invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 將檔案中有設定的值覆寫到 `config`
    pub fn apply(&self, config: &mut RelayConfig) {
        if let Some(serial) = &self.serial {
            if let Some(port) = &serial.port {
                config.serial.port = port.clone();
            }
            if let Some(baud_rate) = serial.baud_rate {
                config.serial.baud_rate = baud_rate;
            }
            if let Some(timeout) = serial.read_timeout_ms {
                config.serial.read_timeout_ms = timeout;
            }
            if let Some(max) = serial.max_line_bytes {
                config.serial.max_line_bytes = max;
            }
        }

        if let Some(forward) = &self.forward {
            if let Some(accept) = forward.accept_invalid_certs {
                config.forward.accept_invalid_certs = accept;
            }
            if forward.request_timeout_secs.is_some() {
                config.forward.request_timeout_secs = forward.request_timeout_secs;
            }
        }
    }
}
