use std::env;

use thiserror::Error;

/// Environment variable naming the destination delivery stream.
pub const DELIVERY_STREAM_VAR: &str = "FIREHOSE_DELIVERY_STREAM";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing Firehose delivery stream name")]
    MissingDeliveryStream,
}

#[derive(Debug)]
pub struct Config {
    pub delivery_stream_name: String,
}

impl Config {
    /// An unset or empty delivery stream name is a hard error; the caller
    /// aborts the invocation before any record is processed.
    pub fn load_from_env() -> Result<Config, ConfigError> {
        let delivery_stream_name = env::var(DELIVERY_STREAM_VAR)
            .ok()
            .filter(|name| !name.is_empty())
            .ok_or(ConfigError::MissingDeliveryStream)?;

        Ok(Config {
            delivery_stream_name,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_from_env() {
        temp_env::with_var(DELIVERY_STREAM_VAR, Some("my-delivery-stream"), || {
            let config = Config::load_from_env().expect("failed to load config");
            assert_eq!(config.delivery_stream_name, "my-delivery-stream");
        });
    }

    #[test]
    fn test_missing_delivery_stream() {
        temp_env::with_var_unset(DELIVERY_STREAM_VAR, || {
            assert_eq!(
                Config::load_from_env().unwrap_err(),
                ConfigError::MissingDeliveryStream
            );
        });
    }

    #[test]
    fn test_empty_delivery_stream_is_missing() {
        temp_env::with_var(DELIVERY_STREAM_VAR, Some(""), || {
            assert_eq!(
                Config::load_from_env().unwrap_err(),
                ConfigError::MissingDeliveryStream
            );
        });
    }
}
