use lambda_runtime::{Error, LambdaEvent};
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, ConfigError};
use crate::events::CombinedEvent;
use crate::firehose::{DynFirehoseExporter, RecordBatcher};

pub mod config;
pub mod events;
pub mod firehose;
pub mod process;

pub fn set_up_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();
}

/// What the invocation reports back to the platform. Delivery failures do not
/// surface here; only missing configuration produces a non-200 result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    pub fn processed() -> Self {
        HandlerResponse {
            status_code: 200,
            body: "Processed event".to_owned(),
        }
    }

    pub fn configuration_error(error: &ConfigError) -> Self {
        HandlerResponse {
            status_code: 500,
            body: format!("Configuration error: {error}"),
        }
    }
}

// lambda handler
pub async fn function_handler(
    exporter: DynFirehoseExporter,
    evt: LambdaEvent<CombinedEvent>,
) -> Result<HandlerResponse, Error> {
    info!("Handling lambda invocation");

    let config = match Config::load_from_env() {
        Ok(config) => config,
        Err(error) => {
            error!("{}, refusing to process event", error);
            return Ok(HandlerResponse::configuration_error(&error));
        }
    };
    info!("Delivery stream name: {}", config.delivery_stream_name);

    let mut batcher = RecordBatcher::new(exporter, config.delivery_stream_name);
    match evt.payload {
        CombinedEvent::Kinesis(kinesis_event) => {
            process::kinesis_records(kinesis_event, &mut batcher).await?;
        }
        CombinedEvent::CloudWatchLogs(logs_event) => {
            process::cloudwatch_logs(logs_event.aws_logs, &mut batcher).await?;
        }
        CombinedEvent::Unmatched(value) => {
            warn!("Unexpected event format: {}", value);
        }
    }
    batcher.flush().await;

    Ok(HandlerResponse::processed())
}
