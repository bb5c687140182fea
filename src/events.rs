use aws_lambda_events::event::cloudwatch_logs::LogsEvent;
use aws_lambda_events::event::kinesis::KinesisEvent;
use serde::de::{Deserialize, Deserializer};
use serde_json::Value;

/// The invocation payload, decoded once at the boundary. Shapes that are
/// neither Kinesis nor CloudWatch Logs are kept as [`CombinedEvent::Unmatched`]
/// so the handler can log them and move on instead of failing the invocation.
#[derive(Debug)]
pub enum CombinedEvent {
    Kinesis(KinesisEvent),
    CloudWatchLogs(LogsEvent),
    Unmatched(Value),
}

impl<'de> Deserialize<'de> for CombinedEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw_value: Value = Deserialize::deserialize(deserializer)?;

        if let Ok(event) = KinesisEvent::deserialize(&raw_value) {
            tracing::debug!("kinesis event detected");
            return Ok(CombinedEvent::Kinesis(event));
        }

        if let Ok(event) = LogsEvent::deserialize(&raw_value) {
            tracing::debug!("cloudwatch event detected");
            return Ok(CombinedEvent::CloudWatchLogs(event));
        }

        Ok(CombinedEvent::Unmatched(raw_value))
    }
}
