use aws_lambda_events::event::cloudwatch_logs::AwsLogs;
use aws_lambda_events::event::kinesis::KinesisEvent;
use chrono::Utc;
use flate2::read::MultiGzDecoder;
use lambda_runtime::Error;
use serde_json::{Map, Value};
use std::io::Read;
use tracing::{debug, error, info, warn};

use crate::firehose::RecordBatcher;

/// Timestamp layout stamped into every record, naive UTC with microseconds,
/// e.g. `2024-01-15T10:30:00.123456`.
const PROCESSED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

pub async fn kinesis_records(event: KinesisEvent, batcher: &mut RecordBatcher) -> Result<(), Error> {
    info!("Received {} Kinesis records", event.records.len());

    for record in event.records {
        let data = record.kinesis.data.0;
        let bytes = if is_gzipped(&data) {
            match ungzip(&data) {
                Ok(decompressed) => decompressed,
                Err(error) => {
                    error!(
                        ?error,
                        "Data does not appear to be valid gzip format. Treating as UTF-8"
                    );
                    data
                }
            }
        } else {
            data
        };

        match String::from_utf8(bytes) {
            Ok(payload) => {
                debug!("Decoded Kinesis payload: {}", payload);
                batcher.append(normalize_payload(&payload)).await;
            }
            Err(error) => {
                warn!(?error, "Unexpected record format, skipping record");
            }
        }
    }

    Ok(())
}

pub async fn cloudwatch_logs(logs: AwsLogs, batcher: &mut RecordBatcher) -> Result<(), Error> {
    let data = logs.data;
    info!(
        "Received {} CloudWatch log events from {}",
        data.log_events.len(),
        data.log_group
    );

    for log_event in data.log_events {
        // Forward the structured form of the entry, not the bare message.
        let payload = serde_json::to_string(&log_event)?;
        batcher.append(normalize_payload(&payload)).await;
    }

    Ok(())
}

/// Parses the payload as a JSON object, falling back to `{"message": ...}`
/// for anything else, stamps `lambda_processed_at`, and serializes the result
/// to one newline-terminated line. Never fails.
pub fn normalize_payload(payload: &str) -> String {
    let mut entry = match serde_json::from_str::<Map<String, Value>>(payload) {
        Ok(entry) => entry,
        Err(_) => {
            let mut entry = Map::new();
            entry.insert("message".to_owned(), Value::String(payload.to_owned()));
            entry
        }
    };

    entry.insert(
        "lambda_processed_at".to_owned(),
        Value::String(
            Utc::now()
                .naive_utc()
                .format(PROCESSED_AT_FORMAT)
                .to_string(),
        ),
    );

    let mut line = Value::Object(entry).to_string();
    line.push('\n');
    line
}

fn is_gzipped(data: &[u8]) -> bool {
    // Check the first two bytes for gzip magic numbers
    data.len() > 1 && data[0] == 0x1f && data[1] == 0x8b
}

fn ungzip(compressed_data: &[u8]) -> Result<Vec<u8>, std::io::Error> {
    let mut decoder = MultiGzDecoder::new(compressed_data);
    let mut v = Vec::new();
    decoder.read_to_end(&mut v)?;
    Ok(v)
}
