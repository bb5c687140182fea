use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_firehose::primitives::Blob;
use aws_sdk_firehose::types::Record;
use aws_sdk_firehose::Client;
use lambda_runtime::Error;
use tracing::{error, info};

/// PutRecordBatch accepts at most this many records per call.
pub const MAX_BATCH_RECORDS: usize = 500;

/// The seam between the pipeline and the delivery stream. Implementations
/// deliver all lines in one batch-put call, preserving order, and report how
/// many records the service refused.
#[async_trait]
pub trait FirehoseExporter {
    async fn put_record_batch(
        &self,
        delivery_stream: &str,
        lines: Vec<String>,
    ) -> Result<i32, Error>;
}

pub type DynFirehoseExporter = Arc<dyn FirehoseExporter + Send + Sync>;

pub struct AwsFirehoseExporter {
    client: Client,
}

impl AwsFirehoseExporter {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        AwsFirehoseExporter {
            client: Client::new(sdk_config),
        }
    }

    pub fn from_client(client: Client) -> Self {
        AwsFirehoseExporter { client }
    }
}

#[async_trait]
impl FirehoseExporter for AwsFirehoseExporter {
    async fn put_record_batch(
        &self,
        delivery_stream: &str,
        lines: Vec<String>,
    ) -> Result<i32, Error> {
        let mut records = Vec::with_capacity(lines.len());
        for line in lines {
            records.push(Record::builder().data(Blob::new(line.into_bytes())).build()?);
        }

        let response = self
            .client
            .put_record_batch()
            .delivery_stream_name(delivery_stream)
            .set_records(Some(records))
            .send()
            .await?;

        Ok(response.failed_put_count())
    }
}

/// Accumulates serialized lines and delivers them in arrival order, at most
/// [`MAX_BATCH_RECORDS`] per call. The same flush path serves the mid-stream
/// cap and the end-of-invocation drain.
pub struct RecordBatcher {
    exporter: DynFirehoseExporter,
    delivery_stream: String,
    lines: Vec<String>,
}

impl RecordBatcher {
    pub fn new(exporter: DynFirehoseExporter, delivery_stream: String) -> Self {
        RecordBatcher {
            exporter,
            delivery_stream,
            lines: Vec::with_capacity(MAX_BATCH_RECORDS),
        }
    }

    /// Appends one line, flushing as a side effect when the batch reaches the
    /// cap, so it never holds more than [`MAX_BATCH_RECORDS`] entries.
    pub async fn append(&mut self, line: String) {
        self.lines.push(line);
        if self.lines.len() == MAX_BATCH_RECORDS {
            self.flush().await;
        }
    }

    /// Delivers the pending lines in one call. No-op on an empty batch. The
    /// batch is cleared whether or not delivery succeeded; failures are
    /// logged and swallowed, so callers observe success either way.
    pub async fn flush(&mut self) {
        if self.lines.is_empty() {
            return;
        }

        let lines = std::mem::take(&mut self.lines);
        let count = lines.len();
        let start_time = Instant::now();
        match self
            .exporter
            .put_record_batch(&self.delivery_stream, lines)
            .await
        {
            Ok(0) => info!(
                "Delivered {} records to Firehose in {}ms",
                count,
                start_time.elapsed().as_millis()
            ),
            Ok(failed) => error!("Failed to deliver {} of {} records to Firehose", failed, count),
            Err(error) => error!(?error, "Error sending records to Firehose"),
        }
    }

    pub fn pending(&self) -> usize {
        self.lines.len()
    }
}
