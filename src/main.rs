use aws_config::BehaviorVersion;
use firehose_log_shipper::events::CombinedEvent;
use firehose_log_shipper::firehose::{AwsFirehoseExporter, DynFirehoseExporter};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    firehose_log_shipper::set_up_logging();

    info!(
        "Initializing {} version {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let aws_config = aws_config::load_defaults(BehaviorVersion::v2023_11_09()).await;
    let exporter: DynFirehoseExporter = Arc::new(AwsFirehoseExporter::new(&aws_config));

    run(service_fn(|request: LambdaEvent<CombinedEvent>| {
        firehose_log_shipper::function_handler(exporter.clone(), request)
    }))
    .await
}
