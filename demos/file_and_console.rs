use std::sync::Arc;

use tracing::{debug, error, info};

use tracing_sinks::env::{env_or, LOG_SINK_FILE_PATH_ENV};
use tracing_sinks::file::{attach_file_sink, FileSinkConfig};
use tracing_sinks::format::LineFormat;
use tracing_sinks::init::init;
use tracing_sinks::record::Level;
use tracing_sinks::registry::Registry;
use tracing_sinks::stream::{attach_stream_sink, StreamSinkConfig};

/// Attach a JSON-lines file sink and a stderr console sink to the root
/// logger. Attaching either a second time is a no-op, so setup code can run
/// unconditionally.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = Arc::new(Registry::new());

    let log_path = env_or(LOG_SINK_FILE_PATH_ENV, "demo.log");
    let mut file = FileSinkConfig::new(&log_path);
    file.format = LineFormat::Json;
    attach_file_sink(&registry, file.clone())?;
    // Second attach with the same path: suppressed.
    attach_file_sink(&registry, file)?;

    let mut console = StreamSinkConfig::new();
    console.sink_level = Level::Warn;
    attach_stream_sink(&registry, console)?;

    init(Arc::clone(&registry));

    debug!("noise below the console threshold, still written to the file");
    info!(user = "ada", "logged in");
    error!("this line reaches both sinks");

    registry.shutdown()?;
    println!("log lines written to {log_path}");
    Ok(())
}
