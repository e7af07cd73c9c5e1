use crate::layer::RegistryLayer;
use crate::registry::Registry;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;

/// Install a global `tracing` subscriber that feeds the provided [`Registry`].
///
/// **Parameters**
/// - `registry`: the logger registry that will receive every event as a
///   normalized [`LogRecord`](crate::record::LogRecord).
///
/// **Effects**
///
/// Installs a `tracing_subscriber::Registry` combined with
/// [`RegistryLayer`] as the global default subscriber, so all `tracing`
/// events in the process are dispatched through the registry's loggers.
pub fn init(registry: Arc<Registry>) {
    let subscriber = tracing_subscriber::registry().with(RegistryLayer::new(registry));
    tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");
}

/// Like [`init`], but additionally stacks a `fmt` layer so events are echoed
/// to the console alongside whatever sinks the registry dispatches to.
pub fn init_with_fmt(registry: Arc<Registry>) {
    let fmt_layer = tracing_subscriber::fmt::layer();
    let subscriber = tracing_subscriber::registry()
        .with(RegistryLayer::new(registry))
        .with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");
}
