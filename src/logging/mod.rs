//! Logging infrastructure for structured console and file output.

mod logger;
#[cfg(test)]
mod memory;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
#[cfg(test)]
pub(crate) use memory::MemoryLog;
pub use subscriber::init_subscriber;
pub use types::{Log, RunTally, TaskEntry, TaskStatus};
pub use utils::{default_log_dir, installed_packages_path, log_file_path};

/// Create a Logger backed by an isolated per-thread tracing subscriber
/// with a [`FileLayer`](subscriber::FileLayer) writing into a temporary
/// directory, so that tracing events emitted by logger methods reach a log
/// file the test can read.
///
/// Returns a [`tracing::dispatcher::DefaultGuard`] that must be kept alive
/// for the duration of the test.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let path = log_file_path(tmp.path());
    let file_layer = subscriber::FileLayer::new(&path).expect("failed to create file layer");
    let log = Logger::new(Some(path));
    let subscriber =
        tracing_subscriber::registry().with(file_layer.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (log, tmp, guard)
}
