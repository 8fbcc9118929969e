use std::path::Path;

use miette::{Context, IntoDiagnostic, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
};


/// Sets up the global tracing subscriber: a console layer on stderr and,
/// if `log_file_output_directory` is given, a daily-rolling log file layer.
///
/// The returned guard flushes the file writer when dropped and must be held
/// until the program exits.
pub fn initialize_tracing(
    console_level_filter: EnvFilter,
    log_file_level_filter: EnvFilter,
    log_file_output_directory: Option<&Path>,
    log_file_name_prefix: &str,
) -> Result<Option<WorkerGuard>> {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_level_filter);


    let (file_layer, guard) = match log_file_output_directory {
        Some(directory) => {
            if !directory.is_dir() {
                std::fs::create_dir_all(directory)
                    .into_diagnostic()
                    .wrap_err("Failed to create missing log file output directory.")?;
            }

            let directory = dunce::canonicalize(directory)
                .into_diagnostic()
                .wrap_err("Failed to canonicalize log file output directory.")?;

            let file_appender = tracing_appender::rolling::daily(&directory, log_file_name_prefix);
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

            let file_layer = fmt::layer()
                .with_writer(non_blocking_writer)
                .with_ansi(false)
                .with_filter(log_file_level_filter);

            (Some(file_layer), Some(guard))
        }
        None => (None, None),
    };


    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .into_diagnostic()
        .wrap_err("Failed to install the global tracing subscriber.")?;

    Ok(guard)
}
