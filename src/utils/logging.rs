use super::progress_bar_builder::multi_progress;
use anyhow::{anyhow, Result};
use std::io::{self, Write};
use tracing_subscriber::{fmt, layer::SubscriberExt, registry::Registry, EnvFilter};

/// Default filter directive for a given `-v` count.
pub fn directive_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "corpus_coverage=warn",
        1 => "corpus_coverage=info",
        2 => "corpus_coverage=debug",
        _ => "corpus_coverage=trace",
    }
}

/// Buffers one formatted event and writes it to stderr with the progress
/// bars hidden, so a log line never lands in the middle of a bar.
#[derive(Default)]
pub struct ProgressAwareWriter {
    buf: Vec<u8>,
}

impl Write for ProgressAwareWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let buf = std::mem::take(&mut self.buf);
        multi_progress().suspend(|| io::stderr().write_all(&buf))
    }
}

impl Drop for ProgressAwareWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Installs the global subscriber: fmt output on stderr, filtered by `RUST_LOG`
/// plus the verbosity directive.
pub fn init(verbose: u8) -> Result<()> {
    let env_filter = EnvFilter::from_default_env().add_directive(directive_for(verbose).parse()?);

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(ProgressAwareWriter::default);

    let subscriber = Registry::default().with(env_filter).with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to set up logging: {}", e))
}
