use anyhow::Result;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::OnceLock;
use std::time::Duration;

static MULTI_PROGRESS: OnceLock<MultiProgress> = OnceLock::new();

/// Shared draw target for every bar, so log output can be interleaved cleanly.
pub(crate) fn multi_progress() -> &'static MultiProgress {
    MULTI_PROGRESS.get_or_init(MultiProgress::new)
}

pub(crate) struct ProgressBarBuilder {
    style_template: &'static str,
    message: String,
    length: Option<u64>,
    enable_tick: bool,
}

impl ProgressBarBuilder {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            style_template: "{spinner:.green} {msg}",
            message: message.into(),
            length: None,
            enable_tick: false,
        }
    }

    pub(crate) fn with_template(mut self, template: &'static str) -> Self {
        self.style_template = template;
        self
    }

    /// Switches from a spinner to a bar of `length` steps.
    pub(crate) fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    pub(crate) fn with_tick(mut self) -> Self {
        self.enable_tick = true;
        self
    }

    pub(crate) fn build(self) -> Result<ProgressBar> {
        let (pb, style) = match self.length {
            Some(len) => (
                ProgressBar::new(len),
                ProgressStyle::default_bar()
                    .template(self.style_template)?
                    .progress_chars("#>-"),
            ),
            None => (
                ProgressBar::new_spinner(),
                ProgressStyle::default_spinner().template(self.style_template)?,
            ),
        };

        let pb = multi_progress().add(pb);
        pb.set_style(style);
        pb.set_message(self.message);

        if self.enable_tick {
            pb.enable_steady_tick(Duration::from_millis(120));
        }

        Ok(pb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_carries_length_and_message() {
        let pb = ProgressBarBuilder::new("Replaying corpus")
            .with_template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .with_length(7)
            .build()
            .unwrap();
        assert_eq!(pb.length(), Some(7));
        assert_eq!(pb.message(), "Replaying corpus");
    }

    #[test]
    fn ticking_spinner_has_no_length() {
        let pb = ProgressBarBuilder::new("Merging").with_tick().build().unwrap();
        assert_eq!(pb.length(), None);
        pb.finish_and_clear();
    }

    #[test]
    fn bars_share_one_draw_target() {
        assert!(std::ptr::eq(multi_progress(), multi_progress()));
    }
}
