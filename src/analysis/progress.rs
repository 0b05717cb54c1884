use std::cell::RefCell;
use std::fmt;

use indicatif::{ProgressBar, ProgressStyle};

/// Long-running phases reported to a [`Progress`] sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchingVariants,
    CheckingUnused,
    CheckingDuplicates,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::FetchingVariants => "Fetching language variants",
            Stage::CheckingUnused => "Checking unused assets",
            Stage::CheckingDuplicates => "Checking duplicate assets",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Receives progress of a staged loop
pub trait Progress {
    fn start(&self, stage: Stage, total: usize);
    fn advance(&self, message: &str);
    fn finish(&self);
}

/// Progress sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn start(&self, _stage: Stage, _total: usize) {}
    fn advance(&self, _message: &str) {}
    fn finish(&self) {}
}

/// Progress sink drawing one `indicatif` bar per stage
#[derive(Default)]
pub struct BarProgress {
    bar: RefCell<Option<ProgressBar>>,
}

impl BarProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Progress for BarProgress {
    fn start(&self, stage: Stage, total: usize) {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix} [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_prefix(stage.as_str());
        if let Some(previous) = self.bar.replace(Some(bar)) {
            previous.finish_and_clear();
        }
    }

    fn advance(&self, message: &str) {
        if let Some(bar) = self.bar.borrow().as_ref() {
            bar.set_message(message.to_string());
            bar.inc(1);
        }
    }

    fn finish(&self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
