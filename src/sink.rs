//! Where checkers write their per-file progress lines
//!
//! The console implementation lives in [`crate::cli::Output`]; library users
//! that do not want output pass [`NullSink`].

pub trait OutputSink {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn info(&self, _message: &str) {}
    fn warning(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

#[cfg(test)]
pub(crate) use memory::{Level, MemorySink};
