//! The job runner's side of a run: log groups, secrets, outputs.
//!
//! Plain log lines go through `tracing`; only the runner-specific controls
//! live here.

/// Runner integration used by [`crate::pipeline`].
pub trait JobSurface {
    /// Register a value that must never appear in any emitted text.
    fn mask_secret(&mut self, secret: &str);

    /// Open a collapsible log group.
    fn start_group(&mut self, title: &str);

    /// Close the innermost open log group.
    fn end_group(&mut self);

    /// Publish one named output value for downstream steps.
    fn set_output(&mut self, name: &str, value: &str) -> std::io::Result<()>;
}
