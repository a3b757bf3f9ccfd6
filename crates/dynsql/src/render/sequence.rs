//! Per-render-pass parameter numbering.

/// Monotonic counter that supplies unique parameter-key suffixes.
///
/// One sequence belongs to exactly one render pass. Every sub-renderer of that
/// pass borrows it mutably through the [`RenderContext`](super::RenderContext),
/// which is what makes keys unique across the whole statement rather than per
/// clause.
#[derive(Debug, Default)]
pub struct Sequence {
    last: u64,
}

impl Sequence {
    /// Create a sequence whose first value is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the next value: 1, 2, 3, ...
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    /// Number of values handed out so far.
    pub fn issued(&self) -> u64 {
        self.last
    }
}
