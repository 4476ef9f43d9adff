use anyhow::Result;

/// Capabilities injected into the selector. Supplying hooks enables the `f`
/// key; the selector itself stays free of persistence and logging concerns.
pub trait SelectorHooks<T> {
    /// Flip favorite membership for the current item. The selector
    /// re-renders afterwards regardless of the outcome.
    fn toggle_favorite(&mut self, item: &T) -> Result<()>;

    /// Report a non-fatal failure; the selection loop continues.
    fn notify_failure(&mut self, what: &str, err: &anyhow::Error);
}
