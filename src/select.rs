//! Keyboard-driven paged list selection for interactive mode.
//!
//! The state machine (`state`) is pure and headless; terminal access goes
//! through the `Surface` trait so rendering is testable against an
//! in-memory buffer. The runner owns raw mode for the duration of one
//! invocation and restores it on every exit path. Ctrl-C restores the
//! terminal and exits with the conventional interrupt status (130)
//! instead of re-raising SIGINT; callers observe the same termination.

mod hooks;
pub mod prompt;
mod runner;
mod state;
mod surface;

pub use self::hooks::SelectorHooks;
pub use self::runner::PagedSelector;
pub use self::state::{Key, PagedState, Step};
pub use self::surface::{BufferSurface, StdoutSurface, Surface};
