//! Terminal user interface

mod cli;
mod interrupt;
mod progress_bar;

pub use cli::{Args, Cli};
pub use interrupt::watch_interrupts;
pub use progress_bar::spawn_progress_bar;
