//! Task organization engine: catalogs, project hierarchy, filtering,
//! ordering and display projection.

pub mod board;
pub mod catalog;
pub mod display;
pub mod filter;
pub mod hierarchy;
pub mod ordering;
pub mod palette;
pub mod priority;

#[cfg(test)]
mod tests;

pub use board::*;
pub use catalog::*;
pub use display::*;
pub use filter::*;
pub use hierarchy::*;
pub use ordering::*;
pub use palette::*;
pub use priority::*;
