pub mod cache;
pub mod signals;

pub use cache::Cache;
pub use signals::{SignalGenerator, SignalStore};
