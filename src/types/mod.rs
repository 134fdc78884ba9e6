pub mod candle;
pub mod price_action;
pub mod signal;

pub use candle::*;
pub use price_action::*;
pub use signal::*;
