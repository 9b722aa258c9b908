pub mod candle;
pub mod instrument;
pub mod signals;

pub use candle::{Candle, PriceQuote};
pub use instrument::*;
pub use signals::*;
