mod driver;
mod ticker;

pub use driver::{spawn_interval, TickSignal, TickerHandle};
pub use ticker::{Ticker, TickerState};
