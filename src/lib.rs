//! Polla - ticket matching and prize allocation for Polla and Micro draws
//!
//! Players pick 6 (Polla) or 3 (Micro) numbers from `0`, `00` and `1`-`36`. After a draw,
//! tickets hitting every winning number split the prize pool, which is built from 80% of
//! the paid ticket fees plus the weekly and accumulated pot.
//!
//! The pure engine lives in [`lottery`]. [`session::LotterySession`] keeps the operator's
//! state and mirrors it to a [`store`] backend.

pub mod coalesce;
pub mod config;
pub mod errors;
pub mod lottery;
pub mod report;
pub mod session;
pub mod storage;
pub mod store;

pub use config::{ConfigBuilder, ConfigLoader, PollaConfig};
pub use errors::{PollaError, PollaResult, ValidationError};
pub use lottery::{
    GameVariant, HitCounter, PotConfiguration, PrizeResult, ResultSet, ResultsAggregator, Symbol,
    Ticket, WinningNumberSet,
};
pub use session::{LotterySession, Notice, Outcome, SessionOptions};
pub use store::{MemoryStore, RocksStore, Stores};
