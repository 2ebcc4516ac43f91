//! Lottery engine: tickets, draws, hit counting and prize allocation
//!
//! Everything in here is synchronous and free of I/O. Persistence lives in `store`.

pub mod types;
pub mod validator;
pub mod ticket;
pub mod winning;
pub mod hits;
pub mod pot;
pub mod prize_pool;
pub mod results;
pub mod import;

pub use types::{GameVariant, Symbol, ALPHABET};
pub use validator::NumberValidator;
pub use ticket::{StorageId, Ticket, TicketBook, TicketId};
pub use winning::{DrawState, WinningNumberSet};
pub use hits::{HitCounter, HitTier};
pub use pot::{Amount, PotConfiguration, DEFAULT_TICKET_PRICE};
pub use prize_pool::{PrizePool, PrizePoolCalculator, PRIZE_SHARE};
pub use results::{PrizeResult, ResultSet, ResultSummary, ResultsAggregator};
pub use import::{parse_paste, ImportLine, ImportedRow};
