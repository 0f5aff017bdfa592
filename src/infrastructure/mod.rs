pub mod seed;
pub mod services;
pub mod settlement;
pub mod timers;
pub mod wallet;

pub use seed::{SeedListingSource, parse_listings, seed_listings};
pub use services::{ClockTimeProvider, ConsoleLogger, MemoryLogger};
pub use settlement::{FailureInjection, SimulatedSettlementGateway};
pub use timers::{GlooTimer, ImmediateTimer, PendingTimer};
pub use wallet::DemoWallet;
