//! Vault positions, position loading and portfolio reporting

mod position;
mod portfolio;
pub mod loader;

pub use position::{VaultPosition, VaultStatus, WithdrawalKind, WithdrawalQuote};
pub use portfolio::{PortfolioReport, PortfolioTotals, PeriodBreakdown, PositionRow};
pub use loader::{load_positions, load_positions_from_reader};
