pub mod initialize_pool;
pub mod open_accounts;
pub mod invest;
pub mod rebalance;
pub mod withdraw;
pub mod update_pool;
pub mod views;

pub use initialize_pool::*;
pub use open_accounts::*;
pub use invest::*;
pub use rebalance::*;
pub use withdraw::*;
pub use update_pool::*;
pub use views::*;
