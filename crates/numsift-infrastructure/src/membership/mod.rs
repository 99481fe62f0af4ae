//! Membership oracle adapters.

mod bot_api;
mod static_table;

pub use bot_api::{BotApiMembershipOracle, is_joined_status};
pub use static_table::StaticMembershipOracle;
