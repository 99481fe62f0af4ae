use crate::session::OwnerId;
use anyhow::Result;
use async_trait::async_trait;

/// Answers "is this owner a member of that chat?".
///
/// Implementations report transport or lookup problems as `Err`; the gate
/// treats every error as "not a member".
#[async_trait]
pub trait MembershipOracle: Send + Sync {
    async fn is_member(&self, chat_id: &str, owner: OwnerId) -> Result<bool>;
}
