use async_trait::async_trait;
use numsift_core::gate::MembershipOracle;
use numsift_core::session::OwnerId;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// Membership answered from an in-memory table, seeded from config.
///
/// Chats missing from the table have no members. The console front end uses
/// `grant`/`revoke` to simulate joining and leaving.
#[derive(Debug, Default)]
pub struct StaticMembershipOracle {
    members: RwLock<HashMap<String, HashSet<OwnerId>>>,
}

impl StaticMembershipOracle {
    pub fn new(table: HashMap<String, Vec<OwnerId>>) -> Self {
        let members = table
            .into_iter()
            .map(|(chat_id, owners)| (chat_id, owners.into_iter().collect()))
            .collect();
        Self {
            members: RwLock::new(members),
        }
    }

    pub async fn grant(&self, chat_id: &str, owner: OwnerId) {
        let mut members = self.members.write().await;
        members.entry(chat_id.to_string()).or_default().insert(owner);
    }

    pub async fn revoke(&self, chat_id: &str, owner: OwnerId) {
        let mut members = self.members.write().await;
        if let Some(owners) = members.get_mut(chat_id) {
            owners.remove(&owner);
        }
    }
}

#[async_trait]
impl MembershipOracle for StaticMembershipOracle {
    async fn is_member(&self, chat_id: &str, owner: OwnerId) -> anyhow::Result<bool> {
        let members = self.members.read().await;
        Ok(members
            .get(chat_id)
            .is_some_and(|owners| owners.contains(&owner)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_table_lookup_and_grant() {
        let oracle = StaticMembershipOracle::new(HashMap::from([("@a".to_string(), vec![1, 2])]));
        assert!(oracle.is_member("@a", 1).await.unwrap());
        assert!(!oracle.is_member("@a", 3).await.unwrap());
        assert!(!oracle.is_member("@b", 1).await.unwrap());

        oracle.grant("@b", 1).await;
        assert!(oracle.is_member("@b", 1).await.unwrap());

        oracle.revoke("@a", 1).await;
        assert!(!oracle.is_member("@a", 1).await.unwrap());
    }
}
