use super::channel::RequiredChannel;
use super::oracle::MembershipOracle;
use crate::error::{NumsiftError, Result};
use crate::session::OwnerId;
use futures::future::join_all;
use std::sync::Arc;

/// Per-channel outcome of one gate check, in channel order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateReport {
    pub statuses: Vec<bool>,
}

impl GateReport {
    /// True iff every channel reported membership.
    pub fn passed(&self) -> bool {
        self.statuses.iter().all(|joined| *joined)
    }

    /// Indices of the channels the owner still has to join.
    pub fn missing(&self) -> Vec<usize> {
        self.statuses
            .iter()
            .enumerate()
            .filter_map(|(i, joined)| (!joined).then_some(i))
            .collect()
    }

    /// `Ok(())` when passed, otherwise [`NumsiftError::GateNotPassed`].
    pub fn into_result(self) -> Result<()> {
        if self.passed() {
            Ok(())
        } else {
            Err(NumsiftError::GateNotPassed {
                missing: self.missing(),
            })
        }
    }
}

/// Checks an owner against the fixed list of required channels.
pub struct AccessGate {
    channels: Vec<RequiredChannel>,
    oracle: Arc<dyn MembershipOracle>,
}

impl AccessGate {
    pub fn new(channels: Vec<RequiredChannel>, oracle: Arc<dyn MembershipOracle>) -> Self {
        Self { channels, oracle }
    }

    pub fn channels(&self) -> &[RequiredChannel] {
        &self.channels
    }

    /// Queries every channel concurrently and waits for all answers.
    ///
    /// A failed query counts as "not a member". No query is retried.
    pub async fn check(&self, owner: OwnerId) -> GateReport {
        let queries = self.channels.iter().map(|channel| async move {
            match self.oracle.is_member(&channel.chat_id, owner).await {
                Ok(joined) => joined,
                Err(e) => {
                    tracing::warn!(
                        owner,
                        chat_id = %channel.chat_id,
                        "Membership query failed, treating as not joined: {}",
                        e
                    );
                    false
                }
            }
        });
        let statuses = join_all(queries).await;
        let report = GateReport { statuses };
        tracing::debug!(owner, passed = report.passed(), missing = ?report.missing(), "Gate checked");
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Per-chat scripted answers; chats absent from the map fail the query.
    struct ScriptedOracle {
        answers: HashMap<String, bool>,
        calls: AtomicUsize,
    }

    impl ScriptedOracle {
        fn new(answers: &[(&str, bool)]) -> Self {
            Self {
                answers: answers
                    .iter()
                    .map(|(chat, joined)| (chat.to_string(), *joined))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MembershipOracle for ScriptedOracle {
        async fn is_member(&self, chat_id: &str, _owner: OwnerId) -> anyhow::Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.answers
                .get(chat_id)
                .copied()
                .ok_or_else(|| anyhow::anyhow!("chat not found: {}", chat_id))
        }
    }

    fn channels() -> Vec<RequiredChannel> {
        vec![
            RequiredChannel::new("@a", "A", "https://t.me/a"),
            RequiredChannel::new("@b", "B", "https://t.me/b"),
            RequiredChannel::new("@c", "C", "https://t.me/c"),
        ]
    }

    #[tokio::test]
    async fn test_all_joined_passes() {
        let oracle = Arc::new(ScriptedOracle::new(&[("@a", true), ("@b", true), ("@c", true)]));
        let gate = AccessGate::new(channels(), oracle.clone());
        let report = gate.check(1).await;
        assert!(report.passed());
        assert!(report.missing().is_empty());
        assert!(report.into_result().is_ok());
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_single_failure_fails_closed() {
        // "@b" is unknown to the oracle, so its query errors.
        let oracle = Arc::new(ScriptedOracle::new(&[("@a", true), ("@c", true)]));
        let gate = AccessGate::new(channels(), oracle);
        let report = gate.check(1).await;
        assert!(!report.passed());
        assert_eq!(report.missing(), vec![1]);
        assert_eq!(
            report.into_result().unwrap_err(),
            NumsiftError::GateNotPassed { missing: vec![1] }
        );
    }

    #[tokio::test]
    async fn test_missing_set_keeps_channel_order() {
        let oracle = Arc::new(ScriptedOracle::new(&[("@a", false), ("@b", true), ("@c", false)]));
        let gate = AccessGate::new(channels(), oracle);
        assert_eq!(gate.check(1).await.missing(), vec![0, 2]);
    }

    #[tokio::test]
    async fn test_no_channels_always_passes() {
        let oracle = Arc::new(ScriptedOracle::new(&[]));
        let gate = AccessGate::new(Vec::new(), oracle);
        assert!(gate.check(1).await.passed());
    }
}
