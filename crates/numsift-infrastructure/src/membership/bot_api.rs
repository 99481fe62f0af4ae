use anyhow::{Result, bail};
use async_trait::async_trait;
use numsift_core::gate::MembershipOracle;
use numsift_core::session::OwnerId;
use serde::Deserialize;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Membership answered by the Bot API `getChatMember` method.
pub struct BotApiMembershipOracle {
    client: reqwest::Client,
    /// `{api_base}/bot{token}`
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatMember {
    status: String,
}

/// Statuses that count as having joined.
pub fn is_joined_status(status: &str) -> bool {
    matches!(status, "creator" | "administrator" | "member")
}

impl BotApiMembershipOracle {
    pub fn new(token: &str) -> Self {
        Self::with_api_base(DEFAULT_API_BASE, token)
    }

    pub fn with_api_base(api_base: &str, token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/bot{}", api_base.trim_end_matches('/'), token),
        }
    }

    fn parse_status(body: &str) -> Result<String> {
        let response: ApiResponse<ChatMember> = serde_json::from_str(body)?;
        match (response.ok, response.result) {
            (true, Some(member)) => Ok(member.status),
            _ => bail!(
                "getChatMember failed: {}",
                response.description.unwrap_or_else(|| "no description".to_string())
            ),
        }
    }
}

#[async_trait]
impl MembershipOracle for BotApiMembershipOracle {
    async fn is_member(&self, chat_id: &str, owner: OwnerId) -> Result<bool> {
        let body = self
            .client
            .get(format!("{}/getChatMember", self.endpoint))
            .query(&[("chat_id", chat_id.to_string()), ("user_id", owner.to_string())])
            .send()
            .await?
            .text()
            .await?;
        let status = Self::parse_status(&body)?;
        tracing::debug!(chat_id, owner, %status, "Membership status");
        Ok(is_joined_status(&status))
    }
}
