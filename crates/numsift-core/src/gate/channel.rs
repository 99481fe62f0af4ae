use serde::{Deserialize, Serialize};

/// A channel the owner must belong to before ingestion is committed.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RequiredChannel {
    /// Chat identifier understood by the membership oracle (`@name` or numeric id)
    pub chat_id: String,
    /// Display name used in the join prompt
    pub name: String,
    /// Invite link offered for joining
    pub invite: String,
}

impl RequiredChannel {
    pub fn new(
        chat_id: impl Into<String>,
        name: impl Into<String>,
        invite: impl Into<String>,
    ) -> Self {
        Self {
            chat_id: chat_id.into(),
            name: name.into(),
            invite: invite.into(),
        }
    }
}

/// Channels required when the config file does not list any.
pub fn default_channels() -> Vec<RequiredChannel> {
    vec![
        RequiredChannel::new("@DxviLZ", "Announcements", "https://t.me/DxviLZ"),
        RequiredChannel::new(
            "-1002343539646",
            "VIP Lounge",
            "https://t.me/+KKO1tJ1pN_Q3ZjE1",
        ),
        RequiredChannel::new(
            "-1002495149062",
            "Dev Chat",
            "https://t.me/+eusIzYrovnRlZGQ1",
        ),
    ]
}
