use serenity::all::GuildId;

/// Identity of the guild a relayed message originated from.
///
/// Captured once per relayed message so edits re-render with the same label even if
/// the guild is renamed in the meantime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildIdentity {
    pub id: GuildId,
    /// Display name of the guild as shown in Discord.
    pub name: String,
}

impl GuildIdentity {
    pub fn new(id: GuildId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
