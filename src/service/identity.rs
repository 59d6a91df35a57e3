//! Origin labels for relayed messages.
//!
//! A guild is recognised by a custom emoji uploaded to a dedicated emoji guild and named
//! after the guild's normalized name. When the emoji exists the label shows it next to
//! the guild's display name, otherwise the normalized name alone is used.

use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use serenity::{
    all::{Emoji, GuildId},
    async_trait,
    http::Http,
};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::{error::AppError, model::guild::GuildIdentity};

/// Normalizes a guild display name into the name its emoji is expected to have.
///
/// Decomposes the name (NFKD) and strips combining marks so accented letters lose
/// their accents, lower-cases it, turns every whitespace run into `separator` and drops
/// any other character outside `[a-z0-9_]`.
///
/// # Arguments
/// - `name` - Guild display name
/// - `separator` - Inserted in place of whitespace, kept verbatim
///
/// # Returns
/// - `String` - The normalized name, possibly empty
pub fn normalize_guild_name(name: &str, separator: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut in_whitespace = false;

    for c in name
        .trim()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
    {
        if c.is_whitespace() {
            if !in_whitespace {
                normalized.push_str(separator);
                in_whitespace = true;
            }
            continue;
        }

        in_whitespace = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            normalized.push(c);
        }
    }

    normalized
}

/// A custom emoji usable as an origin badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiAsset {
    pub name: String,
    /// Message form of the emoji, `<:name:id>` or `<a:name:id>`.
    pub glyph: String,
}

impl From<&Emoji> for EmojiAsset {
    fn from(emoji: &Emoji) -> Self {
        Self {
            name: emoji.name.clone(),
            glyph: emoji.to_string(),
        }
    }
}

/// Source of the emoji set used for origin badges.
#[async_trait]
pub trait EmojiSource: Send + Sync {
    async fn fetch_emojis(&self) -> Result<Vec<EmojiAsset>, AppError>;
}

/// Emojis of a single guild fetched through Discord's REST API.
pub struct GuildEmojiSource {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl GuildEmojiSource {
    pub fn new(http: Arc<Http>, guild_id: GuildId) -> Self {
        Self { http, guild_id }
    }
}

#[async_trait]
impl EmojiSource for GuildEmojiSource {
    async fn fetch_emojis(&self) -> Result<Vec<EmojiAsset>, AppError> {
        let emojis = self.http.get_emojis(self.guild_id).await?;

        Ok(emojis.iter().map(EmojiAsset::from).collect())
    }
}

/// Renders origin labels from guild identities.
///
/// The emoji cache is an immutable snapshot swapped as a whole on refresh, so a label
/// is always rendered against one consistent emoji set.
pub struct IdentityResolver {
    separator: String,
    emojis: RwLock<Arc<HashMap<String, String>>>,
}

impl IdentityResolver {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            emojis: RwLock::new(Arc::new(HashMap::new())),
        }
    }

    /// Renders the label shown in front of the author's name.
    ///
    /// Never fails: a guild without a matching emoji gets its normalized name, and a
    /// name that normalizes to nothing is shown as is.
    pub fn render(&self, guild: &GuildIdentity) -> String {
        let normalized = normalize_guild_name(&guild.name, &self.separator);
        if normalized.is_empty() {
            tracing::debug!(
                "Guild {} ({}) has no normalizable name, using display name",
                guild.name,
                guild.id
            );
            return guild.name.clone();
        }

        let emojis = Arc::clone(&self.emojis.read());
        match emojis.get(&normalized) {
            Some(glyph) => format!("{} {}", glyph, guild.name),
            None => {
                tracing::debug!(
                    "No emoji named {} for guild {}, using plain label",
                    normalized,
                    guild.id
                );
                normalized
            }
        }
    }

    /// Replaces the emoji cache. When several emojis share a name the first one wins.
    ///
    /// # Returns
    /// - `usize` - Number of distinct emoji names now cached
    pub fn replace_emojis(&self, emojis: Vec<EmojiAsset>) -> usize {
        let mut by_name = HashMap::with_capacity(emojis.len());
        for emoji in emojis {
            by_name.entry(emoji.name).or_insert(emoji.glyph);
        }

        let count = by_name.len();
        *self.emojis.write() = Arc::new(by_name);
        count
    }

    /// Reloads the emoji cache from `source`. The old cache is kept on failure.
    pub async fn refresh(&self, source: &dyn EmojiSource) -> Result<usize, AppError> {
        let emojis = source.fetch_emojis().await?;

        Ok(self.replace_emojis(emojis))
    }
}

#[cfg(test)]
mod tests {
    use test_utils::serenity::create_test_emoji;

    use super::*;

    struct StaticEmojiSource(Vec<EmojiAsset>);

    #[async_trait]
    impl EmojiSource for StaticEmojiSource {
        async fn fetch_emojis(&self) -> Result<Vec<EmojiAsset>, AppError> {
            Ok(self.0.clone())
        }
    }

    struct FailingEmojiSource;

    #[async_trait]
    impl EmojiSource for FailingEmojiSource {
        async fn fetch_emojis(&self) -> Result<Vec<EmojiAsset>, AppError> {
            Err(AppError::NotFound("Emoji guild not available".to_string()))
        }
    }

    fn guild(name: &str) -> GuildIdentity {
        GuildIdentity::new(GuildId::new(1), name)
    }

    #[test]
    fn normalizes_accented_name() {
        assert_eq!(normalize_guild_name("ČVUT FEL", "_"), "cvut_fel");
        assert_eq!(normalize_guild_name("ČVUT FEL", ""), "cvutfel");
    }

    #[test]
    fn collapses_whitespace_and_drops_punctuation() {
        assert_eq!(
            normalize_guild_name("  VUT   Brno - FIT!  ", "_"),
            "vut_brno__fit"
        );
        assert_eq!(normalize_guild_name("Café\tNoir", "_"), "cafe_noir");
    }

    #[test]
    fn name_without_latin_letters_normalizes_to_empty() {
        assert_eq!(normalize_guild_name("日本語", "_"), "");
    }

    #[test]
    fn renders_plain_label_without_emoji() {
        let resolver = IdentityResolver::new("_");

        assert_eq!(resolver.render(&guild("ČVUT FEL")), "cvut_fel");
    }

    #[test]
    fn renders_plain_label_with_empty_separator() {
        let resolver = IdentityResolver::new("");

        assert_eq!(resolver.render(&guild("ČVUT FEL")), "cvutfel");
    }

    #[test]
    fn renders_emoji_label() {
        let resolver = IdentityResolver::new("_");
        let emoji = create_test_emoji(123456789, "cvut_fel", false);
        resolver.replace_emojis(vec![EmojiAsset::from(&emoji)]);

        assert_eq!(
            resolver.render(&guild("ČVUT FEL")),
            "<:cvut_fel:123456789> ČVUT FEL"
        );
    }

    #[test]
    fn renders_animated_emoji_label() {
        let resolver = IdentityResolver::new("_");
        let emoji = create_test_emoji(42, "muni", true);
        resolver.replace_emojis(vec![EmojiAsset::from(&emoji)]);

        assert_eq!(resolver.render(&guild("MUNI")), "<a:muni:42> MUNI");
    }

    #[test]
    fn falls_back_to_display_name_when_normalized_name_is_empty() {
        let resolver = IdentityResolver::new("_");

        assert_eq!(resolver.render(&guild("日本語")), "日本語");
    }

    #[tokio::test]
    async fn refresh_replaces_cache() {
        let resolver = IdentityResolver::new("_");
        resolver.replace_emojis(vec![EmojiAsset {
            name: "old".to_string(),
            glyph: "<:old:1>".to_string(),
        }]);

        let source = StaticEmojiSource(vec![EmojiAsset {
            name: "cvut_fel".to_string(),
            glyph: "<:cvut_fel:2>".to_string(),
        }]);
        let count = resolver.refresh(&source).await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(resolver.render(&guild("Old")), "old");
        assert_eq!(resolver.render(&guild("ČVUT FEL")), "<:cvut_fel:2> ČVUT FEL");
    }

    #[tokio::test]
    async fn failed_refresh_keeps_cache() {
        let resolver = IdentityResolver::new("_");
        resolver.replace_emojis(vec![EmojiAsset {
            name: "cvut_fel".to_string(),
            glyph: "<:cvut_fel:2>".to_string(),
        }]);

        assert!(resolver.refresh(&FailingEmojiSource).await.is_err());
        assert_eq!(resolver.render(&guild("ČVUT FEL")), "<:cvut_fel:2> ČVUT FEL");
    }
}
