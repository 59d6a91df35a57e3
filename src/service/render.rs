//! Builds the text posted to destination channels.

use crate::model::message::{InboundMessage, OutboundRendition, StickerRef};

/// Discord's message length limit in characters.
pub const MESSAGE_LIMIT: usize = 2000;

/// Prefix of every part after the first when a copy is split.
pub const CONTINUATION_MARK: &str = "***Continuation***\n";

const FORWARDED_LABEL: &str = "Forwarded";

/// Markdown that only renders at the start of a line.
const BLOCK_MARKERS: [&str; 6] = ["### ", "## ", "-# ", "# ", ">>> ", "> "];

/// Renders one relayed message.
///
/// The header `**{label} {author}:**` precedes the content. Content starting with a
/// block marker is moved to its own line so the marker still renders. A reply is
/// prefixed with a quote of the referenced message and a forward shows the forwarded
/// content in a code block. Guild stickers and attachments that are not uploaded again
/// follow as links. The result is split into parts of at most `MESSAGE_LIMIT`
/// characters, nothing of the content is dropped.
///
/// # Arguments
/// - `label` - Origin label from the identity resolver
/// - `message` - The message being relayed
///
/// # Returns
/// - `OutboundRendition` - One or more parts, later parts start with `CONTINUATION_MARK`
pub fn render(label: &str, message: &InboundMessage) -> OutboundRendition {
    let mut text = String::new();

    if let Some(quote) = message
        .reply_to
        .as_deref()
        .map(quote_reply)
        .filter(|q| !q.is_empty())
    {
        text.push_str(&quote);
        text.push('\n');
    }

    text.push_str(&format!("**{} {}:** ", label, message.author.display_name));
    match &message.forwarded {
        Some(forwarded) => {
            text.push_str(FORWARDED_LABEL);
            text.push_str(&format!("\n```\n{}\n```", escape_code_block(forwarded)));
        }
        None => {
            if BLOCK_MARKERS
                .iter()
                .any(|marker| message.content.starts_with(marker))
            {
                text.push('\n');
            }
            text.push_str(&message.content);
        }
    }

    for sticker in &message.stickers {
        if let StickerRef::Custom { url } = sticker {
            let trimmed = text.trim_end().len();
            text.truncate(trimmed);
            text.push_str(&format!("[.]({})", url));
        }
    }

    for attachment in &message.attachments {
        text.push('\n');
        if attachment.spoiler {
            text.push_str(&format!("||{}||", attachment.url));
        } else {
            text.push_str(&attachment.url);
        }
    }

    OutboundRendition {
        parts: split(text.trim_end()),
    }
}

/// Quotes the referenced message, leaving out lines that were quotes themselves.
fn quote_reply(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.starts_with('>') && !line.trim().is_empty())
        .map(|line| format!("> {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keeps forwarded content from closing the surrounding code block.
fn escape_code_block(content: &str) -> String {
    content.replace("```", "`\u{200b}``")
}

/// Splits text into parts fitting `MESSAGE_LIMIT`, marking every part after the first.
///
/// A part ends at the last line break in the second half of its window, or the last
/// space there when there is no line break, or mid-word when there is neither.
/// Whitespace at a split point is the only thing dropped.
fn split(text: &str) -> Vec<String> {
    let mark_len = CONTINUATION_MARK.chars().count();
    let mut parts = Vec::new();
    let mut rest = text;

    loop {
        let budget = if parts.is_empty() {
            MESSAGE_LIMIT
        } else {
            MESSAGE_LIMIT - mark_len
        };

        let Some((hard, _)) = rest.char_indices().nth(budget) else {
            parts.push(rest);
            break;
        };

        let window = &rest[..hard];
        let usable = |index: &usize| *index > window.len() / 2;
        let cut = window
            .rfind('\n')
            .filter(usable)
            .or_else(|| window.rfind(' ').filter(usable))
            .map_or(hard, |index| index + 1);

        parts.push(&rest[..cut]);
        rest = rest[cut..].trim_start_matches([' ', '\n']);
        if rest.is_empty() {
            break;
        }
    }

    parts
        .into_iter()
        .enumerate()
        .map(|(index, part)| {
            if index == 0 {
                part.trim_end().to_string()
            } else {
                format!("{}{}", CONTINUATION_MARK, part.trim_end())
            }
        })
        .collect()
}
