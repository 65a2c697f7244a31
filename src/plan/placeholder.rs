//! `<Token>` placeholders used in profile subdir and filename templates.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use super::sanitize::{SANITIZE_CHAR, sanitize_fragment};

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([^<>]*)>").expect("valid placeholder regex"));

/// The value a placeholder stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    /// `<TID>`, `<TitleID>`
    TitleId,
    /// `<BID>`, `<BuildID>`
    BuildId,
    /// `<Core Name>`, `<Core>`
    CoreName,
    /// `<Cheat Name>`, `<Pack Name>`
    CheatName,
    /// `<Game>`, `<GameID>`, `<CRC>`, `<SERIAL>`
    Identifier,
}

impl Placeholder {
    /// Recognize a token name, ignoring case and inner spaces.
    pub fn parse(token: &str) -> Option<Self> {
        let key: String = token
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "tid" | "titleid" => Some(Self::TitleId),
            "bid" | "buildid" => Some(Self::BuildId),
            "corename" | "core" => Some(Self::CoreName),
            "cheatname" | "packname" => Some(Self::CheatName),
            "game" | "gameid" | "crc" | "serial" => Some(Self::Identifier),
            _ => None,
        }
    }
}

/// Placeholders that appear in `template`, in order, without duplicates.
pub fn placeholders_in(template: &str) -> Vec<Placeholder> {
    let mut found = Vec::new();
    for caps in TOKEN.captures_iter(template) {
        if let Some(p) = Placeholder::parse(&caps[1]) {
            if !found.contains(&p) {
                found.push(p);
            }
        }
    }
    found
}

/// Replace every `<Token>` in one pass.
///
/// `resolve` returns the (already safe) value for a known placeholder, or
/// `None` when the field is unset. Unknown and unresolved tokens become
/// `_Token_` so they stay visible in the path. Stray angle brackets are
/// replaced as well.
pub fn substitute<F>(template: &str, mut resolve: F) -> String
where
    F: FnMut(Placeholder) -> Option<String>,
{
    let replaced = TOKEN.replace_all(template, |caps: &Captures<'_>| {
        let token = &caps[1];
        Placeholder::parse(token)
            .and_then(&mut resolve)
            .unwrap_or_else(|| unresolved(token))
    });
    replaced.replace(['<', '>'], SANITIZE_CHAR)
}

fn unresolved(token: &str) -> String {
    format!("{SANITIZE_CHAR}{}{SANITIZE_CHAR}", sanitize_fragment(token))
}
