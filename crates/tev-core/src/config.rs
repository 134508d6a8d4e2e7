use std::{env, fs, path::Path};

use crate::{builder::ChatFilter, domain::ChatRef, errors::Error, peer::normalize, Result};

/// Chat filter configuration read from the environment.
///
/// - `TEV_CHATS`: comma separated chat references (`-100123`, `42`, `me`,
///   `+15550100`, `@rustlang`)
/// - `TEV_BLACKLIST_CHATS`: treat `TEV_CHATS` as a blacklist (`1/true/yes/on`)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub chats: Option<Vec<ChatRef>>,
    pub blacklist_chats: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same parsing as [`Config::load`], reading keys through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let chats = match lookup("TEV_CHATS") {
            Some(raw) => Some(parse_chat_list(&raw)?),
            None => None,
        };
        let blacklist_chats = lookup("TEV_BLACKLIST_CHATS")
            .map(|s| parse_bool(&s))
            .unwrap_or(false);

        if blacklist_chats && chats.is_none() {
            return Err(Error::Config(
                "TEV_BLACKLIST_CHATS requires TEV_CHATS".to_string(),
            ));
        }

        Ok(Self {
            chats,
            blacklist_chats,
        })
    }

    /// Unresolved filter for a builder.
    pub fn chat_filter(&self) -> ChatFilter {
        ChatFilter {
            chats: self.chats.clone(),
            blacklist: self.blacklist_chats,
        }
    }
}

/// Parse one chat reference as written in configuration.
pub fn parse_chat_ref(raw: &str) -> Result<ChatRef> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(Error::Config("empty chat reference".to_string()));
    }
    if let Ok(id) = s.parse::<i64>() {
        if !s.starts_with('+') {
            normalize(id).map_err(|e| Error::Config(format!("chat reference {s}: {e}")))?;
            return Ok(ChatRef::Id(id));
        }
    }
    if matches!(s.to_lowercase().as_str(), "me" | "self") {
        return Ok(ChatRef::Me);
    }
    if let Some(phone) = s.strip_prefix('+') {
        if phone.chars().all(|c| c.is_ascii_digit()) && !phone.is_empty() {
            return Ok(ChatRef::Phone(s.to_string()));
        }
    }

    let username = s.strip_prefix('@').unwrap_or(s);
    let valid = !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(Error::Config(format!("invalid chat reference: {raw}")));
    }
    Ok(ChatRef::Username(username.to_string()))
}

fn parse_chat_list(raw: &str) -> Result<Vec<ChatRef>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_chat_ref)
        .collect()
}

fn parse_bool(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn parses_chat_references() {
        assert_eq!(parse_chat_ref("-100123").unwrap(), ChatRef::Id(-100123));
        assert_eq!(parse_chat_ref(" 42 ").unwrap(), ChatRef::Id(42));
        assert_eq!(parse_chat_ref("me").unwrap(), ChatRef::Me);
        assert_eq!(parse_chat_ref("Self").unwrap(), ChatRef::Me);
        assert_eq!(
            parse_chat_ref("+15550100").unwrap(),
            ChatRef::Phone("+15550100".to_string())
        );
        assert_eq!(
            parse_chat_ref("@rust_lang").unwrap(),
            ChatRef::Username("rust_lang".to_string())
        );
        assert_eq!(
            parse_chat_ref("rustlang").unwrap(),
            ChatRef::Username("rustlang".to_string())
        );
        assert!(parse_chat_ref("not a chat").is_err());
        assert!(parse_chat_ref("@").is_err());
    }

    #[test]
    fn rejects_ids_without_a_canonical_encoding() {
        for raw in ["9223372036854775000", "9223372036854775807"] {
            assert!(matches!(parse_chat_ref(raw), Err(Error::Config(_))), "{raw}");
        }
        assert_eq!(
            parse_chat_ref("-9223372036854775808").unwrap(),
            ChatRef::Id(i64::MIN)
        );
        let err = Config::from_lookup(lookup(&[("TEV_CHATS", "42,9223372036854775000")]));
        assert!(err.is_err());
    }

    #[test]
    fn no_chats_means_no_filter() {
        let cfg = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.chat_filter().chats, None);
    }

    #[test]
    fn blacklist_config() {
        let cfg = Config::from_lookup(lookup(&[
            ("TEV_CHATS", "me, -100, @news,"),
            ("TEV_BLACKLIST_CHATS", "yes"),
        ]))
        .unwrap();
        let filter = cfg.chat_filter();
        assert!(filter.blacklist);
        assert_eq!(
            filter.chats,
            Some(vec![
                ChatRef::Me,
                ChatRef::Id(-100),
                ChatRef::Username("news".to_string()),
            ])
        );
    }

    #[test]
    fn blacklist_without_chats_is_rejected() {
        let err = Config::from_lookup(lookup(&[("TEV_BLACKLIST_CHATS", "1")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
