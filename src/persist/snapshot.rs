use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Flat process-wide mapping of arbitrary keys to values.
pub type BotData = HashMap<String, Value>;

/// Per-identifier mapping of arbitrary keys to values, as handed out for
/// one chat or one user.
pub type ScopedData = HashMap<String, Value>;

/// Conversation-state mappings of all handlers, keyed by handler name.
pub type ConversationData = HashMap<String, HashMap<ConversationKey, Value>>;

/// Key of one tracked conversation within a handler: the chat and/or user
/// the conversation belongs to.
///
/// Serializes as the string `chat/user` so it can act as a JSON object
/// key; an unset side is written as `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub chat_id: Option<i64>,
    pub user_id: Option<i64>,
}

impl ConversationKey {
    pub fn new(chat_id: Option<i64>, user_id: Option<i64>) -> Self {
        Self { chat_id, user_id }
    }

    /// Key of a per-chat conversation.
    pub fn chat(chat_id: i64) -> Self {
        Self::new(Some(chat_id), None)
    }

    /// Key of a per-chat, per-user conversation.
    pub fn chat_user(chat_id: i64, user_id: i64) -> Self {
        Self::new(Some(chat_id), Some(user_id))
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.chat_id {
            Some(id) => write!(f, "{id}")?,
            None => f.write_str("-")?,
        }
        f.write_str("/")?;
        match self.user_id {
            Some(id) => write!(f, "{id}"),
            None => f.write_str("-"),
        }
    }
}

impl FromStr for ConversationKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (chat, user) = s
            .split_once('/')
            .ok_or_else(|| format!("malformed conversation key '{s}'"))?;

        let side = |part: &str| -> std::result::Result<Option<i64>, String> {
            if part == "-" {
                Ok(None)
            } else {
                part.parse()
                    .map(Some)
                    .map_err(|err| format!("malformed conversation key '{s}': {err}"))
            }
        };

        Ok(Self {
            chat_id: side(chat)?,
            user_id: side(user)?,
        })
    }
}

impl Serialize for ConversationKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ConversationKey {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        struct KeyVisitor;

        impl Visitor<'_> for KeyVisitor {
            type Value = ConversationKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a conversation key of the form `chat/user`")
            }

            fn visit_str<E: de::Error>(
                self,
                v: &str,
            ) -> std::result::Result<ConversationKey, E> {
                v.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(KeyVisitor)
    }
}

/// Combined persisted state of all four mappings.
///
/// Every field carries `#[serde(default)]`: a mapping absent from the
/// stored payload boots empty instead of failing deserialization, so
/// payloads written by older snapshots remain loadable.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub bot_data: BotData,

    #[serde(default)]
    pub chat_data: HashMap<i64, ScopedData>,

    #[serde(default)]
    pub user_data: HashMap<i64, ScopedData>,

    #[serde(default)]
    pub conversations: ConversationData,
}

impl Snapshot {
    /// Serialized form of an empty snapshot, written when the backing row
    /// is first created.
    pub fn empty_payload() -> String {
        "{}".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_conversation_key_display_round_trip() {
        let keys = [
            ConversationKey::chat(42),
            ConversationKey::chat_user(42, 7),
            ConversationKey::new(None, Some(-3)),
        ];
        for key in keys {
            let encoded = key.to_string();
            let decoded: ConversationKey = encoded.parse().unwrap();
            assert_eq!(decoded, key);
        }
        assert_eq!(ConversationKey::chat(42).to_string(), "42/-");
    }

    #[test]
    fn test_conversation_key_rejects_garbage() {
        assert!("scoop".parse::<ConversationKey>().is_err());
        assert!("a/b".parse::<ConversationKey>().is_err());
        assert!("1/2/3".parse::<ConversationKey>().is_err());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut snapshot = Snapshot::default();
        snapshot.bot_data.insert("greeting".into(), json!("hello"));
        snapshot
            .chat_data
            .entry(3)
            .or_default()
            .insert("topic".into(), json!("rust"));
        snapshot
            .user_data
            .entry(-100)
            .or_default()
            .insert("lang".into(), json!(["en", "de"]));
        snapshot
            .conversations
            .entry("signup".into())
            .or_default()
            .insert(ConversationKey::chat_user(3, 7), json!(2));

        let payload = serde_json::to_string(&snapshot).unwrap();
        let restored: Snapshot = serde_json::from_str(&payload).unwrap();
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_absent_mappings_default_to_empty() {
        let restored: Snapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(restored, Snapshot::default());

        let partial: Snapshot =
            serde_json::from_str(r#"{"bot_data":{"k":"v"}}"#).unwrap();
        assert_eq!(partial.bot_data.get("k"), Some(&json!("v")));
        assert!(partial.chat_data.is_empty());
        assert!(partial.user_data.is_empty());
        assert!(partial.conversations.is_empty());
    }

    #[test]
    fn test_integer_map_keys_survive_json() {
        let mut snapshot = Snapshot::default();
        snapshot.chat_data.entry(-42).or_default();

        let payload = serde_json::to_string(&snapshot).unwrap();
        assert!(payload.contains("\"-42\""));

        let restored: Snapshot = serde_json::from_str(&payload).unwrap();
        assert!(restored.chat_data.contains_key(&-42));
    }
}
