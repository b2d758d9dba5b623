use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Every fixed slot key in use. A slot key is also the file stem of its
/// backing `<key>.json` file, so two keys must never sanitize to the same
/// name. Nothing namespaces callers apart; a reused key silently corrupts
/// whatever else lives under it. Per-conversation history uses the dynamic
/// `assistant-chat-<id>` pattern from [`assistant_chat`].
pub mod keys {
    pub const TENANTS: &str = "tenants";
    pub const SUBSCRIPTIONS: &str = "subscriptions";
    pub const INVOICES: &str = "invoices";
    pub const TRANSACTIONS: &str = "transactions";
    pub const CREDITS: &str = "credits";
    pub const PLANS: &str = "plans";
    pub const CONTACTS: &str = "contacts";
    pub const TEMPLATES: &str = "templates";
    pub const CAMPAIGNS: &str = "campaigns";
    pub const TICKETS: &str = "tickets";
    pub const STAFF: &str = "staff";
    pub const ASSISTANTS: &str = "assistants";
    pub const BOT_FLOW: &str = "bot-flow";
    pub const SYSTEM_SETTINGS: &str = "system-settings";
    pub const THEME: &str = "theme";

    pub fn assistant_chat(assistant_id: u64) -> String {
        format!("assistant-chat-{assistant_id}")
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("USERPROFILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_state_dir() -> PathBuf {
    home_dir().join(".relaydeck").join("state")
}

pub fn default_export_dir() -> PathBuf {
    home_dir().join(".relaydeck").join("exports")
}

/// File-backed key-value store. One JSON slot per key, last write wins.
///
/// Reads never fail: an absent slot, an unreadable file and undecodable
/// JSON all look like "nothing stored yet" and yield the caller's default.
/// Writes go through a temp file and rename so a crash mid-write leaves
/// the previous slot intact.
#[derive(Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn open_default() -> Self {
        Self {
            root: default_state_dir(),
        }
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_slot_name(key)))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let data = match fs::read(self.slot_path(key)) {
            Ok(data) => data,
            Err(_) => return default,
        };
        match serde_json::from_slice(&data) {
            Ok(value) => value,
            Err(_) => default,
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        let final_path = self.slot_path(key);
        let tmp_path = self
            .root
            .join(format!("{}.json.tmp", sanitize_slot_name(key)));
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;

        fs::write(&tmp_path, bytes)?;
        match fs::rename(&tmp_path, &final_path) {
            Ok(()) => Ok(()),
            Err(rename_err) => {
                if final_path.exists() {
                    fs::remove_file(&final_path)?;
                    fs::rename(&tmp_path, &final_path)?;
                    Ok(())
                } else {
                    Err(rename_err)
                }
            }
        }
    }

    pub fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

fn sanitize_slot_name(raw: &str) -> String {
    let mut output = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.') {
            output.push(ch);
        } else {
            output.push('_');
        }
    }

    if output.trim_matches('_').is_empty() {
        "slot".to_string()
    } else {
        output
    }
}

#[cfg(test)]
mod tests {
    use super::{sanitize_slot_name, LocalStore};
    use serde::{Deserialize, Serialize};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    fn temp_root(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should be monotonic")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "relaydeck_store_{prefix}_{}_{}",
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn get_returns_default_when_slot_missing() {
        let store = LocalStore::at(temp_root("missing"));
        let value = store.get(
            "never-written",
            Sample {
                name: "fallback".to_string(),
                count: 7,
            },
        );
        assert_eq!(value.name, "fallback");
        assert_eq!(value.count, 7);
    }

    #[test]
    fn set_then_get_round_trips() {
        let root = temp_root("round_trip");
        let store = LocalStore::at(&root);
        let written = Sample {
            name: "acme".to_string(),
            count: 3,
        };

        store.set("sample", &written).expect("set should succeed");
        let read = store.get(
            "sample",
            Sample {
                name: String::new(),
                count: 0,
            },
        );
        assert_eq!(read, written);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn get_returns_default_when_slot_corrupt() {
        let root = temp_root("corrupt");
        let store = LocalStore::at(&root);
        fs::create_dir_all(&root).expect("temp root should create");
        fs::write(root.join("broken.json"), b"{not json at all").expect("fixture should write");

        let value = store.get(
            "broken",
            Sample {
                name: "default".to_string(),
                count: 1,
            },
        );
        assert_eq!(value.name, "default");
        assert_eq!(value.count, 1);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn set_overwrites_previous_value() {
        let root = temp_root("overwrite");
        let store = LocalStore::at(&root);

        store
            .set("counter", &vec![1u32, 2, 3])
            .expect("first set should succeed");
        store
            .set("counter", &vec![9u32])
            .expect("second set should succeed");

        let read: Vec<u32> = store.get("counter", Vec::new());
        assert_eq!(read, vec![9]);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn remove_deletes_slot_and_tolerates_absence() {
        let root = temp_root("remove");
        let store = LocalStore::at(&root);

        store.set("gone", &42u32).expect("set should succeed");
        store.remove("gone").expect("remove should succeed");
        assert_eq!(store.get("gone", 0u32), 0);

        store
            .remove("gone")
            .expect("removing an absent slot should succeed");

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn corrupt_slot_recovers_after_next_set() {
        let root = temp_root("recover");
        let store = LocalStore::at(&root);
        fs::create_dir_all(&root).expect("temp root should create");
        fs::write(root.join("state.json"), b"\x00\xff").expect("fixture should write");

        assert_eq!(store.get("state", 5u32), 5);
        store.set("state", &11u32).expect("set should succeed");
        assert_eq!(store.get("state", 5u32), 11);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn slot_names_sanitize_path_hostile_keys() {
        assert_eq!(sanitize_slot_name("tenants"), "tenants");
        assert_eq!(sanitize_slot_name("assistant-chat-3"), "assistant-chat-3");
        assert_eq!(sanitize_slot_name("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_slot_name("///"), "slot");
    }
}
