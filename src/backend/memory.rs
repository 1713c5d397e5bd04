use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::Backend;

struct Entry {
    payload: Vec<u8>,
    deadline: Option<Instant>,
}

impl Entry {
    fn expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= Instant::now())
    }
}

/// Process-local adapter with lazy TTL expiration.
///
/// Mirrors the Redis command semantics closely enough to stand in for it in
/// tests, including the error replies for DECRBY on a non-integer value and
/// SETEX with a zero TTL. Entries expire on access, not on a timer.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.expired() => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.payload.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, payload: &[u8]) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.to_string(),
            Entry {
                payload: payload.to_vec(),
                deadline: None,
            },
        );
        Ok(())
    }

    async fn set_ex(&self, key: &str, seconds: u64, payload: &[u8]) -> Result<()> {
        if seconds == 0 {
            return Err(Error::Store(
                "invalid expire time in 'setex' command".to_string(),
            ));
        }
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.to_string(),
            Entry {
                payload: payload.to_vec(),
                deadline: Some(Instant::now() + Duration::from_secs(seconds)),
            },
        );
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.expired() => {
                entries.remove(key);
                Ok(false)
            }
            Some(_) => Ok(true),
            None => Ok(false),
        }
    }

    async fn expire(&self, key: &str, seconds: i64) -> Result<bool> {
        let mut entries = self.entries.lock().unwrap();
        let live = match entries.get(key) {
            Some(entry) => !entry.expired(),
            None => false,
        };
        if !live {
            entries.remove(key);
            return Ok(false);
        }
        if seconds <= 0 {
            // Redis deletes the key outright for non-positive TTLs.
            entries.remove(key);
            return Ok(true);
        }
        if let Some(entry) = entries.get_mut(key) {
            entry.deadline = Some(Instant::now() + Duration::from_secs(seconds as u64));
        }
        Ok(true)
    }

    async fn del(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
        Ok(())
    }

    async fn decr_by(&self, key: &str, delta: i64) -> Result<i64> {
        let mut entries = self.entries.lock().unwrap();
        let (current, deadline) = match entries.get(key) {
            Some(entry) if !entry.expired() => {
                let text = std::str::from_utf8(&entry.payload).ok();
                let parsed = text.and_then(|text| text.parse::<i64>().ok());
                match parsed {
                    Some(value) => (value, entry.deadline),
                    None => {
                        return Err(Error::Store(
                            "value is not an integer or out of range".to_string(),
                        ));
                    }
                }
            }
            // Absent or expired keys start from zero, as DECRBY does.
            _ => (0, None),
        };
        let value = current.wrapping_sub(delta);
        entries.insert(
            key.to_string(),
            Entry {
                payload: value.to_string().into_bytes(),
                deadline,
            },
        );
        Ok(value)
    }

    async fn flush_db(&self) -> Result<()> {
        self.entries.lock().unwrap().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_returns_what_set_wrote() {
        let backend = MemoryBackend::new();

        backend.set("k", b"payload").await.unwrap();

        let raw = backend.get("k").await.unwrap();
        assert_eq!(raw.as_deref(), Some(b"payload".as_slice()));
    }

    #[tokio::test]
    async fn test_get_missing_key_is_nil() {
        let backend = MemoryBackend::new();
        assert!(backend.get("absent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_ex_rejects_zero_seconds() {
        let backend = MemoryBackend::new();
        let result = backend.set_ex("k", 0, b"v").await;
        assert!(matches!(result, Err(Error::Store(_))));
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_absent() {
        let backend = MemoryBackend::new();
        backend.set_ex("k", 1, b"v").await.unwrap();
        // Force the deadline into the past instead of sleeping.
        backend
            .entries
            .lock()
            .unwrap()
            .get_mut("k")
            .unwrap()
            .deadline = Some(Instant::now() - Duration::from_secs(1));

        assert!(!backend.exists("k").await.unwrap());
        assert!(backend.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_decr_by_on_missing_key_starts_from_zero() {
        let backend = MemoryBackend::new();
        let value = backend.decr_by("counter", 4).await.unwrap();
        assert_eq!(value, -4);
    }

    #[tokio::test]
    async fn test_decr_by_rejects_non_integer_payload() {
        let backend = MemoryBackend::new();
        backend.set("k", b"\"text\"").await.unwrap();

        let result = backend.decr_by("k", 1).await;
        assert!(matches!(result, Err(Error::Store(_))));
    }

    #[tokio::test]
    async fn test_expire_confirms_only_for_live_keys() {
        let backend = MemoryBackend::new();
        backend.set("k", b"v").await.unwrap();

        assert!(backend.expire("k", 60).await.unwrap());
        assert!(!backend.expire("absent", 60).await.unwrap());
    }

    #[tokio::test]
    async fn test_flush_db_clears_everything() {
        let backend = MemoryBackend::new();
        backend.set("a", b"1").await.unwrap();
        backend.set("b", b"2").await.unwrap();

        backend.flush_db().await.unwrap();

        assert!(!backend.exists("a").await.unwrap());
        assert!(!backend.exists("b").await.unwrap());
    }
}
