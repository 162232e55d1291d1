//! Time-bounded Slack identity cache.
//!
//! Maps user IDs to display names. Entries live for [`IDENTITY_TTL`]; an
//! expired entry is treated exactly like a missing one. Failed lookups are
//! never cached so the next event retries.

use dashmap::DashMap;
use regex::Regex;
use std::ops::Range;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::time::Instant;
use tracing::warn;

use super::api::ProfileLookup;
use crate::metrics;

/// How long a resolved name stays valid.
pub const IDENTITY_TTL: Duration = Duration::from_secs(60 * 60);

/// `<@U123>` or `<@U123|label>`
static MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<@([A-Za-z0-9]+)(?:\|[^>]*)?>").expect("mention pattern is valid")
});

#[derive(Debug, Clone)]
struct CacheEntry {
    name: String,
    expires_at: Instant,
}

/// Shared identity cache.
///
/// Reads on different users never contend; the `DashMap` shard lock is
/// held only for the map access itself, never across a lookup.
pub struct IdentityCache {
    lookup: Arc<dyn ProfileLookup>,
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl IdentityCache {
    pub fn new(lookup: Arc<dyn ProfileLookup>) -> Self {
        Self::with_ttl(lookup, IDENTITY_TTL)
    }

    pub fn with_ttl(lookup: Arc<dyn ProfileLookup>, ttl: Duration) -> Self {
        Self {
            lookup,
            entries: DashMap::new(),
            ttl,
        }
    }

    fn cached(&self, user_id: &str) -> Option<String> {
        let entry = self.entries.get(user_id)?;
        (Instant::now() < entry.expires_at).then(|| entry.name.clone())
    }

    /// Resolve a user ID to a display name.
    ///
    /// Falls back to the raw ID when the lookup fails or the profile has no
    /// usable name.
    pub async fn resolve(&self, user_id: &str) -> String {
        if let Some(name) = self.cached(user_id) {
            metrics::record_identity_lookup("hit");
            return name;
        }

        match self.lookup.lookup(user_id).await {
            Ok(profile) => {
                metrics::record_identity_lookup("miss");
                let name = profile.best_name().unwrap_or(user_id).to_string();
                self.entries.insert(
                    user_id.to_string(),
                    CacheEntry {
                        name: name.clone(),
                        expires_at: Instant::now() + self.ttl,
                    },
                );
                name
            }
            Err(e) => {
                metrics::record_identity_lookup("failure");
                warn!(user = %user_id, error = %e, "Slack user lookup failed");
                user_id.to_string()
            }
        }
    }

    /// Replace every `<@ID>` mention with `@displayName`.
    ///
    /// Text without mentions comes back unchanged, as does anything that only
    /// looks like a mention (`<@>`, a missing `>`).
    pub async fn translate_mentions(&self, text: &str) -> String {
        // Collected up front: the regex iterator must not live across an await.
        let mentions: Vec<(Range<usize>, &str)> = MENTION
            .captures_iter(text)
            .filter_map(|caps| Some((caps.get(0)?.range(), caps.get(1)?.as_str())))
            .collect();

        if mentions.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for (range, user_id) in mentions {
            out.push_str(&text[last..range.start]);
            out.push('@');
            out.push_str(&self.resolve(user_id).await);
            last = range.end;
        }
        out.push_str(&text[last..]);
        out
    }

    /// Drop expired entries. Returns how many were removed.
    pub fn prune_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SlackError, SlackResult};
    use crate::slack::api::UserProfile;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Lookup collaborator that counts calls.
    #[derive(Default)]
    struct CountingLookup {
        profiles: HashMap<String, UserProfile>,
        calls: AtomicUsize,
    }

    impl CountingLookup {
        fn with(users: &[(&str, &str, &str)]) -> Arc<Self> {
            let profiles = users
                .iter()
                .map(|(id, display, real)| {
                    (
                        id.to_string(),
                        UserProfile {
                            display_name: display.to_string(),
                            real_name: real.to_string(),
                        },
                    )
                })
                .collect();
            Arc::new(Self {
                profiles,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProfileLookup for CountingLookup {
        async fn lookup(&self, user_id: &str) -> SlackResult<UserProfile> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.profiles
                .get(user_id)
                .cloned()
                .ok_or_else(|| SlackError::Api("user_not_found".to_string()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_resolve_within_ttl_is_cached() {
        let lookup = CountingLookup::with(&[("U123", "alice", "")]);
        let cache = IdentityCache::new(lookup.clone());

        assert_eq!(cache.resolve("U123").await, "alice");
        tokio::time::advance(Duration::from_secs(59 * 60)).await;
        assert_eq!(cache.resolve("U123").await, "alice");

        assert_eq!(lookup.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_triggers_exactly_one_lookup() {
        let lookup = CountingLookup::with(&[("U123", "alice", "")]);
        let cache = IdentityCache::new(lookup.clone());

        cache.resolve("U123").await;
        tokio::time::advance(IDENTITY_TTL + Duration::from_secs(1)).await;

        cache.resolve("U123").await;
        cache.resolve("U123").await;
        assert_eq!(lookup.calls(), 2);
    }

    #[tokio::test]
    async fn test_real_name_and_raw_id_fallbacks() {
        let lookup = CountingLookup::with(&[("U1", "", "Real Person"), ("U2", "", "")]);
        let cache = IdentityCache::new(lookup);

        assert_eq!(cache.resolve("U1").await, "Real Person");
        assert_eq!(cache.resolve("U2").await, "U2");
    }

    #[tokio::test]
    async fn test_failed_lookup_not_cached() {
        let lookup = CountingLookup::with(&[]);
        let cache = IdentityCache::new(lookup.clone());

        assert_eq!(cache.resolve("UGONE").await, "UGONE");
        assert_eq!(cache.resolve("UGONE").await, "UGONE");

        assert_eq!(lookup.calls(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_translate_two_mentions() {
        let lookup = CountingLookup::with(&[("U123", "alice", ""), ("U456", "bob", "")]);
        let cache = IdentityCache::new(lookup);

        assert_eq!(
            cache.translate_mentions("hi <@U123> and <@U456>").await,
            "hi @alice and @bob"
        );
    }

    #[tokio::test]
    async fn test_translate_labelled_mention() {
        let lookup = CountingLookup::with(&[("U123", "alice", "")]);
        let cache = IdentityCache::new(lookup);

        assert_eq!(
            cache.translate_mentions("ping <@U123|alice.old>!").await,
            "ping @alice!"
        );
    }

    #[tokio::test]
    async fn test_translate_leaves_malformed_untouched() {
        let lookup = CountingLookup::with(&[("U123", "alice", "")]);
        let cache = IdentityCache::new(lookup.clone());

        assert_eq!(cache.translate_mentions("no mentions here").await, "no mentions here");
        assert_eq!(cache.translate_mentions("empty <@> mention").await, "empty <@> mention");
        assert_eq!(cache.translate_mentions("open <@U123 never closed").await, "open <@U123 never closed");
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_repeated_mention_resolves_once() {
        let lookup = CountingLookup::with(&[("U123", "alice", "")]);
        let cache = IdentityCache::new(lookup.clone());

        assert_eq!(
            cache.translate_mentions("<@U123> <@U123>").await,
            "@alice @alice"
        );
        assert_eq!(lookup.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_prune_expired() {
        let lookup = CountingLookup::with(&[("U1", "one", ""), ("U2", "two", "")]);
        let cache = IdentityCache::new(lookup);

        cache.resolve("U1").await;
        tokio::time::advance(Duration::from_secs(30 * 60)).await;
        cache.resolve("U2").await;
        tokio::time::advance(Duration::from_secs(31 * 60)).await;

        assert_eq!(cache.prune_expired(), 1);
        assert_eq!(cache.len(), 1);
    }
}
