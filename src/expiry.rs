use std::time::Duration;

/// Per-call expiration policy for write operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expiry {
    /// Use the store's configured default TTL.
    Default,
    /// Never expire.
    Forever,
    /// Expire after the given duration, truncated to whole seconds on the
    /// wire.
    After(Duration),
}

impl Expiry {
    /// Resolve the policy against a store default. A zero result means
    /// "no expiration" and callers issue a plain write instead of a
    /// time-bounded one.
    pub(crate) fn resolve(self, default: Duration) -> Duration {
        match self {
            Expiry::Default => default,
            Expiry::Forever => Duration::ZERO,
            Expiry::After(ttl) => ttl,
        }
    }
}
