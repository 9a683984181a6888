use governor::{DefaultKeyedRateLimiter, Quota};
use std::num::NonZeroU32;
use tracing::debug;

/// Per-domain token-bucket limiter for outbound requests.
///
/// Replaces the fixed inter-request sleep of naive scrapers: callers await
/// a permit for the target domain and proceed as soon as the bucket allows,
/// keeping pacing out of the extraction logic entirely.
pub struct DomainRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    requests_per_minute: u32,
}

impl DomainRateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: DefaultKeyedRateLimiter::keyed(Quota::per_minute(per_minute)),
            requests_per_minute: per_minute.get(),
        }
    }

    /// Wait until a request to the domain is allowed.
    pub async fn acquire(&self, domain: &str) {
        let key = domain.to_string();
        if self.limiter.check_key(&key).is_err() {
            debug!(domain, "rate limited, waiting for permit");
        }
        self.limiter.until_key_ready(&key).await;
    }

    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }
}
