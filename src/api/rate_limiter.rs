//! Rate limiting middleware for the REST API
//!
//! Token bucket rate limiting per endpoint category:
//! - Lookup: catalog searches, which front the (future) external pricing
//!   search service (default 20/s)
//! - Mutation: ledger changes (default 50/s)
//! - General: everything else (default 100/s)

use crate::config::RateLimitConfig;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Endpoint category for rate limiting purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointCategory {
    /// Catalog lookups
    Lookup,
    /// Ledger mutations (add, remove, quantity, markup)
    Mutation,
    /// Everything else (session management, snapshots, health)
    General,
}

/// Token bucket rate limiter
#[derive(Debug)]
pub struct TokenBucket {
    /// Maximum tokens (requests) allowed per period
    capacity: u32,
    /// Current available tokens
    tokens: f64,
    /// Tokens added per second
    refill_rate: f64,
    /// Last refill time
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a new token bucket
    pub fn new(rate_per_second: u32) -> Self {
        Self {
            capacity: rate_per_second,
            tokens: rate_per_second as f64,
            refill_rate: rate_per_second as f64,
            last_refill: Instant::now(),
        }
    }

    /// Try to consume a token, returns true if allowed
    pub fn try_acquire(&mut self) -> bool {
        // Refill tokens based on elapsed time
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill);
        let refill_amount = elapsed.as_secs_f64() * self.refill_rate;

        self.tokens = (self.tokens + refill_amount).min(self.capacity as f64);
        self.last_refill = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Get time until a token will be available
    pub fn time_until_available(&self) -> Duration {
        if self.tokens >= 1.0 {
            Duration::ZERO
        } else {
            let tokens_needed = 1.0 - self.tokens;
            Duration::from_secs_f64(tokens_needed / self.refill_rate)
        }
    }
}

/// Shared rate limiter state
#[derive(Debug)]
pub struct RateLimiterState {
    limiters: Mutex<HashMap<EndpointCategory, TokenBucket>>,
}

impl RateLimiterState {
    /// Create rate limiter state from the configured limits
    pub fn new(config: &RateLimitConfig) -> Self {
        let mut limiters = HashMap::new();
        limiters.insert(
            EndpointCategory::Lookup,
            TokenBucket::new(config.lookup_rate_limit),
        );
        limiters.insert(
            EndpointCategory::Mutation,
            TokenBucket::new(config.mutation_rate_limit),
        );
        limiters.insert(
            EndpointCategory::General,
            TokenBucket::new(config.general_rate_limit),
        );

        Self {
            limiters: Mutex::new(limiters),
        }
    }

    /// Try to acquire a token for the given category
    pub fn try_acquire(&self, category: EndpointCategory) -> bool {
        let mut limiters = self.limiters.lock();
        match limiters.get_mut(&category) {
            Some(limiter) => limiter.try_acquire(),
            // No limiter configured means no limit
            None => true,
        }
    }

    /// Get time until the category allows a request
    pub fn time_until_available(&self, category: EndpointCategory) -> Duration {
        let limiters = self.limiters.lock();
        limiters
            .get(&category)
            .map(|limiter| limiter.time_until_available())
            .unwrap_or(Duration::ZERO)
    }
}

/// Determine the endpoint category based on request path
pub fn endpoint_category(path: &str) -> EndpointCategory {
    if path.contains("/search") {
        return EndpointCategory::Lookup;
    }

    if path.contains("/bid/add")
        || path.contains("/bid/remove")
        || path.contains("/bid/quantity")
        || path.contains("/bid/markup")
        || path.contains("/bid/globalmarkup")
    {
        return EndpointCategory::Mutation;
    }

    EndpointCategory::General
}

/// Rate limiting middleware
pub async fn rate_limit_middleware(
    State(state): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let category = endpoint_category(&path);

    if !state.try_acquire(category) {
        let wait_time = state.time_until_available(category);
        tracing::warn!(
            "Rate limit exceeded for {:?}, path: {}, retry after {:?}ms",
            category,
            path,
            wait_time.as_millis()
        );
        return rate_limit_response(wait_time, &format!("{:?}", category).to_lowercase());
    }

    next.run(request).await
}

/// Create a rate limit exceeded response
fn rate_limit_response(retry_after: Duration, category: &str) -> Response {
    let retry_seconds = retry_after.as_secs_f64().ceil() as u64;

    let body = Json(json!({
        "status": "error",
        "code": "RATE_LIMIT_EXCEEDED",
        "message": format!("Rate limit exceeded for {}. Please retry after {} seconds.", category, retry_seconds),
        "retry_after_ms": retry_after.as_millis()
    }));

    let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();

    if let Ok(value) = retry_seconds.to_string().parse() {
        response.headers_mut().insert("Retry-After", value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> RateLimitConfig {
        RateLimitConfig {
            general_rate_limit: 100,
            lookup_rate_limit: 20,
            mutation_rate_limit: 50,
        }
    }

    #[test]
    fn test_token_bucket_basic() {
        let mut bucket = TokenBucket::new(10); // 10 per second

        // Should allow first 10 requests
        for _ in 0..10 {
            assert!(bucket.try_acquire());
        }

        // 11th should fail
        assert!(!bucket.try_acquire());
    }

    #[test]
    fn test_token_bucket_refill() {
        let mut bucket = TokenBucket::new(100);

        // Drain all tokens
        for _ in 0..100 {
            bucket.try_acquire();
        }
        assert!(!bucket.try_acquire());

        // Simulate time passing (force refill)
        bucket.last_refill = Instant::now() - Duration::from_millis(100);

        // Should have ~10 tokens now (100/s * 0.1s)
        for _ in 0..10 {
            assert!(bucket.try_acquire());
        }
    }

    #[test]
    fn test_endpoint_category_detection() {
        assert_eq!(
            endpoint_category("/api/v1/search"),
            EndpointCategory::Lookup
        );
        assert_eq!(
            endpoint_category("/api/v1/bid/add"),
            EndpointCategory::Mutation
        );
        assert_eq!(
            endpoint_category("/api/v1/bid/globalmarkup"),
            EndpointCategory::Mutation
        );
        assert_eq!(endpoint_category("/api/v1/bid"), EndpointCategory::General);
        assert_eq!(
            endpoint_category("/api/v1/session"),
            EndpointCategory::General
        );
        assert_eq!(endpoint_category("/health"), EndpointCategory::General);
    }

    #[test]
    fn test_categories_are_independent() {
        let state = RateLimiterState::new(&RateLimitConfig {
            general_rate_limit: 100,
            lookup_rate_limit: 1,
            mutation_rate_limit: 50,
        });

        assert!(state.try_acquire(EndpointCategory::Lookup));
        assert!(!state.try_acquire(EndpointCategory::Lookup));

        // Exhausting the lookup bucket leaves the others untouched
        assert!(state.try_acquire(EndpointCategory::Mutation));
        assert!(state.try_acquire(EndpointCategory::General));
    }

    #[test]
    fn test_state_from_config() {
        let state = RateLimiterState::new(&test_config());
        for _ in 0..20 {
            assert!(state.try_acquire(EndpointCategory::Lookup));
        }
        assert!(!state.try_acquire(EndpointCategory::Lookup));
    }
}
