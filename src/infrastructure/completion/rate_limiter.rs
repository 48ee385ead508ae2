//! Token bucket rate limiter for completion API requests.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio::time::sleep;

/// Token bucket rate limiter.
///
/// Tokens refill continuously based on elapsed time; `acquire` waits until at
/// least one token is available, then consumes it. Capacity equals the refill
/// rate, giving one second of burst tolerance.
#[derive(Clone)]
pub struct TokenBucketRateLimiter {
    tokens: Arc<Mutex<f64>>,
    capacity: f64,
    refill_rate: f64,
    last_refill: Arc<Mutex<Instant>>,
}

impl TokenBucketRateLimiter {
    /// Create a limiter allowing `requests_per_second` sustained requests.
    pub fn new(requests_per_second: f64) -> Self {
        let rate = requests_per_second.max(f64::MIN_POSITIVE);
        Self {
            tokens: Arc::new(Mutex::new(rate)),
            capacity: rate,
            refill_rate: rate,
            last_refill: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Wait until a token is available, then consume it.
    pub async fn acquire(&self) {
        loop {
            {
                let mut tokens = self.tokens.lock().await;
                let mut last_refill = self.last_refill.lock().await;

                let elapsed = last_refill.elapsed().as_secs_f64();
                *tokens = (*tokens + elapsed * self.refill_rate).min(self.capacity);
                *last_refill = Instant::now();

                if *tokens >= 1.0 {
                    *tokens -= 1.0;
                    return;
                }
            }

            // Not enough tokens; wait roughly long enough for one to refill.
            let wait_secs = (1.0 / self.refill_rate).min(0.25);
            sleep(Duration::from_secs_f64(wait_secs)).await;
        }
    }
}
