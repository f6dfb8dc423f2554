//! Fixed-window request counting per client address.
//!
//! Best-effort spam mitigation: state is per-process and lost on restart.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

pub const DEFAULT_MAX_REQUESTS: u32 = 20;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// `reset_after` is the time left until the address's window resets.
    Allowed { remaining: u32, reset_after: Duration },
    Limited { retry_after: Duration },
}

pub struct RateLimiter {
    windows: Mutex<HashMap<IpAddr, Window>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn check(&self, ip: IpAddr) -> RateDecision {
        self.check_at(ip, Instant::now())
    }

    /// Count one request from `ip` at `now`. A window opens on the first
    /// request from an address and resets once `window` has elapsed.
    pub fn check_at(&self, ip: IpAddr, now: Instant) -> RateDecision {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = windows.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });

        let elapsed = now.saturating_duration_since(entry.started);
        if elapsed >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        let reset_after = self.window.saturating_sub(now.saturating_duration_since(entry.started));
        if entry.count >= self.max_requests {
            return RateDecision::Limited {
                retry_after: reset_after,
            };
        }

        entry.count += 1;
        RateDecision::Allowed {
            remaining: self.max_requests - entry.count,
            reset_after,
        }
    }

    /// Forget addresses whose window has run out. Returns how many were dropped.
    pub fn prune(&self, now: Instant) -> usize {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        let before = windows.len();
        windows.retain(|_, w| now.saturating_duration_since(w.started) < self.window);
        before - windows.len()
    }

    pub fn tracked(&self) -> usize {
        self.windows.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}

/// Background task that drops expired windows once per window length.
pub async fn run_prune_loop(limiter: Arc<RateLimiter>) {
    // interval() panics on a zero period
    let period = limiter.window().max(Duration::from_secs(1));
    let mut interval = tokio::time::interval(period);

    loop {
        interval.tick().await;

        let pruned = limiter.prune(Instant::now());
        if pruned > 0 {
            debug!("Rate limiter: pruned {} expired windows", pruned);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const A: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
    const B: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

    #[test]
    fn twenty_first_request_is_limited() {
        let limiter = RateLimiter::default();
        let t0 = Instant::now();

        for i in 0..20 {
            let decision = limiter.check_at(A, t0 + Duration::from_secs(i));
            assert_eq!(
                decision,
                RateDecision::Allowed {
                    remaining: 19 - i as u32,
                    reset_after: Duration::from_secs(60 - i),
                }
            );
        }

        match limiter.check_at(A, t0 + Duration::from_secs(20)) {
            RateDecision::Limited { retry_after } => {
                assert_eq!(retry_after, Duration::from_secs(40));
            }
            other => panic!("expected limit, got {:?}", other),
        }
    }

    #[test]
    fn addresses_are_counted_separately() {
        let limiter = RateLimiter::new(1, DEFAULT_WINDOW);
        let t0 = Instant::now();

        assert!(matches!(limiter.check_at(A, t0), RateDecision::Allowed { .. }));
        assert!(matches!(limiter.check_at(A, t0), RateDecision::Limited { .. }));
        assert!(matches!(limiter.check_at(B, t0), RateDecision::Allowed { .. }));
    }

    #[test]
    fn window_resets_after_it_elapses() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let t0 = Instant::now();

        limiter.check_at(A, t0);
        limiter.check_at(A, t0 + Duration::from_secs(1));
        assert!(matches!(
            limiter.check_at(A, t0 + Duration::from_secs(59)),
            RateDecision::Limited { .. }
        ));
        assert_eq!(
            limiter.check_at(A, t0 + Duration::from_secs(60)),
            RateDecision::Allowed {
                remaining: 1,
                reset_after: Duration::from_secs(60),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn prune_loop_survives_zero_window() {
        let limiter = Arc::new(RateLimiter::new(1, Duration::ZERO));
        let task = tokio::spawn(run_prune_loop(limiter));

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(!task.is_finished());
        task.abort();
    }

    #[test]
    fn prune_drops_only_expired_windows() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        let t0 = Instant::now();

        limiter.check_at(A, t0);
        limiter.check_at(B, t0 + Duration::from_secs(30));
        assert_eq!(limiter.tracked(), 2);

        assert_eq!(limiter.prune(t0 + Duration::from_secs(61)), 1);
        assert_eq!(limiter.tracked(), 1);
    }
}
