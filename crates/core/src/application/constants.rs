// Pipeline constants (no magic values)
use std::time::Duration;

/// CPU ceiling for the supervising process (percent)
pub const MAX_CPU_PERCENT: f32 = 75.0;

/// System-wide memory ceiling (percent)
pub const MAX_MEMORY_PERCENT: f32 = 75.0;

/// Control-loop cadence (5s)
pub const TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Producer publish cadence (1s)
pub const PUBLISH_INTERVAL: Duration = Duration::from_secs(1);

/// Topic carrying scrape work items
pub const WORK_TOPIC: &str = "scrape-requests";

/// URL the producer publishes when none is configured
pub const DEFAULT_SCRAPE_URL: &str = "https://google.com";

/// Broker address when none is configured
pub const DEFAULT_BROKER_URL: &str = "redis://127.0.0.1:6379";

/// Broker poll window for an idle subscription (5s)
pub const RECEIVE_POLL_TIMEOUT: Duration = Duration::from_secs(5);

/// Sleep after a worker-loop error before retry (1s)
pub const ERROR_RECOVERY_SLEEP_DURATION: Duration = Duration::from_secs(1);

/// Per-request fetch timeout (30s)
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
