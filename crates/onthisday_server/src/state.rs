use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use onthisday_archive::ArchiveStore;
use onthisday_archive::config::{AdminAccount, Config};

use crate::auth::TokenService;

/// Source of "now" for date defaults. Swapped for a fixed instant in tests.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ArchiveStore>,
    pub clock: Clock,
    pub tokens: Arc<TokenService>,
    pub admin: Arc<AdminAccount>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(store: Arc<dyn ArchiveStore>, config: &Config) -> Self {
        Self {
            store,
            clock: system_clock(),
            tokens: Arc::new(TokenService::new(&config.jwt)),
            admin: Arc::new(config.admin.clone()),
            metrics: None,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}
