//! Example timeout interceptor. Actual timeout *enforcement* is the
//! transport's job (§1 non-goals); this interceptor only fills in
//! per-request timeouts that the caller left unset, demonstrating the
//! request-track mutation pattern.

use std::time::Duration;

use async_trait::async_trait;

use crate::interceptors::handler::RequestHandler;
use crate::interceptors::interceptor::Interceptor;
use crate::types::RequestOptions;

pub struct TimeoutInterceptor {
    default_timeout: Duration,
}

impl TimeoutInterceptor {
    pub fn new(default_timeout: Duration) -> Self {
        Self { default_timeout }
    }
}

impl Default for TimeoutInterceptor {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl Interceptor for TimeoutInterceptor {
    async fn on_request(&self, mut options: RequestOptions, handler: RequestHandler) {
        options.connect_timeout.get_or_insert(self.default_timeout);
        options.send_timeout.get_or_insert(self.default_timeout);
        options.receive_timeout.get_or_insert(self.default_timeout);
        handler.next(options);
    }

    fn name(&self) -> &str {
        "timeout"
    }
}
