// src/health/check.rs

use crate::error::CheckError;
use crate::health::CheckResult;
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Anything that can report its own health.
#[async_trait]
pub trait HealthIndicator: Send + Sync {
    async fn check(&self) -> Result<CheckResult, CheckError>;
}

struct FnIndicator<F>(F);

#[async_trait]
impl<F, Fut, E> HealthIndicator for FnIndicator<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<CheckResult, E>> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    async fn check(&self) -> Result<CheckResult, CheckError> {
        (self.0)().await.map_err(|e| CheckError::failed(e.to_string()))
    }
}

/// A registered check: the name it is reported under plus the indicator.
///
/// The name is fixed at registration. Unnamed checks are reported as
/// `check_<index>` by the aggregator.
#[derive(Clone)]
pub struct HealthCheck {
    name: Option<String>,
    indicator: Arc<dyn HealthIndicator>,
}

impl HealthCheck {
    pub fn new(name: impl Into<String>, indicator: impl HealthIndicator + 'static) -> Self {
        Self {
            name: Some(name.into()),
            indicator: Arc::new(indicator),
        }
    }

    pub fn unnamed(indicator: impl HealthIndicator + 'static) -> Self {
        Self {
            name: None,
            indicator: Arc::new(indicator),
        }
    }

    /// Wraps an async closure.
    ///
    /// ```
    /// use fastuator::health::{CheckResult, HealthCheck};
    ///
    /// let redis = HealthCheck::from_fn("redis_health", || async {
    ///     Ok::<_, std::io::Error>(CheckResult::up().with_detail("redis", "connected"))
    /// });
    /// assert_eq!(redis.name(), Some("redis_health"));
    /// ```
    pub fn from_fn<F, Fut, E>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CheckResult, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        Self::new(name, FnIndicator(f))
    }

    pub fn unnamed_fn<F, Fut, E>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CheckResult, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        Self::unnamed(FnIndicator(f))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn indicator(&self) -> Arc<dyn HealthIndicator> {
        Arc::clone(&self.indicator)
    }
}

impl fmt::Debug for HealthCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthCheck")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
