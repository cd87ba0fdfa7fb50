//! Exchange rate source abstraction

use super::error::RateResult;
use super::rate::RateSnapshot;
use async_trait::async_trait;

/// Fetches one exchange-rate document per call, without caching.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_snapshot(&self) -> RateResult<RateSnapshot>;
}
