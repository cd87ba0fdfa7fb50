//! Colones, dollar and euro conversions backed by a cached rate snapshot.

use crate::core::cancel::run_cancellable;
use crate::core::{
    CancelSignal, Clock, Conversion, DollarRate, EuroRate, RateError, RateResult, RateSnapshot,
    RateSource, SnapshotCache, SystemClock,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

pub struct ExchangeRateConverter<S: RateSource> {
    source: S,
    cache: SnapshotCache,
}

impl<S: RateSource> ExchangeRateConverter<S> {
    /// Creates a converter that keeps each snapshot for `cache_duration`.
    /// `Duration::ZERO` fetches on every call.
    pub fn new(source: S, cache_duration: Duration) -> Self {
        Self::with_clock(source, cache_duration, Arc::new(SystemClock))
    }

    pub fn with_clock(source: S, cache_duration: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            cache: SnapshotCache::with_clock(cache_duration, clock),
        }
    }

    /// Returns the cached snapshot or fetches a fresh one.
    ///
    /// Cache hits are returned even when `cancel` has already fired. Concurrent
    /// misses each fetch on their own and the last one stored wins.
    pub async fn snapshot(&self, cancel: Option<&CancelSignal>) -> RateResult<Arc<RateSnapshot>> {
        if let Some(cached) = self.cache.get().await {
            return Ok(cached);
        }

        debug!("Fetching exchange rate snapshot");
        let snapshot = Arc::new(run_cancellable(cancel, self.source.fetch_snapshot()).await?);
        self.cache.put(Arc::clone(&snapshot)).await;
        Ok(snapshot)
    }

    #[instrument(skip(self, cancel))]
    pub async fn convert(
        &self,
        amount: Decimal,
        conversion: Conversion,
        cancel: Option<&CancelSignal>,
    ) -> RateResult<Decimal> {
        let snapshot = self.snapshot(cancel).await?;
        apply(amount, conversion, &snapshot)
    }

    pub async fn dollars_to_colones(
        &self,
        amount: Decimal,
        cancel: Option<&CancelSignal>,
    ) -> RateResult<Decimal> {
        self.convert(amount, Conversion::DollarsToColones, cancel)
            .await
    }

    pub async fn colones_to_dollars(
        &self,
        amount: Decimal,
        cancel: Option<&CancelSignal>,
    ) -> RateResult<Decimal> {
        self.convert(amount, Conversion::ColonesToDollars, cancel)
            .await
    }

    pub async fn dollars_to_euros(
        &self,
        amount: Decimal,
        cancel: Option<&CancelSignal>,
    ) -> RateResult<Decimal> {
        self.convert(amount, Conversion::DollarsToEuros, cancel).await
    }

    pub async fn euros_to_dollars(
        &self,
        amount: Decimal,
        cancel: Option<&CancelSignal>,
    ) -> RateResult<Decimal> {
        self.convert(amount, Conversion::EurosToDollars, cancel).await
    }

    /// Uses the published colones-per-euro rate, or the cross rate through
    /// the dollar purchase rate when it is unpublished or zero.
    pub async fn colones_to_euros(
        &self,
        amount: Decimal,
        cancel: Option<&CancelSignal>,
    ) -> RateResult<Decimal> {
        self.convert(amount, Conversion::ColonesToEuros, cancel).await
    }

    /// Uses the published colones-per-euro rate, or the cross rate through
    /// the dollar sale rate when it is unpublished.
    pub async fn euros_to_colones(
        &self,
        amount: Decimal,
        cancel: Option<&CancelSignal>,
    ) -> RateResult<Decimal> {
        self.convert(amount, Conversion::EurosToColones, cancel).await
    }

    pub async fn dollar_rate(&self, cancel: Option<&CancelSignal>) -> RateResult<DollarRate> {
        Ok(self.snapshot(cancel).await?.dollar_rate())
    }

    /// `colones` is `None` while the publisher is outside business hours.
    pub async fn euro_rate(&self, cancel: Option<&CancelSignal>) -> RateResult<EuroRate> {
        Ok(self.snapshot(cancel).await?.euro_rate())
    }
}

/// Converts `amount` with the rate `conversion` derives from `snapshot`.
pub fn apply(amount: Decimal, conversion: Conversion, snapshot: &RateSnapshot) -> RateResult<Decimal> {
    amount
        .checked_mul(conversion.rate(snapshot))
        .ok_or(RateError::Overflow { amount })
}
