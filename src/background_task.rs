use actix_web::web;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::AppState;

/// Periodically drops expired rate-limit windows so idle clients do not
/// accumulate between threshold sweeps.
pub async fn start_sweep_task(state: web::Data<AppState>, every: Duration) {
    let mut interval = interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let removed = state.rate_limiter.sweep_expired();
        if removed > 0 {
            tracing::info!(
                removed,
                remaining = state.rate_limiter.tracked_clients(),
                "Swept expired rate-limit records"
            );
        }
    }
}
