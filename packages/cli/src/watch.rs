//! Scheduled sweeps.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::app::App;

/// Sweeps every `period` and dispatches alerts until Ctrl-C.
///
/// Returns the number of sweeps that ran to completion.
pub async fn run(app: &App, period: Duration) -> usize {
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    log::info!("Running a risk sweep every {period:?}, press Ctrl-C to stop");
    run_until(app, period, shutdown).await
}

/// Sweeps every `period` until `shutdown` resolves.
///
/// `shutdown` is also raced against the sweep in progress, so a slow or
/// stalled provider cannot hold the loop open. A failed sweep is logged
/// and the loop carries on with the next tick.
pub async fn run_until(app: &App, period: Duration, shutdown: impl Future<Output = ()>) -> usize {
    tokio::pin!(shutdown);

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut completed = 0;

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            _ = interval.tick() => {
                tokio::select! {
                    () = &mut shutdown => {
                        log::info!("Abandoning the sweep in progress");
                        break;
                    }
                    () = sweep_once(app) => completed += 1,
                }
            }
        }
    }

    log::info!("Stopping scheduled sweeps after {completed} completed sweep(s)");
    completed
}

async fn sweep_once(app: &App) {
    match app.cache.purge_expired() {
        Ok(0) => {}
        Ok(purged) => log::debug!("Purged {purged} expired cache entries"),
        Err(e) => log::warn!("Failed to purge risk cache: {e}"),
    }

    match app.assessor.assess_all().await {
        Ok(sweep) => {
            app.dispatcher.dispatch(&sweep).await;
        }
        Err(e) => log::error!("Scheduled risk sweep failed: {e}"),
    }
}
