//! Daily inbox reminder.

use crate::bot::Router;
use crate::error::Result;
use crate::telegram::Messenger;
use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// The first moment strictly after `now` whose wall-clock time at `offset`
/// equals `at`.
pub fn next_fire_after(now: DateTime<Utc>, at: NaiveTime, offset: FixedOffset) -> DateTime<Utc> {
    let local_date = now.with_timezone(&offset).date_naive();
    let local_target = local_date.and_time(at);
    let utc_target = local_target - Duration::seconds(i64::from(offset.local_minus_utc()));
    let candidate = DateTime::<Utc>::from_naive_utc_and_offset(utc_target, Utc);

    if candidate > now {
        candidate
    } else {
        candidate + Duration::days(1)
    }
}

pub struct Reminder {
    router: Arc<Router>,
    messenger: Arc<dyn Messenger>,
    at: NaiveTime,
    offset: FixedOffset,
}

impl Reminder {
    pub fn new(
        router: Arc<Router>,
        messenger: Arc<dyn Messenger>,
        at: NaiveTime,
        offset: FixedOffset,
    ) -> Self {
        Self {
            router,
            messenger,
            at,
            offset,
        }
    }

    /// Send the reminder to the allow-listed user once.
    pub async fn fire(&self) -> Result<()> {
        let text = self.router.reminder();
        self.messenger
            .send_message(self.router.user_id(), &text)
            .await
    }

    /// Fire every day at the configured time until cancelled.
    pub async fn run(self, cancel: CancellationToken) {
        loop {
            let now = Utc::now();
            let next = next_fire_after(now, self.at, self.offset);
            let wait = (next - now).to_std().unwrap_or_default();
            tracing::info!(next = %next.with_timezone(&self.offset), "Next inbox reminder scheduled");

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(wait) => {}
            }

            match self.fire().await {
                Ok(()) => tracing::info!("Notification sent successfully"),
                Err(e) => tracing::error!(error = %e, "Error notifying user"),
            }
        }

        tracing::info!("Reminder scheduler stopped");
    }
}
