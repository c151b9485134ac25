use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cron::Schedule;
use tokio::sync::mpsc;
use tracing::debug;

/// Source of refresh triggers.
#[async_trait]
pub trait Trigger: Send {
    /// Wait for the next fire. Returns `false` once the trigger is exhausted.
    async fn next(&mut self) -> bool;
}

/// Fires on a cron schedule.
///
/// The next fire time is computed from the current time on every call, so
/// ticks that pass while a cycle is still running are dropped, not queued.
pub struct CronTrigger {
    schedule: Schedule,
}

impl CronTrigger {
    pub fn parse(expression: &str) -> Result<Self> {
        let schedule = Schedule::from_str(expression)
            .with_context(|| format!("invalid cron expression '{}'", expression))?;
        Ok(Self { schedule })
    }

    /// Time left until the first fire strictly after `now`.
    pub fn delay_after(&self, now: DateTime<Utc>) -> Option<Duration> {
        let next = self.schedule.after(&now).next()?;
        Some((next - now).to_std().unwrap_or_default())
    }
}

#[async_trait]
impl Trigger for CronTrigger {
    async fn next(&mut self) -> bool {
        match self.delay_after(Utc::now()) {
            Some(delay) => {
                debug!("Next refresh in {:?}", delay);
                tokio::time::sleep(delay).await;
                true
            }
            None => false,
        }
    }
}

/// Fires whenever a message arrives on its channel; ends when every sender
/// is dropped.
pub struct ManualTrigger {
    rx: mpsc::Receiver<()>,
}

pub fn manual_trigger(buffer: usize) -> (mpsc::Sender<()>, ManualTrigger) {
    let (tx, rx) = mpsc::channel(buffer);
    (tx, ManualTrigger { rx })
}

#[async_trait]
impl Trigger for ManualTrigger {
    async fn next(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }
}

/// Fires once immediately, then defers to the wrapped trigger.
pub struct StartupTrigger<T: Trigger> {
    fired: bool,
    inner: T,
}

impl<T: Trigger> StartupTrigger<T> {
    pub fn new(inner: T) -> Self {
        Self { fired: false, inner }
    }
}

#[async_trait]
impl<T: Trigger> Trigger for StartupTrigger<T> {
    async fn next(&mut self) -> bool {
        if !self.fired {
            self.fired = true;
            return true;
        }
        self.inner.next().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn cron_delay_points_at_next_slot() {
        let trigger = CronTrigger::parse("0 */5 * * * *").unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 10, 2, 30).unwrap();
        assert_eq!(trigger.delay_after(now), Some(Duration::from_secs(150)));
    }

    #[test]
    fn exact_slot_waits_for_the_following_one() {
        let trigger = CronTrigger::parse("0 */5 * * * *").unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 10, 5, 0).unwrap();
        assert_eq!(trigger.delay_after(now), Some(Duration::from_secs(300)));
    }

    #[test]
    fn invalid_expression_is_rejected() {
        assert!(CronTrigger::parse("every five minutes").is_err());
    }

    #[tokio::test]
    async fn manual_trigger_ends_with_its_senders() {
        let (tx, mut trigger) = manual_trigger(4);
        tx.send(()).await.unwrap();
        drop(tx);
        assert!(trigger.next().await);
        assert!(!trigger.next().await);
    }

    #[tokio::test]
    async fn startup_trigger_fires_first() {
        let (tx, inner) = manual_trigger(1);
        drop(tx);
        let mut trigger = StartupTrigger::new(inner);
        assert!(trigger.next().await);
        assert!(!trigger.next().await);
    }
}
