//! Transient alerts
//!
//! Every alert is shown for [`DISPLAY_WINDOW`], then marked as removing for
//! [`EXIT_WINDOW`] before it is dropped. Alerts expire independently of each
//! other; the event loop drives them by calling [`AlertQueue::expire`].

use std::time::{Duration, Instant};

use super::types::AlertKind;

pub const DISPLAY_WINDOW: Duration = Duration::from_secs(5);
pub const EXIT_WINDOW: Duration = Duration::from_millis(300);

#[derive(Clone, Debug)]
pub struct Alert {
    pub message: String,
    pub kind: AlertKind,
    pub removing: bool,
    shown_at: Instant,
}

#[derive(Clone, Debug, Default)]
pub struct AlertQueue {
    alerts: Vec<Alert>,
}

impl AlertQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>, kind: AlertKind, now: Instant) {
        let message = message.into();
        match kind {
            AlertKind::Error => tracing::warn!(%message, "Alert shown"),
            _ => tracing::debug!(%message, ?kind, "Alert shown"),
        }
        self.alerts.push(Alert {
            message,
            kind,
            removing: false,
            shown_at: now,
        });
    }

    /// Advance alert timers to `now`.
    pub fn expire(&mut self, now: Instant) {
        for alert in self.alerts.iter_mut() {
            if !alert.removing && now.saturating_duration_since(alert.shown_at) >= DISPLAY_WINDOW {
                alert.removing = true;
            }
        }
        self.alerts
            .retain(|a| now.saturating_duration_since(a.shown_at) < DISPLAY_WINDOW + EXIT_WINDOW);
    }

    pub fn dismiss_all(&mut self) {
        self.alerts.clear();
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<&Alert> {
        self.alerts.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_goes_through_removing_before_detach() {
        let t0 = Instant::now();
        let mut queue = AlertQueue::new();
        queue.push("Found 3 songs!", AlertKind::Success, t0);

        queue.expire(t0 + Duration::from_millis(4999));
        assert!(!queue.alerts()[0].removing);

        queue.expire(t0 + DISPLAY_WINDOW);
        assert!(queue.alerts()[0].removing);

        queue.expire(t0 + DISPLAY_WINDOW + Duration::from_millis(299));
        assert_eq!(queue.alerts().len(), 1);

        queue.expire(t0 + DISPLAY_WINDOW + EXIT_WINDOW);
        assert!(queue.is_empty());
    }

    #[test]
    fn alerts_stack_and_expire_independently() {
        let t0 = Instant::now();
        let mut queue = AlertQueue::new();
        queue.push("one", AlertKind::Info, t0);
        queue.push("two", AlertKind::Error, t0 + Duration::from_secs(2));

        queue.expire(t0 + Duration::from_millis(5400));
        assert_eq!(queue.alerts().len(), 1);
        assert_eq!(queue.alerts()[0].message, "two");
        assert!(!queue.alerts()[0].removing);

        queue.expire(t0 + Duration::from_millis(7400));
        assert!(queue.is_empty());
    }

    #[test]
    fn dismiss_clears_everything() {
        let t0 = Instant::now();
        let mut queue = AlertQueue::new();
        queue.push("a", AlertKind::Info, t0);
        queue.push("b", AlertKind::Info, t0);
        queue.dismiss_all();
        queue.expire(t0 + DISPLAY_WINDOW);
        assert!(queue.is_empty());
    }
}
