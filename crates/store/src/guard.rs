//! Dedupe guard: decides whether a visitor should see a survey again.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::visitor::VisitorStore;

/// Gate on the per-survey expiration record. A missing, unparseable, or
/// expired record counts as "forgotten": it is cleared and the survey may be
/// shown, which also self-heals a corrupted entry.
#[derive(Clone)]
pub struct DedupeGuard {
    store: Arc<dyn VisitorStore>,
}

impl DedupeGuard {
    pub fn new(store: Arc<dyn VisitorStore>) -> Self {
        Self { store }
    }

    /// Storage key for a survey's expiration record.
    pub fn record_key(survey: &str) -> String {
        format!("survey_{}", survey)
    }

    /// True when the survey may be shown. A record suppresses only while
    /// `now <= expiration`; anything else is removed on the way out.
    pub fn should_show(&self, survey: &str) -> bool {
        let key = Self::record_key(survey);
        let stored = self
            .store
            .get(&key)
            .and_then(|value| value.parse::<i64>().ok());

        match stored {
            Some(expires_at) if Utc::now().timestamp_millis() <= expires_at => {
                debug!(survey = %survey, expires_at, "Survey suppressed by dedupe record");
                false
            }
            _ => {
                self.store.remove(&key);
                debug!(survey = %survey, "No live dedupe record, survey showable");
                true
            }
        }
    }

    /// Records that the survey was answered: suppressed until
    /// `shown_at_ms + cooldown_ms`, overwriting any prior record.
    pub fn record_shown(&self, survey: &str, shown_at_ms: i64, cooldown_ms: i64) {
        let key = Self::record_key(survey);
        let expires_at = shown_at_ms + cooldown_ms;
        self.store.set(&key, expires_at.to_string());
        debug!(survey = %survey, expires_at, "Dedupe record written");
    }
}
