// ── Signal quality classification ──
//
// Maps raw LTE radio metrics to a coarse quality bucket. Routers report
// these as strings with unit suffixes ("-95dBm", "12dB", ">=-51dBm"), so
// the raw text is normalised before parsing.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Radio metric reported in the `device_signal` dataset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SignalKind {
    Rssi,
    Rsrp,
    Rsrq,
    Sinr,
}

/// Qualitative reading of a signal metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum QualityBucket {
    Excellent,
    Good,
    Fair,
    Poor,
    Unknown,
}

impl SignalKind {
    /// Lower bounds (inclusive) for Excellent, Good and Fair.
    const fn thresholds(self) -> [f64; 3] {
        match self {
            Self::Rssi => [-65.0, -75.0, -85.0],
            Self::Rsrp => [-90.0, -105.0, -120.0],
            Self::Rsrq => [-10.0, -15.0, -20.0],
            Self::Sinr => [10.0, 5.0, 0.0],
        }
    }

    /// Classify a raw metric string such as `"-95dBm"`.
    pub fn classify(self, raw: &str) -> QualityBucket {
        let Some(value) = parse_metric(raw) else {
            return QualityBucket::Unknown;
        };

        let [excellent, good, fair] = self.thresholds();
        if value >= excellent {
            QualityBucket::Excellent
        } else if value >= good {
            QualityBucket::Good
        } else if value >= fair {
            QualityBucket::Fair
        } else {
            QualityBucket::Poor
        }
    }
}

/// Classify a metric by name, as read straight out of a dataset record.
///
/// Total: an unrecognised kind, a missing or null value, or text that is
/// not a number all yield [`QualityBucket::Unknown`].
pub fn classify(kind: &str, raw: Option<&Value>) -> QualityBucket {
    let Ok(kind) = kind.parse::<SignalKind>() else {
        return QualityBucket::Unknown;
    };
    match raw.and_then(value_text) {
        Some(text) => kind.classify(&text),
        None => QualityBucket::Unknown,
    }
}

fn value_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s)),
        other => Some(Cow::Owned(other.to_string())),
    }
}

/// Strip unit suffixes and the `>=` prefix, then parse.
fn parse_metric(raw: &str) -> Option<f64> {
    let normalized = raw
        .to_uppercase()
        .replace("DBM", "")
        .replace("DB", "")
        .replace("&GT;=", "")
        .replace(">=", "");
    normalized.trim().parse::<f64>().ok()
}
