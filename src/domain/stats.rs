use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendQuota {
    #[serde(rename = "Max24HourSend")]
    pub max_24_hour_send: f64,
    pub max_send_rate: f64,
    #[serde(rename = "SentLast24Hours")]
    pub sent_last_24_hours: f64,
}

/// One 15-minute bucket of sending activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendDataPoint {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub delivery_attempts: i64,
    pub bounces: i64,
    pub complaints: i64,
    pub rejects: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendStatistics {
    pub send_data_points: Vec<SendDataPoint>,
}

/// A complete read of quota and statistics, taken together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSnapshot {
    pub send_statistics: SendStatistics,
    pub send_quota: SendQuota,
}

impl StatisticsSnapshot {
    /// Builds a snapshot with data points ordered oldest first.
    #[must_use]
    pub fn new(send_quota: SendQuota, mut points: Vec<SendDataPoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        Self { send_statistics: SendStatistics { send_data_points: points }, send_quota }
    }

    #[must_use]
    pub fn totals(&self) -> SendDataTotals {
        self.send_statistics.send_data_points.iter().fold(SendDataTotals::default(), |acc, p| SendDataTotals {
            delivery_attempts: acc.delivery_attempts + p.delivery_attempts,
            bounces: acc.bounces + p.bounces,
            complaints: acc.complaints + p.complaints,
            rejects: acc.rejects + p.rejects,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SendDataTotals {
    pub delivery_attempts: i64,
    pub bounces: i64,
    pub complaints: i64,
    pub rejects: i64,
}
