//! Per-status time series built from iteration results.

use crate::engine::IterationResult;
use crate::error::TrendError;
use crate::status::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts reported by one iteration.
///
/// Status keys may arrive as integer codes, integer strings or status names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    /// Node count per status after the step
    pub node_count: BTreeMap<StatusCode, i64>,

    /// Count difference per status
    pub status_delta: BTreeMap<StatusCode, i64>,
}

impl From<&IterationResult> for TrendRecord {
    fn from(result: &IterationResult) -> Self {
        Self {
            node_count: result
                .node_count
                .iter()
                .map(|(status, count)| (*status, *count as i64))
                .collect(),
            status_delta: result.count_delta.clone(),
        }
    }
}

/// Aggregated series, one entry per ingested iteration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trends {
    pub node_count: BTreeMap<StatusCode, Vec<i64>>,
    pub status_delta: BTreeMap<StatusCode, Vec<i64>>,
}

impl Trends {
    /// Number of iterations covered.
    pub fn len(&self) -> usize {
        self.node_count.values().next().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Accumulates [`Trends`] for a fixed status set.
#[derive(Debug, Clone)]
pub struct TrendAggregator {
    statuses: Vec<StatusCode>,
    trends: Trends,
    ingested: usize,
}

impl TrendAggregator {
    pub fn new(statuses: &[StatusCode]) -> Self {
        let series = || statuses.iter().map(|s| (*s, Vec::new())).collect();
        Self {
            statuses: statuses.to_vec(),
            trends: Trends {
                node_count: series(),
                status_delta: series(),
            },
            ingested: 0,
        }
    }

    /// Appends one record. Every declared status must be present in both maps.
    pub fn ingest(&mut self, record: &TrendRecord) -> Result<(), TrendError> {
        for status in &self.statuses {
            for table in [&record.node_count, &record.status_delta] {
                if !table.contains_key(status) {
                    return Err(TrendError::MissingStatus {
                        index: self.ingested,
                        status: *status,
                    });
                }
            }
        }

        for status in &self.statuses {
            if let Some(series) = self.trends.node_count.get_mut(status) {
                series.push(record.node_count[status]);
            }
            if let Some(series) = self.trends.status_delta.get_mut(status) {
                series.push(record.status_delta[status]);
            }
        }
        self.ingested += 1;
        Ok(())
    }

    pub fn ingest_iteration(&mut self, result: &IterationResult) -> Result<(), TrendError> {
        self.ingest(&TrendRecord::from(result))
    }

    /// Ingests a record serialized as JSON, e.g. read back from a report.
    pub fn ingest_json(&mut self, value: serde_json::Value) -> Result<(), TrendError> {
        let record: TrendRecord =
            serde_json::from_value(value).map_err(|e| TrendError::Malformed(e.to_string()))?;
        self.ingest(&record)
    }

    pub fn trends(&self) -> &Trends {
        &self.trends
    }

    pub fn into_trends(self) -> Trends {
        self.trends
    }
}

/// Builds trends from a whole run in one call.
pub fn build_trends<'a>(
    statuses: &[StatusCode],
    results: impl IntoIterator<Item = &'a IterationResult>,
) -> Result<Trends, TrendError> {
    let mut aggregator = TrendAggregator::new(statuses);
    for result in results {
        aggregator.ingest_iteration(result)?;
    }
    Ok(aggregator.into_trends())
}
