//! Read-only aggregations over a filtered selection.
//!
//! Each function is independent and stateless: it takes the selection as
//! a slice and returns a fresh result.

use std::collections::{BTreeMap, HashMap};

use accident_map_accident_models::AccidentRecord;
use accident_map_analytics_models::{
    CauseCount, CauseRankingConfig, GeoPoint, OverflowPolicy, PhaseCount,
};

/// Number of records in the selection.
#[must_use]
pub fn record_count(records: &[AccidentRecord]) -> u64 {
    records.len() as u64
}

/// Counts records per day phase, ordered by phase label.
///
/// Records without a phase label are not counted. Phases with no records
/// are omitted.
#[must_use]
pub fn phase_histogram(records: &[AccidentRecord]) -> Vec<PhaseCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for phase in records.iter().filter_map(|r| r.day_phase.as_deref()) {
        *counts.entry(phase).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(phase, count)| PhaseCount {
            phase: phase.to_string(),
            count,
        })
        .collect()
}

/// Ranks causes by frequency, most frequent first.
///
/// Causes with equal counts keep the order in which they first appear in
/// the selection. Only the top `config.top_n` causes are kept; the rest are
/// dropped or summed into `config.other_label` according to
/// `config.overflow_policy`. Records without a cause label are not counted.
#[must_use]
pub fn cause_ranking(records: &[AccidentRecord], config: &CauseRankingConfig) -> Vec<CauseCount> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, u64)> = Vec::new();

    for cause in records.iter().filter_map(|r| r.cause.as_deref()) {
        let idx = *positions.entry(cause).or_insert_with(|| {
            counts.push((cause, 0));
            counts.len() - 1
        });
        counts[idx].1 += 1;
    }

    // Stable sort keeps first-seen order among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let split = config.top_n.min(counts.len());
    let overflow: u64 = counts[split..].iter().map(|(_, count)| count).sum();

    let mut ranking: Vec<CauseCount> = counts[..split]
        .iter()
        .map(|(cause, count)| CauseCount {
            cause: (*cause).to_string(),
            count: *count,
        })
        .collect();

    match config.overflow_policy {
        OverflowPolicy::Drop => {
            if overflow > 0 {
                log::trace!(
                    "Dropping {} causes ({overflow} accidents) below the top {}",
                    counts.len() - split,
                    config.top_n
                );
            }
        }
        OverflowPolicy::Merge => {
            if overflow > 0 {
                ranking.push(CauseCount {
                    cause: config.other_label.clone(),
                    count: overflow,
                });
            }
        }
    }

    ranking
}

/// Projects the selection to map points, skipping records without both
/// coordinates. Coordinate ranges are not validated.
#[must_use]
pub fn geo_projection(records: &[AccidentRecord]) -> Vec<GeoPoint> {
    records
        .iter()
        .filter_map(AccidentRecord::coordinates)
        .map(|(latitude, longitude)| GeoPoint {
            latitude,
            longitude,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, NaiveTime};

    fn record(phase: Option<&str>, cause: Option<&str>) -> AccidentRecord {
        AccidentRecord::new(
            NaiveDate::from_ymd_opt(2019, 3, 10).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            phase.map(str::to_string),
            cause.map(str::to_string),
            None,
            None,
        )
    }

    fn causes(labels: &[&str]) -> Vec<AccidentRecord> {
        labels
            .iter()
            .map(|c| record(Some("Pleno dia"), Some(*c)))
            .collect()
    }

    fn pairs(ranking: &[CauseCount]) -> Vec<(&str, u64)> {
        ranking.iter().map(|c| (c.cause.as_str(), c.count)).collect()
    }

    #[test]
    fn histogram_sums_to_record_count() {
        let records = vec![
            record(Some("Plena Noite"), None),
            record(Some("Pleno dia"), None),
            record(Some("Plena Noite"), None),
            record(Some("Amanhecer"), None),
        ];
        let histogram = phase_histogram(&records);
        let total: u64 = histogram.iter().map(|p| p.count).sum();
        assert_eq!(total, record_count(&records));
        assert_eq!(
            histogram,
            vec![
                PhaseCount {
                    phase: "Amanhecer".to_string(),
                    count: 1
                },
                PhaseCount {
                    phase: "Plena Noite".to_string(),
                    count: 2
                },
                PhaseCount {
                    phase: "Pleno dia".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn histogram_skips_missing_phases() {
        let records = vec![record(None, None), record(Some("Anoitecer"), None)];
        let histogram = phase_histogram(&records);
        assert_eq!(histogram.len(), 1);
        assert_eq!(histogram[0].count, 1);
    }

    #[test]
    fn ranking_sorts_descending_with_first_seen_ties() {
        let records = causes(&["B", "A", "C", "A", "C", "D"]);
        let ranking = cause_ranking(&records, &CauseRankingConfig::default());
        assert_eq!(pairs(&ranking), vec![("A", 2), ("C", 2), ("B", 1), ("D", 1)]);
    }

    #[test]
    fn ranking_keeps_at_most_top_n() {
        let labels: Vec<String> = (0..10).map(|i| format!("cause {i}")).collect();
        let mut records = Vec::new();
        for (i, label) in labels.iter().enumerate() {
            for _ in 0..=i {
                records.push(record(None, Some(label.as_str())));
            }
        }

        let ranking = cause_ranking(&records, &CauseRankingConfig::default());
        assert_eq!(ranking.len(), 7);
        assert_eq!(ranking[0].cause, "cause 9");
        assert_eq!(ranking[6].cause, "cause 3");
        assert!(ranking.windows(2).all(|w| w[0].count > w[1].count));
    }

    #[test]
    fn merge_policy_sums_overflow() {
        let records = causes(&["A", "A", "A", "B", "B", "C", "D"]);
        let config = CauseRankingConfig {
            top_n: 2,
            overflow_policy: OverflowPolicy::Merge,
            other_label: "Outros".to_string(),
        };
        let ranking = cause_ranking(&records, &config);
        assert_eq!(pairs(&ranking), vec![("A", 3), ("B", 2), ("Outros", 2)]);
    }

    #[test]
    fn merge_policy_without_overflow_adds_nothing() {
        let records = causes(&["A", "B"]);
        let config = CauseRankingConfig {
            overflow_policy: OverflowPolicy::Merge,
            ..CauseRankingConfig::default()
        };
        assert_eq!(pairs(&cause_ranking(&records, &config)), vec![("A", 1), ("B", 1)]);
    }

    #[test]
    fn ranking_of_empty_selection_is_empty() {
        assert!(cause_ranking(&[], &CauseRankingConfig::default()).is_empty());
        assert!(phase_histogram(&[]).is_empty());
        assert!(geo_projection(&[]).is_empty());
        assert_eq!(record_count(&[]), 0);
    }

    #[test]
    fn projection_skips_records_without_coordinates() {
        let mut with = record(None, None);
        with.latitude = Some(-19.9);
        with.longitude = Some(-43.9);
        let mut half = record(None, None);
        half.latitude = Some(-20.0);

        let points = geo_projection(&[with, half, record(None, None)]);
        assert_eq!(
            points,
            vec![GeoPoint {
                latitude: -19.9,
                longitude: -43.9
            }]
        );
    }
}
