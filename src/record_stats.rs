use crate::models::{NightlyRecord, RecordStatsResponse, RecordSummary, Trend};
use crate::score::round1;

const WEEK: usize = 7;

pub fn summarize_record(record: &NightlyRecord) -> RecordSummary {
    let total_lekar = record.lekar.len() as u32;
    let average_intensity = if total_lekar > 0 {
        let sum: f64 = record.lekar.iter().map(|leak| leak.styrkur).sum();
        round1(sum / f64::from(total_lekar))
    } else {
        0.0
    };

    RecordSummary {
        total_lekar,
        total_lat: record.lat.len() as u32,
        average_intensity,
        total_alcohol: record.upplysingar.afengi.total(),
        has_exercise: record.upplysingar.aefing.is_active(),
        coffee_cups: record.upplysingar.kaffi,
    }
}

/// Aggregates over nightly records. The newest record by `date` counts as day one of
/// the last week, whatever order the records arrive in.
pub fn build_record_stats(records: &[NightlyRecord]) -> RecordStatsResponse {
    let mut newest_first: Vec<&NightlyRecord> = records.iter().collect();
    newest_first.sort_by(|a, b| b.date.cmp(&a.date));

    let total_records = newest_first.len();
    let total_lekar: u32 = newest_first.iter().map(|r| r.leak_count()).sum();
    let total_lat: u32 = newest_first.iter().map(|r| r.lat.len() as u32).sum();

    let leaks: Vec<f64> = newest_first
        .iter()
        .flat_map(|r| r.lekar.iter().map(|leak| leak.styrkur))
        .collect();
    let total_coffee: f64 = newest_first.iter().map(|r| r.upplysingar.kaffi).sum();
    let exercise_days = newest_first
        .iter()
        .filter(|r| r.upplysingar.aefing.is_active())
        .count();
    let alcohol_days = newest_first
        .iter()
        .filter(|r| r.upplysingar.afengi.any())
        .count();

    let last_week = &newest_first[..total_records.min(WEEK)];

    RecordStatsResponse {
        total_records,
        total_lekar,
        total_lat,
        average_lekar_per_day: round1(ratio(f64::from(total_lekar), total_records)),
        last_record_date: newest_first.first().map(|r| r.date.clone()),
        weekly_average: round1(mean_leaks(last_week)),
        average_intensity: round1(ratio(leaks.iter().sum(), leaks.len())),
        average_coffee: round1(ratio(total_coffee, total_records)),
        exercise_percentage: percentage(exercise_days, total_records),
        alcohol_percentage: percentage(alcohol_days, total_records),
        trend: recent_trend(&newest_first),
    }
}

/// Last seven records against the seven before them, with a 10% dead band.
pub fn recent_trend(newest_first: &[&NightlyRecord]) -> Trend {
    if newest_first.len() < WEEK {
        return Trend::Stable;
    }

    let recent = &newest_first[..WEEK];
    let previous = &newest_first[WEEK..newest_first.len().min(2 * WEEK)];
    if previous.is_empty() {
        return Trend::Stable;
    }

    let recent_avg = mean_leaks(recent);
    let previous_avg = mean_leaks(previous);
    if recent_avg > previous_avg * 1.1 {
        Trend::Increasing
    } else if recent_avg < previous_avg * 0.9 {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

fn mean_leaks(records: &[&NightlyRecord]) -> f64 {
    let sum: u32 = records.iter().map(|r| r.leak_count()).sum();
    ratio(f64::from(sum), records.len())
}

fn ratio(sum: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}

fn percentage(part: usize, total: usize) -> u32 {
    (ratio(part as f64, total) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Alcohol, Exercise, Leak};

    fn night(date: &str, leaks: u32) -> NightlyRecord {
        NightlyRecord {
            date: date.to_string(),
            fjoldi_leka: f64::from(leaks),
            ..NightlyRecord::default()
        }
    }

    fn fortnight(recent: u32, previous: u32) -> Vec<NightlyRecord> {
        (1..=14)
            .map(|day| {
                let leaks = if day > 7 { recent } else { previous };
                night(&format!("2026-01-{day:02}"), leaks)
            })
            .collect()
    }

    #[test]
    fn summary_counts_entries() {
        let mut record = night("2026-01-05", 0);
        record.lekar = vec![
            Leak { styrkur: 1.0, ..Leak::default() },
            Leak { styrkur: 2.0, ..Leak::default() },
            Leak { styrkur: 2.0, ..Leak::default() },
        ];
        record.upplysingar.afengi = Alcohol { bjor: 1.0, vin: 2.0, annar: 0.0 };
        record.upplysingar.aefing = Exercise::Activity { kind: "labba".to_string(), km: Some(3.0) };
        record.upplysingar.kaffi = 2.0;

        let summary = summarize_record(&record);
        assert_eq!(summary.total_lekar, 3);
        assert_eq!(summary.total_lat, 0);
        assert_eq!(summary.average_intensity, 1.7);
        assert_eq!(summary.total_alcohol, 3.0);
        assert!(summary.has_exercise);
        assert_eq!(summary.coffee_cups, 2.0);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let stats = build_record_stats(&[]);
        assert_eq!(stats.total_records, 0);
        assert_eq!(stats.average_lekar_per_day, 0.0);
        assert_eq!(stats.weekly_average, 0.0);
        assert_eq!(stats.exercise_percentage, 0);
        assert_eq!(stats.last_record_date, None);
        assert_eq!(stats.trend, Trend::Stable);
    }

    #[test]
    fn aggregates_over_all_records() {
        let mut records = vec![night("2026-01-01", 2), night("2026-01-03", 1), night("2026-01-02", 0)];
        records[0].upplysingar.aefing = Exercise::Level(1.0);
        records[1].upplysingar.kaffi = 3.0;
        records[1].upplysingar.afengi.vin = 1.0;
        records[2].lekar = vec![Leak { styrkur: 3.0, ..Leak::default() }];

        let stats = build_record_stats(&records);
        assert_eq!(stats.total_records, 3);
        // the third record has no typed count, so its single lekar entry counts
        assert_eq!(stats.total_lekar, 4);
        assert_eq!(stats.average_lekar_per_day, 1.3);
        assert_eq!(stats.last_record_date.as_deref(), Some("2026-01-03"));
        assert_eq!(stats.average_intensity, 3.0);
        assert_eq!(stats.average_coffee, 1.0);
        assert_eq!(stats.exercise_percentage, 33);
        assert_eq!(stats.alcohol_percentage, 33);
    }

    #[test]
    fn weekly_average_uses_newest_seven() {
        let stats = build_record_stats(&fortnight(3, 1));
        assert_eq!(stats.weekly_average, 3.0);
        assert_eq!(stats.average_lekar_per_day, 2.0);
    }

    #[test]
    fn trend_compares_last_two_weeks() {
        assert_eq!(build_record_stats(&fortnight(3, 1)).trend, Trend::Increasing);
        assert_eq!(build_record_stats(&fortnight(1, 3)).trend, Trend::Decreasing);
        assert_eq!(build_record_stats(&fortnight(2, 2)).trend, Trend::Stable);
    }

    #[test]
    fn trend_is_stable_without_a_previous_week() {
        let week: Vec<NightlyRecord> = (1..=7).map(|d| night(&format!("2026-01-{d:02}"), d)).collect();
        assert_eq!(build_record_stats(&week).trend, Trend::Stable);
        assert_eq!(build_record_stats(&week[..5]).trend, Trend::Stable);
    }
}
