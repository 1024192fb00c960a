use crate::domain::models::slot::{TimeMarker, MINUTES_PER_DAY};
use crate::error::AppError;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use std::collections::BTreeSet;
use tracing::warn;

/// Number of consecutive markers a session of `duration_min` occupies.
/// Durations that are not a multiple of the granularity round up.
pub fn slots_needed(duration_min: i32, granularity_min: i32) -> Result<u32, AppError> {
    if granularity_min <= 0 {
        return Err(AppError::Validation(format!("Slot granularity must be positive, got {}", granularity_min)));
    }
    if duration_min <= 0 {
        return Err(AppError::Validation(format!("Duration must be positive, got {}", duration_min)));
    }
    Ok((duration_min as u32).div_ceil(granularity_min as u32))
}

/// Returns, in ascending order, the markers from which an uninterrupted run of
/// `slots_needed` markers exists. Continuity is checked by time value, so gaps
/// in the marker list break a run even when the markers are adjacent in the list.
pub fn filter_valid_slots(
    markers: &[TimeMarker],
    duration_min: i32,
    granularity_min: i32,
) -> Result<Vec<TimeMarker>, AppError> {
    let needed = slots_needed(duration_min, granularity_min)?;
    let step = granularity_min as u32;
    let present: BTreeSet<u32> = markers.iter().map(TimeMarker::minute_of_day).collect();

    let valid = present.iter()
        .copied()
        .filter(|&start| {
            (1..needed).all(|k| {
                let next = start + k * step;
                next < MINUTES_PER_DAY && present.contains(&next)
            })
        })
        .filter_map(TimeMarker::from_minutes)
        .collect();

    Ok(valid)
}

/// Turns stored marker strings into sorted, deduplicated markers aligned to the
/// granularity. Anything else is dropped and logged.
pub fn parse_markers(raw: &[String], granularity_min: i32) -> Vec<TimeMarker> {
    let mut markers = BTreeSet::new();

    for value in raw {
        match value.parse::<TimeMarker>() {
            Ok(marker) if marker.is_aligned(granularity_min) => {
                markers.insert(marker);
            }
            Ok(marker) => {
                warn!("Dropping marker {} not aligned to {} minute granularity", marker, granularity_min);
            }
            Err(_) => {
                warn!("Dropping unparsable marker '{}'", value);
            }
        }
    }

    markers.into_iter().collect()
}

/// First and last day of a month, both inclusive.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), AppError> {
    let invalid = || AppError::Validation(format!("Invalid month {}-{}", year, month));

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }.ok_or_else(invalid)?;
    let last = next_first.pred_opt().ok_or_else(invalid)?;

    Ok((first, last))
}

/// Resolves a local date and start marker in the practice time zone to UTC.
pub fn combine_in_zone(date: NaiveDate, marker: TimeMarker, tz: Tz) -> Result<DateTime<Utc>, AppError> {
    tz.from_local_datetime(&date.and_time(marker.time()))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or(AppError::Validation("Invalid local time (ambiguous or skipped due to DST)".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: i32 = 30;

    fn m(s: &str) -> TimeMarker {
        s.parse().unwrap()
    }

    fn ms(list: &[&str]) -> Vec<TimeMarker> {
        list.iter().map(|s| m(s)).collect()
    }

    fn has_full_run(set: &BTreeSet<u32>, start: u32, needed: u32) -> bool {
        (0..needed).all(|k| set.contains(&(start + k * G as u32)))
    }

    #[test]
    fn test_scenario_gap_in_the_middle() {
        let markers = ms(&["08:00", "08:30", "09:00", "10:00"]);
        let valid = filter_valid_slots(&markers, 60, G).unwrap();
        assert_eq!(valid, ms(&["08:00", "08:30"]));
    }

    #[test]
    fn test_scenario_ninety_minutes_needs_three_markers() {
        let markers = ms(&["08:00", "08:30", "09:00"]);
        let valid = filter_valid_slots(&markers, 90, G).unwrap();
        assert_eq!(valid, ms(&["08:00"]));
    }

    #[test]
    fn test_refiltering_output_drops_run_tails() {
        let markers = ms(&["08:00", "08:30", "09:00", "10:00"]);
        let once = filter_valid_slots(&markers, 60, G).unwrap();
        let twice = filter_valid_slots(&once, 60, G).unwrap();
        assert_eq!(twice, ms(&["08:00"]));
        assert_eq!(filter_valid_slots(&markers, 60, G).unwrap(), once);
    }

    #[test]
    fn test_unsorted_and_duplicate_input() {
        let markers = ms(&["10:00", "08:30", "08:00", "08:30", "09:00"]);
        let valid = filter_valid_slots(&markers, 60, G).unwrap();
        assert_eq!(valid, ms(&["08:00", "08:30"]));
    }

    #[test]
    fn test_membership_not_position() {
        // 09:00 and 10:00 sit next to each other in the list but are an hour apart.
        let markers = ms(&["09:00", "10:00", "10:30"]);
        let valid = filter_valid_slots(&markers, 60, G).unwrap();
        assert_eq!(valid, ms(&["10:00"]));
    }

    #[test]
    fn test_partial_duration_rounds_up() {
        let markers = ms(&["08:00", "08:30", "11:00"]);
        assert_eq!(filter_valid_slots(&markers, 45, G).unwrap(), ms(&["08:00"]));
        assert_eq!(slots_needed(45, G).unwrap(), 2);
        assert_eq!(slots_needed(61, G).unwrap(), 3);
    }

    #[test]
    fn test_run_does_not_wrap_past_midnight() {
        let markers = ms(&["00:00", "23:30"]);
        let valid = filter_valid_slots(&markers, 60, G).unwrap();
        assert!(valid.is_empty());
    }

    #[test]
    fn test_empty_input() {
        for duration in [15, 30, 60, 240] {
            assert!(filter_valid_slots(&[], duration, G).unwrap().is_empty());
        }
    }

    #[test]
    fn test_invalid_arguments() {
        let markers = ms(&["08:00"]);
        assert!(matches!(filter_valid_slots(&markers, 0, G), Err(AppError::Validation(_))));
        assert!(matches!(filter_valid_slots(&markers, -30, G), Err(AppError::Validation(_))));
        assert!(matches!(filter_valid_slots(&markers, 30, 0), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_other_granularity() {
        let markers = ms(&["09:00", "09:15", "09:30", "10:00"]);
        assert_eq!(filter_valid_slots(&markers, 45, 15).unwrap(), ms(&["09:00"]));
        assert_eq!(filter_valid_slots(&markers, 30, 15).unwrap(), ms(&["09:00", "09:15"]));
    }

    /// Walks every subset of an eight-marker morning and checks the filter
    /// against a direct reading of the contiguity rule.
    #[test]
    fn test_exhaustive_morning_subsets() {
        let base = 8 * 60;
        let durations = [1, 15, 30, 45, 60, 90, 120, 150, 240];

        for mask in 0u32..256 {
            let set: BTreeSet<u32> = (0..8)
                .filter(|bit| mask & (1 << bit) != 0)
                .map(|bit| base + bit * G as u32)
                .collect();
            let markers: Vec<TimeMarker> = set.iter()
                .rev()
                .filter_map(|&min| TimeMarker::from_minutes(min))
                .collect();

            for duration in durations {
                let needed = slots_needed(duration, G).unwrap();
                let valid = filter_valid_slots(&markers, duration, G).unwrap();
                let valid_minutes: BTreeSet<u32> = valid.iter().map(TimeMarker::minute_of_day).collect();

                assert!(valid.windows(2).all(|w| w[0] < w[1]), "Output must be strictly ascending");

                for start in &set {
                    let expected = has_full_run(&set, *start, needed);
                    assert_eq!(
                        valid_minutes.contains(start), expected,
                        "mask {:08b}, duration {}, start {}", mask, duration, start
                    );
                }
                assert!(valid_minutes.is_subset(&set));

                if duration <= G {
                    let sorted: Vec<TimeMarker> = set.iter().filter_map(|&x| TimeMarker::from_minutes(x)).collect();
                    assert_eq!(valid, sorted);
                }

                let repeated = filter_valid_slots(&markers, duration, G).unwrap();
                assert_eq!(repeated, valid, "Same input must give the same output");

                let refiltered: BTreeSet<u32> = filter_valid_slots(&valid, duration, G).unwrap()
                    .iter().map(TimeMarker::minute_of_day).collect();
                assert!(refiltered.is_subset(&valid_minutes));
            }
        }
    }

    #[test]
    fn test_parse_markers_cleans_input() {
        let raw: Vec<String> = ["10:00", "08:00", "08:00", "08:15", "lunch", "09:30"]
            .iter().map(|s| s.to_string()).collect();
        assert_eq!(parse_markers(&raw, G), ms(&["08:00", "09:30", "10:00"]));
    }

    #[test]
    fn test_month_bounds() {
        let (first, last) = month_bounds(2028, 2).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2028, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2028, 2, 29).unwrap());

        let (_, dec_last) = month_bounds(2026, 12).unwrap();
        assert_eq!(dec_last, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());

        assert!(month_bounds(2026, 13).is_err());
    }

    #[test]
    fn test_combine_in_zone() {
        let date = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        let utc = combine_in_zone(date, m("09:00"), chrono_tz::Europe::Budapest).unwrap();
        assert_eq!(utc.to_rfc3339(), "2026-07-01T07:00:00+00:00");

        // 2026-03-29 02:30 does not exist in Budapest.
        let dst = NaiveDate::from_ymd_opt(2026, 3, 29).unwrap();
        assert!(combine_in_zone(dst, m("02:30"), chrono_tz::Europe::Budapest).is_err());
    }
}
