// ==========================================
// AvailabilityAggregator 集成测试
// ==========================================
// 测试目标: 分桶互斥、比率口径、缺失记录归入 unknown
// ==========================================


use rehearsal_planner::domain::AvailabilityIndex;
use rehearsal_planner::domain::AvailabilityStatus::*;
use rehearsal_planner::domain::Tier;
use rehearsal_planner::engine::{AvailabilityAggregator, DayClassifier};
use rehearsal_planner::domain::{DateRange, WeekdayFilter};
use test_helpers::{active_roster, date, index_with_mornings, sample_roster, ALL_STATUSES};

fn ids(members: &[rehearsal_planner::domain::Member]) -> Vec<&str> {
    members.iter().map(|m| m.id.as_str()).collect()
}

#[test]
fn test_mixed_roster_buckets_and_ratio() {
    let d1 = date(2026, 3, 1);
    let roster = sample_roster();
    let index = index_with_mornings(&[
        ("A", d1, Available),
        ("B", d1, Available),
        ("C", d1, Maybe),
        ("D", d1, Unavailable),
    ]);

    let summary = AvailabilityAggregator::new().summarize(d1, &roster, &index);

    assert_eq!(ids(&summary.available), vec!["A", "B"]);
    assert_eq!(ids(&summary.maybe), vec!["C"]);
    // 非在团成员仍按记录分桶,但不进入分母
    assert_eq!(ids(&summary.unavailable), vec!["D"]);
    assert!(summary.unknown.is_empty());
    assert_eq!(summary.active_count, 3);
    assert!((summary.ratio - 2.0 / 3.0).abs() < 1e-9);

    let tier = DayClassifier::new().classify(
        d1,
        &DateRange::single(d1),
        &WeekdayFilter::rehearsal_default(),
        Some(&summary),
    );
    assert_eq!(tier, Tier::Medium);
}

#[test]
fn test_empty_index_puts_everyone_in_unknown() {
    let d1 = date(2026, 3, 1);
    let roster = active_roster(3);

    let summary = AvailabilityAggregator::new().summarize(d1, &roster, &AvailabilityIndex::new());

    assert_eq!(summary.unknown.len(), 3);
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.ratio, 0.0);
    assert_eq!(DayClassifier::new().tier_for_ratio(summary.ratio), Tier::Low);
}

#[test]
fn test_missing_entry_is_unknown_regardless_of_others() {
    let d1 = date(2026, 3, 1);
    let roster = active_roster(2);
    let index = index_with_mornings(&[("m01", d1, Available)]);

    let summary = AvailabilityAggregator::new().summarize(d1, &roster, &index);
    assert_eq!(ids(&summary.unknown), vec!["m02"]);
}

#[test]
fn test_evening_is_ignored() {
    use rehearsal_planner::domain::DayAvailability;

    let d1 = date(2026, 3, 1);
    let roster = active_roster(1);
    let mut index = AvailabilityIndex::new();
    index.insert("m01", d1, DayAvailability::new(Unknown, Available));

    let summary = AvailabilityAggregator::new().summarize(d1, &roster, &index);
    assert_eq!(summary.unknown.len(), 1);
    assert_eq!(summary.available_count(), 0);
}

#[test]
fn test_no_active_members_ratio_is_zero() {
    let d1 = date(2026, 3, 1);
    let roster = vec![rehearsal_planner::domain::Member::new(
        "P",
        "Pending",
        rehearsal_planner::domain::MemberStatus::Pending,
    )];
    let index = index_with_mornings(&[("P", d1, Available)]);

    let summary = AvailabilityAggregator::new().summarize(d1, &roster, &index);
    assert_eq!(summary.available_count(), 1);
    assert_eq!(summary.active_count, 0);
    assert_eq!(summary.ratio, 0.0);
    assert!(!summary.ratio.is_nan());
}

#[test]
fn test_empty_roster() {
    let summary =
        AvailabilityAggregator::new().summarize(date(2026, 3, 1), &[], &AvailabilityIndex::new());
    assert_eq!(summary.total(), 0);
    assert_eq!(summary.ratio, 0.0);
}

#[test]
fn test_partition_and_ratio_bounds_over_status_combinations() {
    let d1 = date(2026, 3, 1);
    let roster = active_roster(3);
    let aggregator = AvailabilityAggregator::new();

    // 3 人 × 4 种状态的全部组合
    for a in ALL_STATUSES {
        for b in ALL_STATUSES {
            for c in ALL_STATUSES {
                let index = index_with_mornings(&[("m01", d1, a), ("m02", d1, b), ("m03", d1, c)]);
                let summary = aggregator.summarize(d1, &roster, &index);

                assert_eq!(summary.total(), roster.len());
                assert!((0.0..=1.0).contains(&summary.ratio));

                let expected = [a, b, c].iter().filter(|s| **s == Available).count();
                assert_eq!(summary.available_count(), expected);
            }
        }
    }
}

#[test]
fn test_summarize_is_idempotent() {
    let d1 = date(2026, 3, 1);
    let roster = sample_roster();
    let index = index_with_mornings(&[("A", d1, Available), ("C", d1, Unavailable)]);
    let aggregator = AvailabilityAggregator::new();

    let first = aggregator.summarize(d1, &roster, &index);
    let second = aggregator.summarize(d1, &roster, &index);
    assert_eq!(first, second);
}
