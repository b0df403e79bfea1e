// ==========================================
// AvailabilityApi 集成测试
// ==========================================
// 测试目标: SQLite 全链路 (AppState → API → Engine), 拖选提交
// ==========================================


use std::sync::Arc;

use rehearsal_planner::api::{ApiError, AvailabilityApi};
use rehearsal_planner::app::AppState;
use rehearsal_planner::config::{config_keys, SchedulingConfig};
use rehearsal_planner::domain::AvailabilityStatus::*;
use rehearsal_planner::domain::{AvailabilityIndex, DateRange, Period, Tier};
use rehearsal_planner::engine::DragSelection;
use rehearsal_planner::repository::InMemoryStore;
use test_helpers::{active_roster, create_test_db, date, seed_members, sample_roster};

#[tokio::test]
async fn test_sqlite_flow_suggests_best_sunday() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = AppState::new(db_path).await.expect("Failed to create AppState");
    seed_members(&state.member_repo, &active_roster(5)).unwrap();

    let api = &state.availability_api;
    for id in ["m01", "m02", "m03", "m04"] {
        api.set_availability(id, date(2026, 3, 15), Period::Morning, Available)
            .unwrap();
    }
    for id in ["m01", "m02"] {
        api.set_availability(id, date(2026, 3, 8), Period::Morning, Available)
            .unwrap();
    }
    // 晚上不影响排练建议
    api.set_availability("m05", date(2026, 3, 8), Period::Evening, Available)
        .unwrap();

    let response = api
        .get_rehearsal_suggestions(date(2026, 3, 1), date(2026, 3, 31), None)
        .unwrap();

    assert_eq!(response.candidates.len(), 5);
    assert_eq!(response.candidates[0].date, date(2026, 3, 15));
    assert_eq!(response.candidates[1].date, date(2026, 3, 8));
    assert_eq!(response.candidates[1].summary.available_count(), 2);

    let best = response.best.expect("should have a qualifying date");
    assert_eq!(best.date, date(2026, 3, 15));
    assert!(best.meets_threshold);
    assert!((best.summary.ratio - 0.8).abs() < 1e-9);
}

#[tokio::test]
async fn test_stored_config_drives_api() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    {
        let state = AppState::new(db_path.clone()).await.unwrap();
        state
            .config_manager
            .set_config_value(config_keys::REHEARSAL_WEEKDAY, "SAT")
            .unwrap();
        state
            .config_manager
            .set_config_value(config_keys::MIN_REQUIRED_MEMBERS, "1")
            .unwrap();
    }

    let state = AppState::new(db_path).await.unwrap();
    seed_members(&state.member_repo, &active_roster(2)).unwrap();
    state
        .availability_api
        .set_availability("m02", date(2026, 3, 14), Period::Morning, Available)
        .unwrap();

    let response = state
        .availability_api
        .get_rehearsal_suggestions(date(2026, 3, 1), date(2026, 3, 31), None)
        .unwrap();

    // 2026-03 有 4 个周六
    assert_eq!(response.candidates.len(), 4);
    assert_eq!(response.min_required, 1);
    assert_eq!(response.best.map(|c| c.date), Some(date(2026, 3, 14)));
}

#[tokio::test]
async fn test_invalid_range_and_unknown_member() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = AppState::new(db_path).await.unwrap();
    let api = &state.availability_api;

    let err = api
        .get_rehearsal_suggestions(date(2026, 5, 1), date(2026, 4, 1), Some(1))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidRange { .. }));

    let err = api
        .set_availability("nobody", date(2026, 3, 1), Period::Morning, Available)
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = api
        .apply_selection(
            "nobody",
            &DateRange::new(date(2026, 3, 5), date(2026, 3, 1)),
            Period::Morning,
            Available,
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidRange { .. }));
}

#[tokio::test]
async fn test_calendar_tiers_from_sqlite() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = AppState::new(db_path).await.unwrap();
    seed_members(&state.member_repo, &active_roster(4)).unwrap();
    let api = &state.availability_api;

    for id in ["m01", "m02", "m03"] {
        api.set_availability(id, date(2026, 3, 1), Period::Morning, Available)
            .unwrap();
    }
    for id in ["m01", "m02"] {
        api.set_availability(id, date(2026, 3, 8), Period::Morning, Available)
            .unwrap();
    }

    let view = DateRange::month(2026, 3).unwrap();
    let cells = api.get_calendar_tiers(&view, &view).unwrap();

    let tier_of = |d: u32| cells[(d - 1) as usize].tier;
    assert_eq!(tier_of(1), Tier::High);
    assert_eq!(tier_of(8), Tier::Medium);
    assert_eq!(tier_of(15), Tier::Low);
    assert_eq!(tier_of(9), Tier::Disabled);
    assert_eq!(cells.iter().filter(|c| c.tier != Tier::Disabled).count(), 5);
}

#[test]
fn test_drag_selection_commit_updates_store() {
    let store = Arc::new(InMemoryStore::new(sample_roster(), AvailabilityIndex::new()));
    let api = AvailabilityApi::new(store.clone(), store.clone(), SchedulingConfig::default());

    // 反向拖动: 3/12 → 3/9
    let mut selection = DragSelection::new();
    selection.begin(date(2026, 3, 12));
    selection.extend(date(2026, 3, 10));
    selection.extend(date(2026, 3, 9));
    let range = selection.commit().expect("dragging selection commits");
    assert_eq!(range, DateRange::new(date(2026, 3, 9), date(2026, 3, 12)));

    let written = api
        .apply_selection("B", &range, Period::Morning, Unavailable)
        .unwrap();
    assert_eq!(written, 4);

    let snapshot = store.snapshot().unwrap();
    assert_eq!(snapshot.availability.entry_count(), 4);
    assert_eq!(
        snapshot.availability.morning_status("B", date(2026, 3, 11)),
        Unavailable
    );

    // 已提交状态不再响应拖动
    selection.extend(date(2026, 3, 20));
    assert_eq!(selection.committed_range(), Some(range));
}

#[tokio::test]
async fn test_default_suggestion_window() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = AppState::new(db_path).await.unwrap();

    let window = state
        .availability_api
        .default_suggestion_window(date(2026, 1, 1))
        .unwrap();
    assert_eq!(window, DateRange::new(date(2026, 1, 1), date(2026, 3, 31)));

    let window = state
        .availability_api
        .default_suggestion_window(date(2026, 11, 30))
        .unwrap();
    assert_eq!(window.end, date(2027, 2, 28));
}
