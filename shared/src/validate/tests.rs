use super::*;

fn comp_input<'a>() -> CompetitionInput<'a> {
    CompetitionInput {
        comp_id: "e2e-1",
        name: "Test Comp",
        registration_open_date: "2025-01-01",
        start_date: "2025-02-01",
        end_date: "2025-03-01",
        max_teams: 10,
        max_members_per_team: 10,
        editing: false,
    }
}

fn active_window() -> StepWindow {
    StepWindow {
        start_date: StepDate::parse("2025-02-01").unwrap(),
        end_date: StepDate::parse("2025-03-01").unwrap(),
        status: CompetitionStatus::Active,
    }
}

// =========================================================
// Competition form
// =========================================================

#[test]
fn valid_competition_passes() {
    assert!(validate_competition(&comp_input()).is_empty());
}

#[test]
fn comp_id_length_bounds() {
    let mut input = comp_input();
    input.comp_id = "ab";
    assert!(validate_competition(&input).contains_key("comp_id"));

    input.comp_id = "x".repeat(21).leak();
    assert!(validate_competition(&input).contains_key("comp_id"));

    input.comp_id = "abc";
    assert!(validate_competition(&input).is_empty());
}

#[test]
fn comp_id_skipped_when_editing() {
    let mut input = comp_input();
    input.comp_id = "";
    input.editing = true;
    assert!(validate_competition(&input).is_empty());
}

#[test]
fn name_length_bounds() {
    let mut input = comp_input();
    input.name = "ab";
    assert!(validate_competition(&input).contains_key("name"));

    input.name = "y".repeat(81).leak();
    assert!(validate_competition(&input).contains_key("name"));

    input.name = "";
    assert_eq!(
        validate_competition(&input).get("name").map(String::as_str),
        Some("Name is required")
    );
}

#[test]
fn date_order_checked_pairwise() {
    let mut input = comp_input();
    input.registration_open_date = "2025-02-15";
    let errors = validate_competition(&input);
    assert!(errors.contains_key("registration_open_date"));
    assert!(!errors.contains_key("start_date"));

    let mut input = comp_input();
    input.end_date = "2025-01-15";
    let errors = validate_competition(&input);
    assert!(errors.contains_key("start_date"));
    assert!(!errors.contains_key("registration_open_date"));
}

#[test]
fn equal_boundary_dates_are_allowed() {
    let mut input = comp_input();
    input.registration_open_date = "2025-02-01";
    input.start_date = "2025-02-01";
    input.end_date = "2025-02-01";
    assert!(validate_competition(&input).is_empty());
}

#[test]
fn missing_dates_reported_individually() {
    let mut input = comp_input();
    input.start_date = "";
    input.end_date = "not-a-date";
    let errors = validate_competition(&input);
    assert_eq!(
        errors.get("start_date").map(String::as_str),
        Some("Start date is required")
    );
    assert!(errors["end_date"].starts_with("Invalid date"));
    // Pairwise ordering is not evaluated with an incomplete triple
    assert!(!errors.contains_key("registration_open_date"));
}

#[test]
fn numeric_limits() {
    let mut input = comp_input();
    input.max_teams = 0;
    assert!(validate_competition(&input).contains_key("max_teams"));
    input.max_teams = 501;
    assert!(validate_competition(&input).contains_key("max_teams"));
    input.max_teams = 500;
    assert!(validate_competition(&input).is_empty());

    let mut input = comp_input();
    input.max_members_per_team = 201;
    assert!(validate_competition(&input).contains_key("max_members_per_team"));
    input.max_members_per_team = 1;
    assert!(validate_competition(&input).is_empty());
}

// =========================================================
// Team form
// =========================================================

#[test]
fn team_name_bounds() {
    assert!(validate_team("Pacers", 3, 10).is_empty());
    assert!(validate_team("  ", 3, 10).contains_key("name"));
    assert!(validate_team(&"z".repeat(51), 3, 10).contains_key("name"));
    // Exactly 50 chars is fine
    assert!(validate_team(&"z".repeat(50), 3, 10).is_empty());
}

#[test]
fn team_capacity_blocks_creation() {
    let errors = validate_team("Pacers", 10, 10);
    assert_eq!(
        errors.get(GENERAL).map(String::as_str),
        Some("Maximum number of teams (10) reached for this competition")
    );

    // One slot left is still allowed
    assert!(validate_team("Pacers", 9, 10).is_empty());
}

// =========================================================
// Step submission
// =========================================================

#[test]
fn valid_step_entry_passes() {
    assert!(validate_steps("2025-02-10", "8500", &active_window()).is_empty());
}

#[test]
fn step_date_window_includes_grace_period() {
    let w = active_window();
    // End date + 2 days is the last accepted day
    assert!(validate_steps("2025-03-03", "100", &w).is_empty());
    assert!(validate_steps("2025-03-04", "100", &w).contains_key("date"));
    // Day before start is rejected
    assert!(validate_steps("2025-01-31", "100", &w).contains_key("date"));
    // Boundaries themselves are accepted
    assert!(validate_steps("2025-02-01", "100", &w).is_empty());
    assert!(validate_steps("2025-03-01", "100", &w).is_empty());
}

#[test]
fn step_count_bounds() {
    let w = active_window();
    assert!(validate_steps("2025-02-10", "0", &w).is_empty());
    assert!(validate_steps("2025-02-10", "100000", &w).is_empty());

    let errors = validate_steps("2025-02-10", "150000", &w);
    assert_eq!(
        errors.get("steps").map(String::as_str),
        Some("Step count cannot exceed 100000 steps per day")
    );
    assert!(validate_steps("2025-02-10", "-5", &w).contains_key("steps"));
    assert!(validate_steps("2025-02-10", "12k", &w).contains_key("steps"));
    assert!(validate_steps("2025-02-10", "", &w).contains_key("steps"));
}

#[test]
fn submission_blocked_outside_active_status() {
    for status in [
        CompetitionStatus::Draft,
        CompetitionStatus::Registration,
        CompetitionStatus::Ended,
        CompetitionStatus::Archived,
    ] {
        let w = StepWindow { status, ..active_window() };
        let errors = validate_steps("2025-02-10", "100", &w);
        assert!(errors.contains_key(GENERAL), "status {:?}", status);
    }
}
