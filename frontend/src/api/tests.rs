use super::*;
use stepsquad_shared::HEADER_DEV_USER;

#[test]
fn every_request_carries_content_type() {
    let auth = (HEADER_DEV_USER, "admin@stepsquad.club".to_string());
    // GET 没有请求体，Content-Type 也必须在
    let builder = request_builder(HttpMethod::Get, "http://localhost:8080/api/devices", &auth);
    let headers = builder.header_entries();
    assert!(
        headers
            .iter()
            .any(|(k, v)| k == "Content-Type" && v == "application/json")
    );
    assert!(
        headers
            .iter()
            .any(|(k, v)| k == HEADER_DEV_USER && v == "admin@stepsquad.club")
    );

    let builder = request_builder(HttpMethod::Delete, "http://localhost:8080/api/devices/garmin", &auth);
    assert!(
        builder
            .header_entries()
            .iter()
            .any(|(k, _)| k == "Content-Type")
    );
}

#[test]
fn empty_filter_adds_no_query_params() {
    let filter = CompetitionFilter::default();
    assert!(filter.is_empty());
    assert_eq!(filter.query_suffix(), "");
}

#[test]
fn filter_suffix_encodes_values() {
    let filter = CompetitionFilter {
        status: Some(CompetitionStatus::Active),
        tz: Some("Europe/Bucharest".to_string()),
        search: Some("spring run".to_string()),
    };
    assert!(!filter.is_empty());
    assert_eq!(
        filter.query_suffix(),
        "&status=ACTIVE&tz=Europe%2FBucharest&search=spring%20run"
    );
}

#[test]
fn filter_suffix_skips_unset_fields() {
    let filter = CompetitionFilter {
        status: None,
        tz: None,
        search: Some("alpha".to_string()),
    };
    assert_eq!(filter.query_suffix(), "&search=alpha");
}
