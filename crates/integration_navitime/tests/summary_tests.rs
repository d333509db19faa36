//! Golden tests for itinerary summaries of recorded responses

use integration_navitime::{NO_ROUTES, RouteError, parse, render, summarize};

fn rendered(raw: &str) -> Result<String, RouteError> {
    Ok(render(&summarize(&parse(raw)?)))
}

#[test]
fn test_keyed_response_summary() {
    let text = rendered(include_str!("fixtures/keyed_response.json")).unwrap();
    assert_eq!(text, include_str!("fixtures/keyed_summary.txt").trim_end());
}

#[test]
fn test_typed_response_summary() {
    let text = rendered(include_str!("fixtures/typed_response.json")).unwrap();
    assert_eq!(text, include_str!("fixtures/typed_summary.txt").trim_end());
}

#[test]
fn test_reports_serialize_to_json() {
    let response = parse(include_str!("fixtures/typed_response.json")).unwrap();
    let reports = summarize(&response);
    let json = serde_json::to_value(&reports).unwrap();

    assert_eq!(json[0]["rank"], 1);
    assert_eq!(json[0]["fare"], "200 JPY");
    assert_eq!(json[0]["sections"].as_array().map(Vec::len), Some(5));
}

#[test]
fn test_empty_response_summary() {
    assert_eq!(rendered(r#"{ "items": [] }"#).unwrap(), NO_ROUTES);
}
