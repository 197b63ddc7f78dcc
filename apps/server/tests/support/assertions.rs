use axum::http::StatusCode;
use serde_json::Value;

/// Assert status code matches expected
pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(
        actual, expected,
        "{context}: expected status {expected}, got {actual}"
    );
}

/// Assert an error or confirmation body carries exactly `expected`
pub fn assert_message(body: &Value, expected: &str, context: &str) {
    assert_eq!(
        body.get("message").and_then(|v| v.as_str()),
        Some(expected),
        "{context}: unexpected body {body}"
    );
}

/// Assert a page envelope's bookkeeping fields
pub fn assert_page(body: &Value, total: u64, page: u64, page_size: u64, total_pages: u64) {
    assert_eq!(body["total"], total, "total in {body}");
    assert_eq!(body["page"], page, "page in {body}");
    assert_eq!(body["pageSize"], page_size, "pageSize in {body}");
    assert_eq!(body["totalPages"], total_pages, "totalPages in {body}");
    let len = body["data"].as_array().map(Vec::len).unwrap_or_default() as u64;
    assert!(len <= page_size, "data longer than pageSize in {body}");
}

/// Ids of the records in a `data` array or bare array
pub fn ids(body: &Value) -> Vec<String> {
    let items = body
        .get("data")
        .unwrap_or(body)
        .as_array()
        .cloned()
        .unwrap_or_default();
    items
        .iter()
        .filter_map(|item| item["id"].as_str().map(String::from))
        .collect()
}
