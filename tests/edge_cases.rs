//! Edge case tests for postpack
//!
//! These tests cover boundary conditions in tokenization, timestamp
//! normalization, and extraction that might not be covered by regular
//! unit and integration tests.

use chrono::{TimeZone, Utc};

use postpack::config::PipelineConfig;
use postpack::layout::{FieldRole, Layout};
use postpack::pipeline::{Pipeline, finalize};
use postpack::prelude::*;

fn compact_pipeline() -> Pipeline {
    Pipeline::with_config(PipelineConfig::new().with_layout(Layout::compact()))
}

// =========================================================================
// Tokenizer nesting edge cases
// =========================================================================

#[test]
fn test_quote_and_brace_nesting_combined() {
    let fields = tokenize(r#"a,"quoted, {not nested}",{"k": "v, w"},b"#, ',');
    assert_eq!(
        fields,
        vec!["a", "quoted, {not nested}", r#"{"k": "v, w"}"#, "b"]
    );
}

#[test]
fn test_delimiter_at_line_edges() {
    assert_eq!(tokenize(",middle,", ','), vec!["", "middle", ""]);
}

#[test]
fn test_only_braces() {
    assert_eq!(tokenize("{}", ','), vec!["{}"]);
    assert_eq!(tokenize("{},{}", ','), vec!["{}", "{}"]);
}

#[test]
fn test_deeply_nested_braces() {
    let line = r#"{"a": {"b": {"c": {"d": 1,}}}},x"#;
    let fields = tokenize(line, ',');
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[1], "x");
}

#[test]
fn test_quote_inside_braces() {
    // Brace depth keeps the comma nested even with an odd quote count
    let fields = tokenize(r#"{"weird": "unter},minated}"#, ',');
    assert_eq!(fields.len(), 1);
}

#[test]
fn test_unicode_content_survives_tokenization() {
    let fields = tokenize("2024-01-05T10:00:00,Привет мир 🌍,1,url", ',');
    assert_eq!(fields[1], "Привет мир 🌍");
}

// =========================================================================
// Timestamp normalization edge cases
// =========================================================================

#[test]
fn test_sentinel_case_variants() {
    for raw in ["nat", "NaT", "NAT", "nAt", "", "  "] {
        assert!(normalize_timestamp(raw).is_none(), "raw = {raw:?}");
    }
}

#[test]
fn test_iso_with_fractional_seconds() {
    // RFC 3339 accepts the fraction directly
    assert_eq!(
        normalize_timestamp("2024-01-05T10:00:00.500+00:00"),
        Some(Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap())
    );
    // Fraction without offset: suffix discarded, naive value assumed UTC
    assert_eq!(
        normalize_timestamp("2024-01-05T10:00:00.123456"),
        Some(Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap())
    );
}

#[test]
fn test_negative_offset_converted() {
    assert_eq!(
        normalize_timestamp("2024-01-05T10:00:00-05:00"),
        Some(Utc.with_ymd_and_hms(2024, 1, 5, 15, 0, 0).unwrap())
    );
}

#[test]
fn test_decorated_timestamps() {
    // Trailing URL plus a leading username in the same token
    assert_eq!(
        normalize_timestamp("alice 2024-01-05 10:00:00 https://x.com/a/status/1"),
        Some(Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap())
    );
}

#[test]
fn test_bare_time_with_meridiem_not_stripped() {
    // The AM marker means the space belongs to the clock time, so the
    // leading-token strip must not fire; the result is date-incomplete
    assert!(normalize_timestamp("10:30 AM").is_none());
}

#[test]
fn test_month_name_edge_days() {
    assert_eq!(
        normalize_timestamp("Dec 31 2023, 11:59 PM"),
        Some(Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 0).unwrap())
    );
    assert_eq!(
        normalize_timestamp("February 29 2024, 12:00 PM"),
        Some(Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap())
    );
}

#[test]
fn test_invalid_calendar_dates_rejected() {
    assert!(normalize_timestamp("2024-13-01 10:00:00").is_none());
    assert!(normalize_timestamp("2024-02-30 10:00:00").is_none());
    assert!(normalize_timestamp("February 30 2023, 12:00 PM").is_none());
}

// =========================================================================
// Extraction edge cases
// =========================================================================

#[test]
fn test_very_long_status_id() {
    let url = "https://x.com/u/status/99999999999999999999999999";
    assert_eq!(
        identifier_from_url(url),
        Some("99999999999999999999999999")
    );
}

#[test]
fn test_status_segment_with_query_string() {
    assert_eq!(
        identifier_from_url("https://x.com/u/status/123?ref_src=twsrc"),
        Some("123")
    );
}

#[test]
fn test_status_without_digits() {
    assert_eq!(identifier_from_url("https://x.com/u/status/abc"), None);
}

#[test]
fn test_engagement_with_surrounding_garbage() {
    let layout = Layout::custom(vec![FieldRole::Engagement], 1);
    let candidate = extract(&[String::from("42 likes")], &layout);
    // Not a clean integer: defaults to 0 rather than guessing
    assert_eq!(candidate.engagement_count, 0);
}

#[test]
fn test_double_at_username() {
    let layout = Layout::custom(vec![FieldRole::AuthorUsername], 1);
    let candidate = extract(&[String::from("@@alice")], &layout);
    // Only one leading @ is decoration
    assert_eq!(candidate.author_username.as_deref(), Some("@alice"));
}

#[test]
fn test_short_line_against_long_layout() {
    // Classic layout over a three-token line: trailing positions stay
    // unpopulated, and the identifier position is simply absent
    let blob = "2024-01-05 10:00:00,x,5";
    let (records, report) =
        Pipeline::with_config(PipelineConfig::new().with_layout(Layout::classic())).ingest(blob);
    assert!(records.is_empty());
    assert_eq!(report.count_of(DiscardReason::NoIdentifier), 1);
}

#[test]
fn test_crlf_line_endings() {
    let blob = "2024-01-05T10:00:00,a,1,https://x.com/u/status/1\r\n2024-01-05T11:00:00,b,2,https://x.com/u/status/2\r\n";
    let (records, report) = compact_pipeline().ingest(blob);
    assert_eq!(report.accepted, 2);
    assert_eq!(records[1].id(), "2");
}

#[test]
fn test_very_long_line() {
    let text = "word ".repeat(5_000);
    let blob = format!("2024-01-05T10:00:00,{text},1,https://x.com/u/status/8");
    let (records, _) = compact_pipeline().ingest(&blob);
    assert_eq!(records.len(), 1);
    // Collapsed and trimmed
    assert!(!records[0].text().ends_with(' '));
}

// =========================================================================
// Finalize edge cases
// =========================================================================

#[test]
fn test_finalize_empty_input() {
    assert!(finalize(vec![]).is_empty());
}

#[test]
fn test_finalize_all_duplicates() {
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let records: Vec<Record> = (0..5)
        .map(|i| Record::new("same", format!("copy {i}")).with_created_at(ts))
        .collect();
    let out = finalize(records);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].text(), "copy 0");
}

#[test]
fn test_finalize_preserves_order_modulo_removals() {
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let records = vec![
        Record::new("a", "1").with_created_at(ts),
        Record::new("b", "2"), // dropped: no timestamp
        Record::new("c", "3").with_created_at(ts),
        Record::new("a", "4").with_created_at(ts), // dropped: duplicate
        Record::new("d", "5").with_created_at(ts),
    ];
    let ids: Vec<String> = finalize(records).into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["a", "c", "d"]);
}
