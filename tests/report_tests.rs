use form_autofill::{
    SeedMode,
    report::{
        console::{format_console_report, format_json_report},
        report_model::{ControlState, FillReport},
    },
};

// ============================================================================
// Helper builders
// ============================================================================

fn control(tag: &str, kind: &str, key: Option<&str>, value: &str) -> ControlState {
    ControlState {
        tag: tag.to_string(),
        kind: kind.to_string(),
        key: key.map(str::to_string),
        value: value.to_string(),
    }
}

fn signup_report() -> FillReport {
    FillReport::new(
        "signup",
        SeedMode::Structured,
        vec![
            control("input", "text", Some("first_name"), "Jane"),
            control("select", "select", Some("country"), "us"),
            control("input", "checkbox", Some("newsletter"), "unchecked"),
            control("input", "radio", Some("plan_pro"), "checked (pro)"),
            control("input", "hidden", Some("csrf"), "token"),
            control("textarea", "textarea", None, ""),
        ],
    )
}

// ============================================================================
// Report model
// ============================================================================

#[test]
fn filled_count_ignores_empty_unchecked_and_skipped() {
    assert_eq!(signup_report().filled_count(), 3);
}

#[test]
fn builders_set_optional_fields() {
    let report = signup_report().with_submitted(true).with_duration(1500);

    assert!(report.submitted);
    assert_eq!(report.duration_ms, Some(1500));
    assert_eq!(report.seed_mode, "Structured");
}

// ============================================================================
// Console reporter
// ============================================================================

#[test]
fn console_report_has_header_rows_and_summary() {
    let output = format_console_report(&signup_report());

    assert!(output.starts_with("=== Autofill: signup (Structured seed) ===\n"));
    assert!(output.contains("input[text]"));
    assert!(output.contains("\"Jane\""));
    assert!(output.contains("(skipped)"));
    assert!(output.contains("checked (pro)"));
    assert!(output.trim_end().ends_with("=== 3 of 6 controls filled ==="));
}

#[test]
fn console_report_marks_missing_key() {
    let output = format_console_report(&signup_report());
    let textarea_row = output.lines().find(|l| l.contains("textarea")).unwrap();

    assert!(textarea_row.contains(" - "));
}

#[test]
fn console_summary_includes_submit_and_duration() {
    let report = signup_report().with_submitted(true).with_duration(2340);
    let output = format_console_report(&report);

    assert!(output.contains("=== 3 of 6 controls filled, submitted in 2.3s ==="));
}

// ============================================================================
// JSON reporter
// ============================================================================

#[test]
fn json_report_round_trips_fields() {
    let json = format_json_report(&signup_report().with_submitted(true)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["form_name"], "signup");
    assert_eq!(value["submitted"], true);
    assert_eq!(value["controls"].as_array().unwrap().len(), 6);
    assert!(value.get("duration_ms").is_none());
    assert!(value["controls"][5].get("key").is_none());
}
