use crate::report::report_model::{ControlState, FillReport};

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a fill report for terminal output.
///
/// Produces output like:
/// ```text
/// === Autofill: signup (Structured seed) ===
///
///   input[text]      first_name        "Jane"
///   select           country           "us"
///   input[checkbox]  newsletter        checked
///
/// === 3 of 3 controls filled, submitted in 0.1s ===
/// ```
pub fn format_console_report(report: &FillReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== Autofill: {} ({} seed) ===\n\n",
        report.form_name, report.seed_mode
    ));

    for control in &report.controls {
        out.push_str(&format!(
            "  {:<16} {:<18} {}\n",
            control_label(control),
            control.key.as_deref().unwrap_or("-"),
            format_value(control)
        ));
    }

    // Summary line
    out.push_str(&format!(
        "\n=== {} of {} controls filled",
        report.filled_count(),
        report.controls.len()
    ));

    if report.submitted {
        out.push_str(", submitted");
    }

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    out
}

/// Pretty-printed JSON rendering of a fill report.
pub fn format_json_report(report: &FillReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

fn control_label(control: &ControlState) -> String {
    if control.tag == "input" {
        format!("input[{}]", control.kind)
    } else {
        control.tag.clone()
    }
}

fn format_value(control: &ControlState) -> String {
    match control.kind.as_str() {
        "checkbox" | "radio" => control.value.clone(),
        "hidden" | "submit" => "(skipped)".to_string(),
        _ => format!("{:?}", control.value),
    }
}
