use crate::http::response::Capture;
use crate::reporting::model::Advisory;
use crate::scan::result::ScanResult;
use crate::validation::verdict::{ClassificationLabel, Verdict};
use std::fmt::Write;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

// ==============================
// BOX CONFIGURATION
// ==============================

const BOX_WIDTH: usize = 70;
const INNER_WIDTH: usize = BOX_WIDTH - 2;
const RULE_WIDTH: usize = 80;

// ==============================
// WIDTH HANDLING
// ==============================

fn visual_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut to at most `max` columns, marking the cut with "…"
fn clip(s: &str, max: usize) -> String {
    if visual_width(s) <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        // one column stays free for the marker
        if width + w + 1 > max {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}

/// Payloads may carry CR/LF; keep them on one line.
fn printable(s: &str) -> String {
    s.chars()
        .flat_map(|c| match c {
            '\r' | '\n' | '\t' => c.escape_default().collect::<Vec<_>>(),
            c => vec![c],
        })
        .collect()
}

// ==============================
// BOX RENDERING HELPERS
// ==============================

fn top_border() -> String {
    format!("╔{}╗", "═".repeat(INNER_WIDTH))
}

fn middle_border() -> String {
    format!("╠{}╣", "═".repeat(INNER_WIDTH))
}

fn bottom_border() -> String {
    format!("╚{}╝", "═".repeat(INNER_WIDTH))
}

/// Left-aligned box line (emoji-safe)
fn box_line(content: &str) -> String {
    let safe_content = format!(" {} ", clip(content, INNER_WIDTH - 2));
    let width = visual_width(&safe_content);

    let padding = INNER_WIDTH.saturating_sub(width);
    format!("║{}{}║", safe_content, " ".repeat(padding))
}

/// Centered box line (emoji-safe)
fn box_line_centered(content: &str) -> String {
    let safe_content = format!(" {} ", content);
    let width = visual_width(&safe_content);

    if width >= INNER_WIDTH {
        return box_line(content);
    }

    let remaining = INNER_WIDTH - width;
    let left = remaining / 2;
    let right = remaining - left;

    format!(
        "║{}{}{}║",
        " ".repeat(left),
        safe_content,
        " ".repeat(right)
    )
}

fn label_marker(label: ClassificationLabel) -> &'static str {
    match label {
        ClassificationLabel::ConfirmedVulnerability => "🔴",
        ClassificationLabel::PossibleVulnerability => "🟡",
        ClassificationLabel::Safe => "🟢",
        ClassificationLabel::Error => "⚪",
    }
}

// ==============================
// MAIN REPORT RENDERER
// ==============================

pub fn render(results: &[ScanResult]) -> String {
    let mut out = String::new();
    for result in results {
        render_one(&mut out, result);
    }
    out
}

fn render_one(out: &mut String, result: &ScanResult) {
    let errors = result
        .verdicts
        .iter()
        .filter(|v| v.label() == ClassificationLabel::Error)
        .count();

    // ------------------------------
    // SUMMARY BOX
    // ------------------------------
    let _ = writeln!(out, "\n{}", top_border());
    let heading = if result.summary.positive_count > 0 {
        format!("{} – VULNERABILITIES DETECTED", result.probe_kind.title().to_uppercase())
    } else {
        format!("{} – SCAN COMPLETE", result.probe_kind.title().to_uppercase())
    };
    let _ = writeln!(out, "{}", box_line_centered(&heading));
    let _ = writeln!(out, "{}", middle_border());

    let _ = writeln!(out, "{}", box_line(&format!("Target:    {}", result.target)));
    let _ = writeln!(out, "{}", box_line(&format!("Run:       {}", result.run_id)));
    if let Some(tag) = &result.tag {
        let _ = writeln!(out, "{}", box_line(&format!("Tag:       {}", tag)));
    }
    let baseline = match &result.baseline.capture {
        Capture::Response(resp) => format!("{} ({} bytes)", resp.status_code, resp.body_len),
        Capture::Failed { transport_error } => format!("failed – {}", transport_error),
    };
    let _ = writeln!(out, "{}", box_line(&format!("Baseline:  {}", baseline)));
    let elapsed = result.finished_at - result.started_at;
    let _ = writeln!(
        out,
        "{}",
        box_line(&format!("Duration:  {:.2}s", elapsed.num_milliseconds() as f64 / 1000.0))
    );
    let _ = writeln!(out, "{}", middle_border());
    let _ = writeln!(
        out,
        "{}",
        box_line(&format!("Results:   {}", result.summary.total))
    );
    let _ = writeln!(
        out,
        "{}",
        box_line(&format!("Positives: {}", result.summary.positive_count))
    );
    if errors > 0 {
        let _ = writeln!(out, "{}", box_line(&format!("Errors:    {}", errors)));
    }
    if result.cancelled {
        let _ = writeln!(out, "{}", box_line("⚠️  Scan cancelled – results are partial"));
    }
    let _ = writeln!(out, "{}", bottom_border());

    if result.summary.positive_count == 0 {
        let _ = writeln!(out, "\n✅ No vulnerabilities detected\n");
        return;
    }

    // ------------------------------
    // DETAILED FINDINGS
    // ------------------------------
    for (idx, verdict) in result.positives().enumerate() {
        render_finding(out, idx + 1, verdict);
    }

    let advisory = Advisory::for_kind(result.probe_kind);
    let _ = writeln!(out, "{}", "═".repeat(RULE_WIDTH));
    let _ = writeln!(out, "{} [{}]", advisory.vuln_type, advisory.cwe);
    let _ = writeln!(out, "{}", "═".repeat(RULE_WIDTH));
    let _ = writeln!(out, "\n📋 DESCRIPTION:\n   {}", advisory.description);
    let _ = writeln!(out, "\n🛠️ REMEDIATION:\n   {}", advisory.remediation);
    let _ = writeln!(out, "\n📚 REFERENCES:");
    for (i, reference) in advisory.references.iter().enumerate() {
        let _ = writeln!(out, "   [{}] {}", i + 1, reference);
    }
    let _ = writeln!(out);
}

fn render_finding(out: &mut String, number: usize, verdict: &Verdict) {
    let label = verdict.label();
    let _ = writeln!(out, "{}", "═".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "FINDING #{}: {} {} [payload #{}]",
        number,
        label_marker(label),
        label,
        verdict.probe.index
    );
    let _ = writeln!(out, "{}", "═".repeat(RULE_WIDTH));

    let _ = writeln!(out, "\n💉 PAYLOAD:");
    let _ = writeln!(out, "   {}", printable(&verdict.probe.display_payload));
    let _ = writeln!(out, "   {}", verdict.probe.url);

    let _ = writeln!(out, "\n🔍 EVIDENCE:");
    for evidence in verdict.evidence() {
        let _ = writeln!(out, "   • {}", printable(&evidence.detail));
    }

    if let Some(note) = &verdict.note {
        let _ = writeln!(out, "\n📝 NOTE:\n   {}", note);
    }
    let _ = writeln!(out);
}
