use crate::probe::kind::ProbeKind;
use crate::scan::result::ScanResult;
use crate::validation::baseline::Baseline;
use crate::validation::verdict::Verdict;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Reference material attached to a probe kind that produced positives.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub vuln_type: &'static str,
    pub cwe: &'static str,
    pub description: &'static str,
    pub remediation: &'static str,
    pub references: &'static [&'static str],
}

impl Advisory {
    pub fn for_kind(kind: ProbeKind) -> Self {
        match kind {
            ProbeKind::Crlf => Self {
                vuln_type: "CRLF Injection",
                cwe: "CWE-93",
                description: "Carriage return and line feed characters in the parameter reach the \
                              response headers, letting an attacker add headers or split the response.",
                remediation: "Strip or reject CR and LF in any value copied into a response header. \
                              Prefer framework header APIs that refuse control characters.",
                references: &[
                    "https://cwe.mitre.org/data/definitions/93.html",
                    "https://owasp.org/www-community/vulnerabilities/CRLF_Injection",
                ],
            },
            ProbeKind::Lfi => Self {
                vuln_type: "Local File Inclusion",
                cwe: "CWE-22",
                description: "The parameter is used as a filesystem path and traversal sequences \
                              return the contents of files outside the intended directory.",
                remediation: "Map user input to an allow-list of files instead of building paths. \
                              Canonicalize and confine any path that must be built.",
                references: &[
                    "https://cwe.mitre.org/data/definitions/22.html",
                    "https://owasp.org/www-project-web-security-testing-guide/latest/4-Web_Application_Security_Testing/07-Input_Validation_Testing/11.1-Testing_for_Local_File_Inclusion",
                ],
            },
            ProbeKind::Ssti => Self {
                vuln_type: "Server-Side Template Injection",
                cwe: "CWE-1336",
                description: "Template expressions in the parameter are evaluated on the server, \
                              which usually leads to remote code execution.",
                remediation: "Never compile user input as a template. Pass it as data to a \
                              sandboxed, logic-less template instead.",
                references: &[
                    "https://cwe.mitre.org/data/definitions/1336.html",
                    "https://portswigger.net/web-security/server-side-template-injection",
                ],
            },
            ProbeKind::Xss => Self {
                vuln_type: "Cross-Site Scripting (XSS)",
                cwe: "CWE-79",
                description: "The parameter is reflected into the page without output encoding, \
                              so injected markup can run script in a victim's browser.",
                remediation: "Apply context-aware output encoding and add a restrictive \
                              Content-Security-Policy.",
                references: &[
                    "https://cheatsheetseries.owasp.org/cheatsheets/Cross_Site_Scripting_Prevention_Cheat_Sheet.html",
                    "https://cwe.mitre.org/data/definitions/79.html",
                ],
            },
            ProbeKind::OpenRedirect => Self {
                vuln_type: "Open Redirect",
                cwe: "CWE-601",
                description: "The parameter controls a redirect destination on another host, \
                              which helps phishing and OAuth token theft.",
                remediation: "Redirect only to relative paths or to an allow-list of hosts. \
                              Reject scheme-relative values such as //host.",
                references: &[
                    "https://cwe.mitre.org/data/definitions/601.html",
                    "https://cheatsheetseries.owasp.org/cheatsheets/Unvalidated_Redirects_and_Forwards_Cheat_Sheet.html",
                ],
            },
        }
    }
}

/// Serialized shape of one scan.
#[derive(Debug, Serialize)]
pub struct ScanReport<'a> {
    pub run_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<&'a str>,
    pub target: &'a str,
    pub probe_kind: ProbeKind,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub cancelled: bool,
    pub baseline: &'a Baseline,
    pub results_count: usize,
    pub positives_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<Advisory>,
    pub positives: Vec<&'a Verdict>,
    pub all_results: &'a [Verdict],
}

impl<'a> From<&'a ScanResult> for ScanReport<'a> {
    fn from(result: &'a ScanResult) -> Self {
        let positives: Vec<&Verdict> = result.positives().collect();
        let advisory = (!positives.is_empty()).then(|| Advisory::for_kind(result.probe_kind));

        Self {
            run_id: &result.run_id,
            tag: result.tag.as_deref(),
            target: &result.target,
            probe_kind: result.probe_kind,
            started_at: result.started_at,
            finished_at: result.finished_at,
            cancelled: result.cancelled,
            baseline: &result.baseline,
            results_count: result.summary.total,
            positives_count: result.summary.positive_count,
            advisory,
            positives,
            all_results: &result.verdicts,
        }
    }
}
