use crate::probe::kind::ProbeKind;
use crate::scan::dispatcher::DEFAULT_CONCURRENCY;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// PROBEWORK – concurrent injection probing with evidence-backed verdicts
#[derive(Parser, Debug)]
#[command(
    name = "probework",
    version,
    about = "PROBEWORK – concurrent injection probing with evidence-backed verdicts",
    long_about = r#"
PROBEWORK sends a fixed catalog of payloads for one vulnerability class at a
single parameterized URL, classifies every response, and reports what it
found with the evidence that triggered each verdict.

PROBE KINDS:
  • crlf           CRLF / header injection (tagged, header + body echo)
  • lfi            Local file inclusion (file content signatures)
  • ssti           Server-side template injection (evaluated arithmetic)
  • xss            Reflected XSS (unescaped payload reflection)
  • open_redirect  Open redirect (3xx Location pointing off-host)

Every kind sends attack traffic. Nothing is sent without --confirm.

VERDICTS:
  • Confirmed Vulnerability   strong, payload-specific evidence
  • Possible Vulnerability    weaker evidence, review by hand
  • Safe                      no evidence in the response
  • Error                     the probe never produced a response
"#,
    after_help = r#"EXAMPLES:

  probework -t "https://example.com/page?file=" -k lfi --confirm
  probework -t "https://example.com/search?q=" -k xss,ssti --confirm --threads 10
  probework -t "https://example.com/go?next=" --all --confirm --format json -o report.json
  probework --request scan.json --confirm

Authentication:
  probework -t "https://example.com/page?q=" -k xss --confirm --cookie "session=abc123"
  probework -t "https://example.com/page?q=" -k xss --confirm -H "Authorization: Bearer token"
"#
)]
pub struct Cli {
    /// Target URL ending in a parameter position (e.g. https://example.com/page?q=)
    #[arg(short, long, required_unless_present = "request")]
    pub target: Option<String>,

    // ═══════════════════════════════════════════════════════════════════
    // PROBING
    // ═══════════════════════════════════════════════════════════════════
    /// Probe kind(s): crlf, lfi, ssti, xss, open_redirect (repeat or comma-separate)
    #[arg(
        short,
        long = "kind",
        value_enum,
        value_delimiter = ',',
        help_heading = "PROBING"
    )]
    pub kinds: Vec<ProbeKind>,

    /// Run every probe kind
    #[arg(long, help_heading = "PROBING", conflicts_with = "kinds")]
    pub all: bool,

    /// Confirm you are authorized to send attack traffic to the target
    #[arg(long, help_heading = "PROBING")]
    pub confirm: bool,

    /// Load the scan request from a JSON file
    #[arg(long, value_name = "FILE", help_heading = "PROBING")]
    pub request: Option<PathBuf>,

    // ═══════════════════════════════════════════════════════════════════
    // HTTP
    // ═══════════════════════════════════════════════════════════════════
    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 8.0, help_heading = "HTTP")]
    pub timeout: f64,

    /// Accept invalid TLS certificates for probe traffic
    #[arg(long, help_heading = "HTTP")]
    pub insecure: bool,

    /// Bytes of each response body kept for classification
    #[arg(long = "max-body-bytes", default_value_t = 2000, help_heading = "HTTP")]
    pub max_body_bytes: usize,

    /// Retries for the baseline request (0 = single attempt)
    #[arg(long = "baseline-retries", default_value_t = 0, help_heading = "HTTP")]
    pub baseline_retries: usize,

    /// Custom header (can be used multiple times, e.g. -H "Authorization: Bearer x")
    #[arg(short = 'H', long = "header", help_heading = "HTTP")]
    pub headers: Vec<String>,

    /// Cookie header value sent with every request
    #[arg(long, help_heading = "HTTP")]
    pub cookie: Option<String>,

    /// User-Agent sent with every request
    #[arg(long = "user-agent", help_heading = "HTTP")]
    pub user_agent: Option<String>,

    // ═══════════════════════════════════════════════════════════════════
    // PERFORMANCE
    // ═══════════════════════════════════════════════════════════════════
    /// Concurrent probe requests
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY, help_heading = "PERFORMANCE")]
    pub threads: usize,

    /// Maximum HTTP requests per second (0 = unlimited)
    #[arg(long, default_value_t = 0, help_heading = "PERFORMANCE")]
    pub rate: u32,

    // ═══════════════════════════════════════════════════════════════════
    // OUTPUT
    // ═══════════════════════════════════════════════════════════════════
    /// Skip the banner display
    #[arg(long, help_heading = "OUTPUT")]
    pub no_banner: bool,

    /// Quiet mode (warnings and the report only)
    #[arg(short, long, help_heading = "OUTPUT", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose output (debug level)
    #[arg(short, long, help_heading = "OUTPUT")]
    pub verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, help_heading = "OUTPUT")]
    pub format: OutputFormat,

    /// Output file path
    #[arg(short, long, help_heading = "OUTPUT")]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Kinds to run, in the order given. `--all` expands to every kind.
    pub fn selected_kinds(&self) -> Vec<ProbeKind> {
        if self.all {
            return ProbeKind::ALL.to_vec();
        }
        let mut kinds = Vec::new();
        for kind in &self.kinds {
            if !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }
        kinds
    }
}
