//! Probe kinds supported by the engine

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    /// CRLF / HTTP header injection
    #[serde(alias = "CRLF")]
    Crlf,
    /// Local file inclusion
    #[serde(alias = "LFI")]
    Lfi,
    /// Server-side template injection
    #[serde(alias = "SSTI")]
    Ssti,
    /// Reflected cross-site scripting
    #[serde(alias = "XSS")]
    Xss,
    /// Open redirect
    #[serde(alias = "OPEN_REDIRECT", alias = "open-redirect", alias = "redirect")]
    #[value(name = "open_redirect", aliases = ["open-redirect", "redirect"])]
    OpenRedirect,
}

impl ProbeKind {
    pub const ALL: [ProbeKind; 5] = [
        ProbeKind::Crlf,
        ProbeKind::Lfi,
        ProbeKind::Ssti,
        ProbeKind::Xss,
        ProbeKind::OpenRedirect,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProbeKind::Crlf => "crlf",
            ProbeKind::Lfi => "lfi",
            ProbeKind::Ssti => "ssti",
            ProbeKind::Xss => "xss",
            ProbeKind::OpenRedirect => "open_redirect",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ProbeKind::Crlf => "CRLF Injection",
            ProbeKind::Lfi => "Local File Inclusion",
            ProbeKind::Ssti => "Server-Side Template Injection",
            ProbeKind::Xss => "Reflected XSS",
            ProbeKind::OpenRedirect => "Open Redirect",
        }
    }

    /// Redirect behavior is the signal for open redirect and CRLF, and no
    /// kind in the catalog needs the final hop either.
    pub fn follows_redirects(&self) -> bool {
        false
    }

    /// Every kind here sends attack payloads to a live host.
    pub fn requires_confirmation(&self) -> bool {
        true
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How sure a reflected payload makes us, if it comes back unescaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Certainty {
    Confirmed,
    Possible,
}

impl Certainty {
    /// Labels such as `Possible (encoded)` keep their prefix.
    pub fn from_label(label: &str) -> Self {
        if label.starts_with("Possible") {
            Certainty::Possible
        } else {
            Certainty::Confirmed
        }
    }
}
