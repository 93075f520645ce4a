//! Random per-run markers

use rand::Rng;

const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub const CRLF_TAG_PREFIX: &str = "crlf-";
pub const TAG_LEN: usize = 6;
pub const RUN_ID_LEN: usize = 8;

/// Lowercase alphanumeric token of `len` characters
pub fn random_token(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Reflection marker embedded in every payload of one run
pub fn generate_tag(prefix: &str) -> String {
    format!("{}{}", prefix, random_token(TAG_LEN))
}

pub fn generate_run_id() -> String {
    random_token(RUN_ID_LEN)
}
