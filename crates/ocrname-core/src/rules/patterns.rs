//! Fixed patterns used when tidying rule output.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Characters that are unsafe in filenames on common filesystems
    pub static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(
        r#"[/\\:*?"<>|\x00-\x1F\x7F]"#
    ).unwrap();

    // "Month D, YYYY" with single spaces and a four-digit year
    pub static ref LONG_DATE: Regex = Regex::new(
        r"^(\p{L}+) \d{1,2}, \d{4}$"
    ).unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(
        r"\s+"
    ).unwrap();
}
