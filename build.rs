//! Build stamp for `geodata version`.

use time::format_description;
use time::OffsetDateTime;

/// Stamped variables and their format patterns. A variable already set in
/// the environment is passed through unchanged.
const STAMPS: [(&str, &str); 2] = [
    ("GEODATA_BUILD_DATE", "[month repr:short] [day padding:space] [year]"),
    ("GEODATA_BUILD_TIME", "[hour]:[minute]:[second]"),
];

fn main() {
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
    let instant = build_instant();
    for (var, pattern) in STAMPS {
        println!("cargo:rerun-if-env-changed={}", var);
        let value = std::env::var(var).unwrap_or_else(|_| stamp(instant, pattern));
        println!("cargo:rustc-env={}={}", var, value);
    }
}

// SOURCE_DATE_EPOCH pins the stamp for reproducible builds.
fn build_instant() -> OffsetDateTime {
    std::env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
        .unwrap_or_else(OffsetDateTime::now_utc)
}

fn stamp(instant: OffsetDateTime, pattern: &str) -> String {
    format_description::parse(pattern)
        .ok()
        .and_then(|fmt| instant.format(&fmt).ok())
        .unwrap_or_else(|| "unknown".to_string())
}
