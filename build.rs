use chrono::{DateTime, Utc};

fn main() {
    // Reproducible builds pin the date through SOURCE_DATE_EPOCH
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
    let stamp = std::env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|secs| secs.trim().parse::<i64>().ok())
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .unwrap_or_else(Utc::now);
    println!(
        "cargo:rustc-env=BUILD_DATE={}",
        stamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
}
