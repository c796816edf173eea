use std::{fs, path::Path};

use aamva_dlid::PersonRecord;

pub const CALIFORNIA_IIN: &str = "636004";

pub fn load_record(path: impl AsRef<Path>) -> PersonRecord {
    let content = fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

pub fn scenario() -> PersonRecord {
    load_record("tests/aamva/scenario.json")
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
