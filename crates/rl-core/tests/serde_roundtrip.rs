use rl_core::provenance::{RunProvenance, SchemaVersion};
use rl_core::seed::{Seed, SeedPolicy};

#[test]
fn provenance_round_trip_json() {
    let provenance = RunProvenance {
        roster_hash: "roster".into(),
        assignment_hash: "assignment".into(),
        seed: 123456,
        created_at: "2024-01-31T00:00:00Z".into(),
        tool_versions: Default::default(),
    }
    .with_tool("rl-core", "0.1.0");
    let json = serde_json::to_string_pretty(&provenance).expect("serialize");
    let decoded: RunProvenance = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, provenance);
}

#[test]
fn schema_version_is_dotted_text() {
    let version = SchemaVersion::new(1, 2, 0);
    assert_eq!(serde_json::to_string(&version).unwrap(), "\"1.2.0\"");
    let decoded: SchemaVersion = serde_json::from_str("\"1.2.0\"").expect("parse");
    assert_eq!(decoded, version);
    assert!(serde_json::from_str::<SchemaVersion>("\"1.2\"").is_err());
    assert!(serde_json::from_str::<SchemaVersion>("\"1.x.0\"").is_err());
}

#[test]
fn schema_compatibility_follows_major_and_minor() {
    let reader = SchemaVersion::new(1, 1, 0);
    assert!(reader.reads(&SchemaVersion::new(1, 0, 3)));
    assert!(reader.reads(&SchemaVersion::new(1, 1, 0)));
    assert!(!reader.reads(&SchemaVersion::new(1, 2, 0)));
    assert!(!reader.reads(&SchemaVersion::new(2, 0, 0)));
}

#[test]
fn seed_serializes_as_plain_integer() {
    assert_eq!(serde_json::to_string(&Seed::new(123456)).unwrap(), "123456");
    let policy: SeedPolicy = serde_json::from_str("{}").expect("defaulted");
    assert_eq!(policy.min_digits, 6);
}
