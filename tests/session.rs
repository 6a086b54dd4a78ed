use std::collections::HashMap;
use std::sync::Arc;

use keepalive::session::NO_OPTIMIZATIONS_MESSAGE;
use keepalive::{Presentation, Session};
use keepalive_core::{BundledSource, CapabilityId, ConfigLoader, DirectorySource, DocumentSource, ManufacturerConfig};
use keepalive_status::{
    permissions, AppOpsService, CheckerRegistry, MemorySink, OpMode, PermissionService, PlatformQueryContext,
    QueryError,
};

/// Xiaomi phone where battery optimization is granted, the background
/// popup op is allowed and the lock-screen op is not supported
struct XiaomiPhone;

impl PermissionService for XiaomiPhone {
    fn is_granted(&self, permission: &str) -> Result<bool, QueryError> {
        Ok(permission == permissions::REQUEST_IGNORE_BATTERY_OPTIMIZATIONS)
    }
}

impl AppOpsService for XiaomiPhone {
    fn check_op_no_throw(&self, op: i32, _uid: u32, _package: &str) -> Result<OpMode, QueryError> {
        match op {
            10021 => Ok(OpMode::Allowed),
            _ => Err(QueryError::Unsupported(format!("op {}", op))),
        }
    }
}

impl PlatformQueryContext for XiaomiPhone {
    fn package_name(&self) -> &str {
        "com.example.app"
    }

    fn uid(&self) -> u32 {
        10_123
    }

    fn sdk_int(&self) -> u32 {
        33
    }

    fn permissions(&self) -> Option<&dyn PermissionService> {
        Some(self)
    }

    fn app_ops(&self) -> Option<&dyn AppOpsService> {
        Some(self)
    }
}

fn documents(docs: &[(&str, &str)]) -> impl Fn(&str) -> Option<Vec<u8>> {
    let docs: HashMap<String, Vec<u8>> = docs
        .iter()
        .map(|(name, body)| (name.to_string(), body.as_bytes().to_vec()))
        .collect();
    move |name: &str| docs.get(name).cloned()
}

#[test]
fn test_present_xiaomi_rows() {
    let sink = Arc::new(MemorySink::new());
    let registry = CheckerRegistry::standard(sink.clone());
    let session = Session::new(&BundledSource, &registry);

    let presentation = session.present("Xiaomi", |_| Some("V14".to_string()), &XiaomiPhone);
    let rows = presentation.rows();

    let ids: Vec<CapabilityId> = rows.iter().map(|r| r.item.id).collect();
    assert_eq!(
        ids,
        vec![
            CapabilityId::BatteryOptimization,
            CapabilityId::XiaomiPowerSavingStrategy,
            CapabilityId::XiaomiBackgroundPopup,
            CapabilityId::XiaomiLockPopup,
        ]
    );

    let states: Vec<Option<bool>> = rows.iter().map(|r| r.enabled).collect();
    assert_eq!(states, vec![Some(true), None, Some(true), Some(false)]);

    let failures = sink.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].capability, CapabilityId::XiaomiLockPopup);
    assert_eq!(failures[0].target, "op 10020");
}

#[test]
fn test_present_old_miui_uses_version_rule() {
    let registry = CheckerRegistry::standard(Arc::new(MemorySink::new()));
    let session = Session::new(&BundledSource, &registry);

    let presentation = session.present("xiaomi", |_| Some("V10".to_string()), &XiaomiPhone);
    let ids: Vec<CapabilityId> = presentation.rows().iter().map(|r| r.item.id).collect();

    assert_eq!(ids.len(), 3);
    assert!(!ids.contains(&CapabilityId::XiaomiLockPopup));
}

#[test]
fn test_unknown_manufacturer_gets_default_document() {
    let registry = CheckerRegistry::standard(Arc::new(MemorySink::new()));
    let session = Session::new(&BundledSource, &registry);

    let (_, items) = session.resolve_items("Fairphone", |_| None).unwrap();
    let ids: Vec<CapabilityId> = items.iter().map(|i| i.id).collect();
    assert_eq!(
        ids,
        vec![CapabilityId::BatteryOptimization, CapabilityId::BackgroundData, CapabilityId::AlertWindow]
    );
}

#[test]
fn test_missing_configuration_message() {
    let registry = CheckerRegistry::standard(Arc::new(MemorySink::new()));
    let source = documents(&[]);
    let session = Session::new(&source, &registry);

    let presentation = session.present("acme", |_| None, &XiaomiPhone);
    assert!(matches!(presentation, Presentation::ConfigUnavailable { .. }));
    assert!(presentation.rows().is_empty());
}

#[test]
fn test_malformed_configuration_message_matches_missing() {
    let registry = CheckerRegistry::standard(Arc::new(MemorySink::new()));
    let source = documents(&[("acme.json", r#"{ "default_settings": [ { "id": "nope" } ] }"#)]);
    let session = Session::new(&source, &registry);

    let malformed = session.present("acme", |_| None, &XiaomiPhone);
    let missing = Session::new(&documents(&[]), &registry).present("acme", |_| None, &XiaomiPhone);

    assert!(matches!(malformed, Presentation::ConfigUnavailable { .. }));
    assert_eq!(malformed.message(), missing.message());
}

#[test]
fn test_empty_list_message() {
    let registry = CheckerRegistry::standard(Arc::new(MemorySink::new()));
    let source = documents(&[("acme.json", r#"{ "comment": "nothing to do", "default_settings": [] }"#)]);
    let session = Session::new(&source, &registry);

    let presentation = session.present("acme", |_| None, &XiaomiPhone);
    assert!(matches!(presentation, Presentation::NoApplicableOptimizations { .. }));
    assert_eq!(presentation.message(), Some(NO_OPTIMIZATIONS_MESSAGE));
}

#[test]
fn test_bundled_documents_survive_reserialization() {
    let bundled = BundledSource;
    for name in bundled.document_names() {
        let original = ConfigLoader::load_document(&name, &bundled).unwrap();
        let json = original.to_json().unwrap();
        let reparsed = ManufacturerConfig::from_json(&name, &json).unwrap();

        let ids = |config: &ManufacturerConfig| -> Vec<CapabilityId> {
            config.default_settings.iter().map(|i| i.id).collect()
        };
        assert_eq!(ids(&reparsed), ids(&original), "{}", name);
        assert_eq!(reparsed, original, "{}", name);
    }
}

#[test]
fn test_presentation_serializes_with_kind() {
    let registry = CheckerRegistry::standard(Arc::new(MemorySink::new()));
    let session = Session::new(&BundledSource, &registry);

    let presentation = session.present("honor", |_| None, &XiaomiPhone);
    let json = serde_json::to_value(&presentation).unwrap();

    assert_eq!(json["kind"], "rows");
    assert_eq!(json["rows"][0]["id"], "battery_optimization");
    assert_eq!(json["rows"][0]["enabled"], true);
    assert!(json["rows"][1].get("enabled").is_none());
}

#[test]
fn test_directory_documents_override_bundled() {
    let dir = tempfile::tempdir().unwrap();
    let default = BundledSource.fetch("default.json").unwrap().unwrap();
    std::fs::write(dir.path().join("default.json"), default).unwrap();
    std::fs::write(dir.path().join("acme.json"), r#"{ "default_settings": [] }"#).unwrap();

    let registry = CheckerRegistry::standard(Arc::new(MemorySink::new()));
    let source = DirectorySource::new(dir.path());
    let session = Session::new(&source, &registry);

    let acme = session.present("ACME", |_| None, &XiaomiPhone);
    assert!(matches!(acme, Presentation::NoApplicableOptimizations { .. }));

    let other = session.present("fairphone", |_| None, &XiaomiPhone);
    assert_eq!(other.rows().len(), 3);
}

#[test]
fn test_unreadable_document_is_reported_not_defaulted() {
    let dir = tempfile::tempdir().unwrap();
    let default = BundledSource.fetch("default.json").unwrap().unwrap();
    std::fs::write(dir.path().join("default.json"), default).unwrap();
    std::fs::create_dir(dir.path().join("xiaomi.json")).unwrap();

    let registry = CheckerRegistry::standard(Arc::new(MemorySink::new()));
    let source = DirectorySource::new(dir.path());
    let session = Session::new(&source, &registry);

    let unreadable = session.present("xiaomi", |_| None, &XiaomiPhone);
    let missing = Session::new(&documents(&[]), &registry).present("xiaomi", |_| None, &XiaomiPhone);

    assert!(matches!(unreadable, Presentation::ConfigUnavailable { .. }));
    assert!(unreadable.rows().is_empty());
    assert_ne!(unreadable.message(), missing.message());
}
