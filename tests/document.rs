use heat_configurator::core::{
    AttributeSet, EditError, EditSession, FieldValue, Lifecycle, ParseError, Recognition,
    Relation, Section, ValidationError,
};
use heat_configurator::{load_from_bytes, serialize_for_save};
use serde_json::{Value, json};

const MARKER_SECTION: &str = "cw::hud::battle::VehicleMarkerSettingsSingleton::ProjectSettings";

const WRAPPED: &str = r#"{
  "version": 3,
  "settings": {
    "cw::AimingProjectSettings": {
      "maxDistance": 2000.0,
      "minDistance": 35,
      "stopType": "StopByRotation",
      "useLocalAimPoint": true
    },
    "FrameLimiterSettings": {
      "client": {
        "frequency": 250,
        "carriedOverspent": 0.4
      },
      "inactive client": {
        "frequency": 30,
        "carriedOverspent": 0.4
      }
    },
    "unknown": [
      1,
      "two",
      null
    ]
  },
  "meta": {
    "author": "someone"
  }
}"#;

const BARE: &str = r#"{
  "cw::HapticsProjectSettings": {
    "heavyRumbleDurationMS": 500,
    "heavyRumbleHighFrequency": 0.8
  },
  "engine::WindowProjectSettings": {
    "minSize": {
      "width": 1280,
      "height": 720
    }
  }
}"#;

const NUMBER_FORMS: &str = r#"{
  "cw::AimingProjectSettings": {
    "maxDistance": 2e+3,
    "minDistance": 35.50,
    "aimAssistTargetLockOnTime": 1e-1
  },
  "telemetry": {
    "sessionId": 123456789012345678901234,
    "ratio": 0.30000000000000004,
    "negative": -0.0
  }
}"#;

fn marker_fixture(dead: Value) -> String {
    json!({
        "settings": {
            "cw::hud::battle::VehicleMarkerSettingsSingleton::ProjectSettings": {
                "Vehicle Marker Settings": {
                    "markerSettings": {
                        "allyMarkerSettings": {
                            "markerSettings": {
                                "Dead": dead,
                                "undocumented": {"keep": "me"}
                            }
                        }
                    }
                }
            }
        }
    })
    .to_string()
}

fn saved(session: &EditSession) -> Value {
    serde_json::from_slice(&serialize_for_save(session).unwrap()).unwrap()
}

#[test]
fn test_unedited_save_is_byte_identical() {
    for fixture in [WRAPPED, BARE] {
        let session = load_from_bytes(fixture.as_bytes()).unwrap();
        let bytes = serialize_for_save(&session).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), fixture);
    }
}

#[test]
fn test_number_text_survives_round_trip() {
    let mut session = load_from_bytes(NUMBER_FORMS.as_bytes()).unwrap();
    let bytes = serialize_for_save(&session).unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), NUMBER_FORMS);

    assert_eq!(
        session.get_field(Section::Aiming, "maxDistance").unwrap(),
        FieldValue::Float(2000.0)
    );
    assert_eq!(
        session.get_field(Section::Aiming, "minDistance").unwrap(),
        FieldValue::Float(35.5)
    );

    // An edit rewrites only the edited number
    session
        .set_field(Section::Aiming, "maxDistance", 2500.0)
        .unwrap();
    let text = String::from_utf8(serialize_for_save(&session).unwrap()).unwrap();
    assert!(text.contains("\"maxDistance\": 2500,"), "{}", text);
    assert!(text.contains("\"minDistance\": 35.50,"), "{}", text);
    assert!(text.contains("\"aimAssistTargetLockOnTime\": 1e-1\n"), "{}", text);
    assert!(text.contains("123456789012345678901234"), "{}", text);
}

#[test]
fn test_exponent_spelling_is_canonicalized() {
    let session = load_from_bytes(br#"{"a": 1E2, "b": 5e-3}"#).unwrap();
    let text = String::from_utf8(serialize_for_save(&session).unwrap()).unwrap();
    assert_eq!(text, "{\n  \"a\": 1e+2,\n  \"b\": 5e-3\n}");
}

#[test]
fn test_wrapper_and_siblings_survive_edit() {
    let mut session = load_from_bytes(WRAPPED.as_bytes()).unwrap();
    assert!(session.shape().is_wrapped());
    session
        .set_field(Section::FrameLimiterClient, "frequency", 144.0)
        .unwrap();

    let text = String::from_utf8(serialize_for_save(&session).unwrap()).unwrap();
    let version = text.find("\"version\"").unwrap();
    let settings = text.find("\"settings\"").unwrap();
    let meta = text.find("\"meta\"").unwrap();
    assert!(version < settings && settings < meta);

    let value = saved(&session);
    assert_eq!(value["version"], json!(3));
    assert_eq!(value["meta"], json!({"author": "someone"}));
    assert_eq!(value["settings"]["unknown"], json!([1, "two", null]));
    assert_eq!(
        value["settings"]["FrameLimiterSettings"]["client"]["frequency"],
        json!(144)
    );
    assert_eq!(
        value["settings"]["FrameLimiterSettings"]["inactive client"],
        json!({"frequency": 30, "carriedOverspent": 0.4})
    );
}

#[test]
fn test_missing_section_reads_defaults_without_creating_it() {
    let session = load_from_bytes(BARE.as_bytes()).unwrap();
    for (spec, value) in session.section_fields(Section::Aiming) {
        assert_eq!(value, spec.default, "{}", spec.key);
    }
    assert!(session.document().get(Section::Aiming.path()).is_none());
    assert!(!session.is_modified());
}

#[test]
fn test_writes_clamp_to_bounds() {
    let mut session = load_from_bytes(BARE.as_bytes()).unwrap();
    session.set_field(Section::Aiming, "maxDistance", 1.0).unwrap();
    session.set_field(Section::Aiming, "minDistance", 1000.0).unwrap();
    session
        .set_field(Section::Haptics, "heavyRumbleDurationMS", 5i64)
        .unwrap();
    session.set_field(Section::WindowMinSize, "width", 99_999i64).unwrap();

    let value = saved(&session);
    assert_eq!(value["cw::AimingProjectSettings"]["maxDistance"], json!(100));
    assert_eq!(value["cw::AimingProjectSettings"]["minDistance"], json!(100));
    assert_eq!(value["cw::HapticsProjectSettings"]["heavyRumbleDurationMS"], json!(100));
    assert_eq!(value["engine::WindowProjectSettings"]["minSize"]["width"], json!(3840));
}

#[test]
fn test_invalid_stop_type_leaves_value_unchanged() {
    let mut session = load_from_bytes(WRAPPED.as_bytes()).unwrap();
    session
        .set_field(Section::Aiming, "stopType", "StopByTime")
        .unwrap();

    let err = session
        .set_field(Section::Aiming, "stopType", "StopWhenever")
        .unwrap_err();
    match err {
        EditError::Validation(ValidationError::InvalidEnumValue { key, value, allowed }) => {
            assert_eq!(key, "stopType");
            assert_eq!(value, "StopWhenever");
            assert_eq!(allowed, ["StopByRotation", "StopByDistance", "StopByTime"]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(
        session.get_field(Section::Aiming, "stopType").unwrap(),
        FieldValue::Text("StopByTime".to_string())
    );
}

#[test]
fn test_incomplete_marker_cell_reads_whole_default() {
    let fixture = marker_fixture(json!({
        "opacity": 0.15,
        "isEnabled": false,
        "isHealthBarEnabled": true,
        "isDistanceEnabled": true
    }));
    let session = load_from_bytes(fixture.as_bytes()).unwrap();
    let cell = session.marker_read(Relation::Ally, Lifecycle::Dead);
    assert_eq!(
        cell,
        heat_configurator::core::marker::default_attributes(Relation::Ally, Lifecycle::Dead)
    );
    assert_ne!(cell.opacity, 0.15);
}

#[test]
fn test_marker_write_then_read() {
    let mut session = load_from_bytes(marker_fixture(json!({})).as_bytes()).unwrap();
    let attrs = AttributeSet {
        opacity: 0.25,
        is_enabled: true,
        is_name_enabled: false,
        is_health_bar_enabled: true,
        is_distance_enabled: false,
    };
    session
        .marker_write(Relation::Ally, Lifecycle::Dead, attrs)
        .unwrap();
    assert_eq!(session.marker_read(Relation::Ally, Lifecycle::Dead), attrs);
}

#[test]
fn test_reset_all_drops_undocumented_marker_keys() {
    let fixture = marker_fixture(json!({"opacity": 0.15}));
    let mut session = load_from_bytes(fixture.as_bytes()).unwrap();
    let summary = session.reset_all_to_schema_defaults();
    assert_eq!(summary.relations, vec![Relation::Ally]);

    let value = saved(&session);
    let relations = &value["settings"][MARKER_SECTION]["Vehicle Marker Settings"]["markerSettings"];
    let matrix = &relations["allyMarkerSettings"]["markerSettings"];
    assert!(matrix.get("undocumented").is_none());
    assert_eq!(matrix.as_object().unwrap().len(), Lifecycle::ALL.len());
    assert_eq!(matrix["Dead"]["opacity"], json!(0.5));
    assert!(relations.get("enemyMarkerSettings").is_none());
}

#[test]
fn test_read_passes_through_write_clamps() {
    let mut session =
        load_from_bytes(br#"{"settings":{"cw::AimingProjectSettings":{"maxDistance":9999}}}"#)
            .unwrap();
    assert_eq!(
        session.get_field(Section::Aiming, "maxDistance").unwrap(),
        FieldValue::Float(9999.0)
    );
    assert_eq!(
        session.set_field(Section::Aiming, "maxDistance", 9999.0).unwrap(),
        FieldValue::Float(5000.0)
    );
    assert_eq!(
        saved(&session),
        json!({"settings": {"cw::AimingProjectSettings": {"maxDistance": 5000}}})
    );
}

#[test]
fn test_single_quotes_and_trailing_comma_repaired() {
    let session = load_from_bytes(b"{'stopType': 'StopByRotation',}").unwrap();
    assert_eq!(saved(&session), json!({"stopType": "StopByRotation"}));
    assert_eq!(session.recognition(), Recognition::Unrecognized);
    assert!(!session.shape().is_wrapped());
}

#[test]
fn test_load_errors() {
    assert!(matches!(load_from_bytes(b"[1, 2]"), Err(ParseError::NotAnObject)));
    assert!(matches!(load_from_bytes(b"{oops"), Err(ParseError::Malformed(_))));
    assert!(matches!(load_from_bytes(b""), Err(ParseError::Malformed(_))));
}
