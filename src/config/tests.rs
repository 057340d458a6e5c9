use super::loading::load_geo_override_from_path;
use super::*;
use crate::interval::IntervalMode;
use crate::window::Reference;
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

fn root_entry(name: &str, start: &str, end: &str) -> IntervalEntry {
    IntervalEntry {
        name: name.to_string(),
        start: Some(start.to_string()),
        end: Some(end.to_string()),
        ..Default::default()
    }
}

fn child_entry(name: &str, parent: &str) -> IntervalEntry {
    IntervalEntry {
        name: name.to_string(),
        parent: Some(parent.to_string()),
        ..Default::default()
    }
}

fn config_with(intervals: Vec<IntervalEntry>) -> Config {
    Config {
        intervals,
        ..Default::default()
    }
}

#[test]
fn test_parse_full_config() {
    let config = Config::from_toml_str(
        r#"
timezone = "Europe/London"
latitude = 51.5
longitude = -0.12

[[interval]]
name = "Night"
start = "sunset"
end = "06:00"
timezone = "Europe/Berlin"
end_offset = 600

[[interval]]
name = "Wind down"
parent = "Night"
start_ref = "start"
start_offset = -1800
end_ref = "start"
"#,
    )
    .unwrap();

    assert_eq!(config.default_timezone().unwrap(), chrono_tz::Europe::London);
    assert!(config.solar().unwrap().is_some());

    let intervals = config.interval_configs().unwrap();
    assert_eq!(intervals.len(), 2);

    match &intervals[0].mode {
        IntervalMode::Root(root) => {
            assert!(root.uses_solar_events());
            assert_eq!(root.timezone.as_deref(), Some("Europe/Berlin"));
            assert_eq!(root.end_offset, chrono::Duration::seconds(600));
        }
        other => panic!("expected root, got {other:?}"),
    }
    match &intervals[1].mode {
        IntervalMode::Child(child) => {
            assert_eq!(child.parent, "Night");
            assert_eq!(child.start_ref, Reference::ParentStart);
            assert_eq!(child.end_ref, Reference::ParentStart);
            assert_eq!(child.start_offset, chrono::Duration::seconds(-1800));
        }
        other => panic!("expected child, got {other:?}"),
    }
}

#[test]
fn test_defaults() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config.default_timezone().unwrap(), chrono_tz::UTC);
    assert!(config.solar().unwrap().is_none());
    assert!(config.interval_configs().unwrap().is_empty());
}

#[test]
fn test_child_refs_default_to_mirroring_parent() {
    let config = config_with(vec![
        root_entry("Work", "09:00", "17:00"),
        child_entry("Mirror", "Work"),
    ]);
    validate_config(&config).unwrap();

    let intervals = config.interval_configs().unwrap();
    let IntervalMode::Child(child) = &intervals[1].mode else {
        panic!("expected child");
    };
    assert_eq!(child.start_ref, Reference::ParentStart);
    assert_eq!(child.end_ref, Reference::ParentEnd);
}

#[test]
fn test_unknown_fields_rejected() {
    let result = Config::from_toml_str(
        r#"
[[interval]]
name = "Work"
start = "09:00"
end = "17:00"
colour = "blue"
"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_validation_rejects_duplicate_names() {
    let config = config_with(vec![
        root_entry("Work", "09:00", "17:00"),
        root_entry("Work", "10:00", "11:00"),
    ]);
    let err = validate_config(&config).unwrap_err();
    assert!(err.to_string().contains("Duplicate"));
}

#[test]
fn test_validation_rejects_empty_name() {
    let config = config_with(vec![root_entry("  ", "09:00", "17:00")]);
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_validation_rejects_bad_times() {
    for (start, end) in [("25:00", "06:00"), ("noon", "06:00"), ("09:00", "17:60")] {
        let config = config_with(vec![root_entry("Bad", start, end)]);
        assert!(
            validate_config(&config).is_err(),
            "{start}..{end} should be rejected"
        );
    }
}

#[test]
fn test_validation_rejects_missing_root_boundary() {
    let mut entry = root_entry("Work", "09:00", "17:00");
    entry.end = None;
    assert!(validate_config(&config_with(vec![entry])).is_err());
}

#[test]
fn test_validation_rejects_unknown_timezones() {
    let mut entry = root_entry("Work", "09:00", "17:00");
    entry.timezone = Some("Mars/Olympus_Mons".to_string());
    assert!(validate_config(&config_with(vec![entry])).is_err());

    let config = Config {
        timezone: Some("Nowhere/Special".to_string()),
        ..Default::default()
    };
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_validation_rejects_bad_parents() {
    // Missing parent
    let config = config_with(vec![child_entry("Orphan", "Nobody")]);
    assert!(validate_config(&config).is_err());

    // Child of a child
    let config = config_with(vec![
        root_entry("Work", "09:00", "17:00"),
        child_entry("Mirror", "Work"),
        child_entry("Nested", "Mirror"),
    ]);
    let err = validate_config(&config).unwrap_err();
    assert!(format!("{err:#}").contains("not a root interval"));

    // Self reference
    let config = config_with(vec![child_entry("Loop", "Loop")]);
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_validation_rejects_mixed_fields() {
    let mut child = child_entry("Mirror", "Work");
    child.start = Some("10:00".to_string());
    let config = config_with(vec![root_entry("Work", "09:00", "17:00"), child]);
    assert!(validate_config(&config).is_err());

    let mut root = root_entry("Work", "09:00", "17:00");
    root.start_ref = Some("end".to_string());
    assert!(validate_config(&config_with(vec![root])).is_err());

    let mut child = child_entry("Mirror", "Work");
    child.end_ref = Some("middle".to_string());
    let config = config_with(vec![root_entry("Work", "09:00", "17:00"), child]);
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_validation_rejects_out_of_range_offsets() {
    let err = Config::from_toml_str(
        r#"
[[interval]]
name = "Work"
start = "09:00"
end = "17:00"
start_offset = 9223372036854775807
"#,
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("start_offset"));

    let mut child = child_entry("Later", "Work");
    child.end_offset = 10_000_000_000_000;
    let config = config_with(vec![root_entry("Work", "09:00", "17:00"), child]);
    let err = validate_config(&config).unwrap_err();
    assert!(format!("{err:#}").contains("out of range"));

    // A full year either way is still accepted
    let mut root = root_entry("Work", "09:00", "17:00");
    root.start_offset = -366 * 86_400;
    root.end_offset = 366 * 86_400;
    assert!(validate_config(&config_with(vec![root])).is_ok());
}

#[test]
fn test_validation_coordinates() {
    let mut config = config_with(vec![root_entry("Evening", "sunset", "23:00")]);
    assert!(
        validate_config(&config).is_err(),
        "solar boundaries need coordinates"
    );

    config.latitude = Some(51.5);
    assert!(validate_config(&config).is_err(), "longitude missing");

    config.longitude = Some(-0.12);
    assert!(validate_config(&config).is_ok());

    config.latitude = Some(91.0);
    assert!(validate_config(&config).is_err());

    config.latitude = Some(45.0);
    config.longitude = Some(-181.0);
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_load_from_path_missing_file() {
    let temp_dir = tempdir().unwrap();
    assert!(load_from_path(&temp_dir.path().join("absent.toml")).is_err());
}

#[test]
fn test_load_from_path_with_geo_override() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join(crate::constants::CONFIG_FILE_NAME);
    fs::write(
        &config_path,
        r#"
latitude = 10.0
longitude = 10.0

[[interval]]
name = "Daylight"
start = "sunrise"
end = "sunset"
"#,
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("geo.toml"),
        "latitude = 40.7128\nlongitude = -74.0060\n",
    )
    .unwrap();

    let config = load_from_path(&config_path).unwrap();
    assert_eq!(config.latitude, Some(40.7128));
    assert_eq!(config.longitude, Some(-74.0060));
}

#[test]
fn test_malformed_geo_override_is_ignored() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join(crate::constants::CONFIG_FILE_NAME);
    fs::write(temp_dir.path().join("geo.toml"), "latitude = [oops").unwrap();

    let mut config = Config {
        latitude: Some(1.0),
        longitude: Some(2.0),
        ..Default::default()
    };
    load_geo_override_from_path(&mut config, &config_path);
    assert_eq!(config.latitude, Some(1.0));
    assert_eq!(config.longitude, Some(2.0));
}

#[test]
fn test_default_config_is_valid() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("nested").join("tzwindow.toml");
    create_default_config(&path).unwrap();

    let config = load_from_path(&path).unwrap();
    let intervals = config.interval_configs().unwrap();
    assert_eq!(intervals.len(), 2);
    assert!(intervals[1].mode.is_child());
}

#[test]
#[serial]
fn test_config_load_default_creation() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("tzwindow").join("tzwindow.toml");

    let original = std::env::var("XDG_CONFIG_HOME").ok();
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    let result = load();

    unsafe {
        match original {
            Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }

    let config = result.unwrap();
    assert!(config_path.exists());
    assert!(!config.intervals.is_empty());
}
