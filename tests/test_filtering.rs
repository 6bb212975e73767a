mod test_utils;

use alog::Level;
use std::sync::atomic::{AtomicUsize, Ordering};
use test_utils::{buffer_lines, registry_with_buffer};

#[test]
fn filter_overrides_and_default_level() {
    let (registry, buffer) = registry_with_buffer();
    registry.configure(Level::Info, "TEST:debug").unwrap();

    registry.log("TEST", Level::Debug, "hello").unwrap();
    registry.log("OTHER", Level::Debug, "hidden").unwrap();

    let lines = buffer_lines(&buffer);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("TEST"));
    assert!(lines[0].contains("DBUG"));
    assert!(lines[0].contains("hello"));
    assert!(!lines[0].contains("hidden"));
}

#[test]
fn unknown_channels_behave_like_the_default() {
    let (registry, _buffer) = registry_with_buffer();
    registry.configure(Level::Warning, "").unwrap();

    // every channel without an override answers exactly like the default
    for channel in ["A", "B", "ANYTHING"] {
        for level in Level::ALL.into_iter().skip(1) {
            assert_eq!(
                registry.is_enabled(channel, level),
                Level::Warning >= level,
                "channel {channel}, level {level}"
            );
        }
    }
}

#[test]
fn override_is_independent_of_the_default() {
    let (registry, _buffer) = registry_with_buffer();

    for default in [Level::Off, Level::Error, Level::Debug4] {
        registry.configure(default, "FIXED:info").unwrap();
        for level in Level::ALL.into_iter().skip(1) {
            assert_eq!(
                registry.is_enabled("FIXED", level),
                Level::Info >= level,
                "default {default}, level {level}"
            );
        }
    }
}

#[test]
fn emission_does_not_add_filter_entries() {
    let (registry, _buffer) = registry_with_buffer();
    registry.configure(Level::Info, "A:debug").unwrap();

    registry.log("UNSEEN", Level::Info, "x").unwrap();
    assert!(!registry.is_enabled("UNSEEN", Level::Debug));
    assert_eq!(registry.spec().channel_filters().len(), 1);
}

#[test]
fn disabled_levels_do_not_evaluate_the_generator() {
    let (registry, buffer) = registry_with_buffer();
    registry.configure(Level::Info, "").unwrap();

    let calls = AtomicUsize::new(0);
    let expensive = || {
        calls.fetch_add(1, Ordering::SeqCst);
        "expensive".to_string()
    };

    registry.log_with("TEST", Level::Debug, expensive).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(buffer_lines(&buffer).is_empty());

    let expensive = || {
        calls.fetch_add(1, Ordering::SeqCst);
        "expensive".to_string()
    };
    registry.log_with("TEST", Level::Info, expensive).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(buffer_lines(&buffer).len(), 1);
}

#[test]
fn channel_handle_forwards_its_channel() {
    let (registry, buffer) = registry_with_buffer();
    registry.configure(Level::Trace, "").unwrap();
    let ch = registry.channel("NET");

    assert!(ch.is_enabled(Level::Trace));
    assert!(!ch.is_enabled(Level::Debug));

    ch.info("up");
    ch.debug("suppressed");
    ch.error(format_args!("code {}", 7));

    let lines = buffer_lines(&buffer);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("[NET  :INFO]"));
    assert!(lines[1].contains("[NET  :ERRR]"));
    assert!(lines[1].contains("code 7"));
}

#[test]
fn reconfigure_replaces_spec_atomically() {
    let (registry, _buffer) = registry_with_buffer();
    registry.configure(Level::Info, "A:debug,B:trace").unwrap();
    registry.configure(Level::Error, "C:debug").unwrap();

    // old overrides are gone, not merged
    assert!(!registry.is_enabled("A", Level::Debug));
    assert!(!registry.is_enabled("B", Level::Trace));
    assert!(registry.is_enabled("C", Level::Debug));
    assert_eq!(registry.spec().default_level(), Level::Error);
}

#[test]
fn reset_restores_the_initial_state() {
    let (registry, _buffer) = registry_with_buffer();
    registry.configure(Level::Debug4, "A:info").unwrap();
    registry.set_service_name("svc");
    registry.enable_thread_id();

    registry.reset();

    assert_eq!(registry.spec().default_level(), Level::Off);
    assert!(registry.spec().channel_filters().is_empty());
    for level in Level::ALL {
        assert!(!registry.is_enabled("A", level));
    }
}
