mod test_utils;

use alog::{JsonFormatter, Level, ScopedIndent};
use std::sync::{Arc, Barrier};
use test_utils::{buffer_lines, registry_with_buffer};

const NO_OF_LINES: usize = 50;

#[test]
fn indentation_does_not_leak_between_threads() {
    let (registry, buffer) = registry_with_buffer();
    registry.configure(Level::Debug, "").unwrap();
    registry.set_formatter(JsonFormatter::new());

    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();
    for name in ["alpha", "beta"] {
        let registry = registry.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(std::thread::spawn(move || {
            let ch = registry.channel("WORK");
            let _indent = ScopedIndent::new(&registry);
            barrier.wait();
            for i in 0..NO_OF_LINES {
                ch.debug(format_args!("{name} {i}"));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let lines = buffer_lines(&buffer);
    assert_eq!(lines.len(), 2 * NO_OF_LINES);
    for line in &lines {
        let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(
            parsed["num_indent"], 1,
            "indent leaked across threads: {line}"
        );
    }

    // the scopes ended with their threads; this thread never indented
    assert_eq!(registry.indent_depth(), 0);
    registry.log("WORK", Level::Debug, "main").unwrap();
    let lines = buffer_lines(&buffer);
    let parsed: serde_json::Value = serde_json::from_str(lines.last().unwrap()).unwrap();
    assert_eq!(parsed["num_indent"], 0);
}

#[test]
fn concurrent_emits_do_not_interleave_record_lines() {
    let (registry, buffer) = registry_with_buffer();
    registry.configure(Level::Debug, "").unwrap();

    let barrier = Arc::new(Barrier::new(4));
    let mut handles = Vec::new();
    for t in 0..4 {
        let registry = registry.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(std::thread::spawn(move || {
            barrier.wait();
            for i in 0..NO_OF_LINES {
                // a multi-line record must stay contiguous per sink
                registry
                    .log("WORK", Level::Debug, format_args!("t{t} m{i} a\nt{t} m{i} b"))
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let lines = buffer_lines(&buffer);
    assert_eq!(lines.len(), 2 * 4 * NO_OF_LINES);
    for pair in lines.chunks(2) {
        let first = pair[0].rsplit("] ").next().unwrap();
        let second = pair[1].rsplit("] ").next().unwrap();
        assert_eq!(
            first.strip_suffix(" a"),
            second.strip_suffix(" b"),
            "interleaved record: {pair:?}"
        );
    }
}

#[test]
fn scoped_metadata_is_per_thread() {
    let (registry, buffer) = registry_with_buffer();
    registry.configure(Level::Debug, "").unwrap();
    registry.set_formatter(JsonFormatter::new());
    registry.enable_metadata();

    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();
    for name in ["alpha", "beta"] {
        let registry = registry.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(std::thread::spawn(move || {
            let ch = registry.channel("WORK");
            let _md = ch.scoped_metadata("owner", serde_json::json!(name));
            barrier.wait();
            for _ in 0..NO_OF_LINES {
                ch.debug(name);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    for line in buffer_lines(&buffer) {
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["owner"], parsed["message"], "wrong owner: {line}");
    }
}
