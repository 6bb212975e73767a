use alog::writers::{BufferWriter, Snapshot};
use alog::Level;
use std::sync::Arc;

// The process-wide instance is shared state, so this binary exercises it in
// a single test; everything else runs on explicit registries.
#[test]
fn global_convenience_functions_share_one_registry() {
    let buffer = BufferWriter::new(100_000);
    alog::LogRegistry::global().set_sink(Arc::new(buffer.clone()));
    alog::configure(Level::Info, "STORE:debug").unwrap();

    let store = alog::use_channel("STORE");
    let other = alog::use_channel("OTHER");
    assert!(store.is_enabled(Level::Debug));
    assert!(!other.is_enabled(Level::Debug));

    store.debug("visible");
    other.debug("filtered");

    let mut snapshot = Snapshot::new();
    buffer.update_snapshot(&mut snapshot);
    assert!(snapshot.text.contains("visible"));
    assert!(!snapshot.text.contains("filtered"));

    alog::reset();
    assert_eq!(
        alog::LogRegistry::global().spec().default_level(),
        Level::Off
    );
    // reset dropped the buffer sink along with the rest of the state
    store.info("to stderr now");
    buffer.update_snapshot(&mut snapshot);
    assert!(!snapshot.text.contains("to stderr now"));
}
