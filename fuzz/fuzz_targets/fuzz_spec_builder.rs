#![no_main]
use libfuzzer_sys::fuzz_target;
use opquery::cluster::{ServerAddress, Topology};
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    if data.len() > 8192 { return; }
    let Ok(s) = std::str::from_utf8(data) else { return };
    // First line is the filter, the rest the options
    let (filter_json, options_json) = s.split_once('\n').unwrap_or((s, "{}"));
    let (Ok(filter), Ok(options)) = (
        opquery::cli::json_to_document(filter_json),
        opquery::cli::json_to_document(options_json),
    ) else { return };
    let topo = if data[0] & 1 == 1 {
        Topology::sharded(vec![ServerAddress::new("r", 27017)])
    } else {
        Topology::single(ServerAddress::new("s", 27017))
    };
    let db = Arc::new(opquery::Database::new("fuzz", Arc::new(topo)));
    let view = db
        .collection("c")
        .find(filter)
        .with_options(opquery::QueryOptions::from_document(options));
    let builder = opquery::OpQueryBuilder::new(&view);
    if let Ok(spec) = builder.specification() {
        assert_eq!(builder.specification().ok(), Some(spec));
    }
});
