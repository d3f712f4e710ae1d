use bson::{Bson, doc};
use opquery::options::{OptionKey, QueryOptions};
use opquery::query::flags::{FLAG_MAPPINGS, flags_for};
use opquery::query::modifiers::{MODIFIER_MAPPINGS, modifier_for};
use opquery::query::{CursorFlag, CursorFlags, map_driver_options, map_flags, map_server_modifiers};

#[test]
fn flag_table_entries() {
    assert_eq!(flags_for(OptionKey::AllowPartialResults), &[CursorFlag::Partial]);
    assert_eq!(flags_for(OptionKey::Tailable), &[CursorFlag::TailableCursor]);
    assert_eq!(
        flags_for(OptionKey::TailableAwait),
        &[CursorFlag::AwaitData, CursorFlag::TailableCursor]
    );
    assert!(flags_for(OptionKey::Sort).is_empty());
    assert_eq!(FLAG_MAPPINGS.len(), 6);
}

#[test]
fn flags_are_a_union_without_duplicates() {
    let opts = QueryOptions::new()
        .with(OptionKey::AwaitData, true)
        .with(OptionKey::TailableAwait, true)
        .with(OptionKey::Tailable, true);
    let flags = map_flags(&opts);
    assert_eq!(flags.len(), 2);
    assert!(flags.contains(CursorFlag::AwaitData));
    assert!(flags.contains(CursorFlag::TailableCursor));
}

#[test]
fn flag_bits_match_the_wire_layout() {
    let all: CursorFlags = CursorFlag::ALL.into_iter().collect();
    assert_eq!(all.bits(), 2 | 8 | 16 | 32 | 128);
    let opts = QueryOptions::new()
        .with(OptionKey::OplogReplay, true)
        .with(OptionKey::NoCursorTimeout, 1);
    assert_eq!(map_flags(&opts).bits(), 8 | 16);
}

#[test]
fn unrecognized_options_raise_no_flags() {
    let opts = QueryOptions::from_document(doc! { "exhaust": true, "slave_ok": true, "limit": 3 });
    assert!(map_flags(&opts).is_empty());
}

#[test]
fn modifier_table_covers_every_wire_key() {
    let expected = [
        (OptionKey::Sort, "$orderby"),
        (OptionKey::Hint, "$hint"),
        (OptionKey::Comment, "$comment"),
        (OptionKey::Snapshot, "$snapshot"),
        (OptionKey::MaxScan, "$maxScan"),
        (OptionKey::MaxValue, "$max"),
        (OptionKey::MinValue, "$min"),
        (OptionKey::MaxTimeMs, "$maxTimeMS"),
        (OptionKey::ReturnKey, "$returnKey"),
        (OptionKey::ShowDiskLoc, "$showDiskLoc"),
        (OptionKey::Explain, "$explain"),
    ];
    assert_eq!(MODIFIER_MAPPINGS.len(), expected.len());
    for (key, wire) in expected {
        assert_eq!(modifier_for(key), Some(wire));
    }
    assert_eq!(modifier_for(OptionKey::Limit), None);
}

#[test]
fn modifiers_keep_values_and_order() {
    let opts = QueryOptions::new()
        .with(OptionKey::MaxValue, doc! { "age": 60 })
        .with(OptionKey::Skip, 2)
        .with(OptionKey::MinValue, doc! { "age": 18 })
        .with(OptionKey::Snapshot, true);
    assert_eq!(
        map_server_modifiers(&opts),
        doc! { "$max": { "age": 60 }, "$min": { "age": 18 }, "$snapshot": true }
    );
}

#[test]
fn modifier_mapping_is_repeatable() {
    let opts = QueryOptions::new().with(OptionKey::Sort, doc! { "a": -1 });
    assert_eq!(map_server_modifiers(&opts), map_server_modifiers(&opts));
    assert_eq!(map_flags(&opts), map_flags(&opts));
}

#[test]
fn driver_options_reverse_the_modifiers() {
    let modifiers = doc! { "$orderby": { "a": 1 }, "$maxScan": 100, "$bogus": 1 };
    let opts = map_driver_options(&modifiers);
    assert_eq!(opts.get(OptionKey::Sort), Some(&Bson::Document(doc! { "a": 1 })));
    assert_eq!(opts.get(OptionKey::MaxScan), Some(&Bson::Int32(100)));
    assert_eq!(opts.len(), 2);
    assert_eq!(map_server_modifiers(&opts), doc! { "$orderby": { "a": 1 }, "$maxScan": 100 });
}
