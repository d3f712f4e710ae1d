use crate::options::{OptionKey, QueryOptions};
use bson::Document;

/// Option → server modifier key table.
pub static MODIFIER_MAPPINGS: &[(OptionKey, &str)] = &[
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

#[must_use]
pub fn modifier_for(key: OptionKey) -> Option<&'static str> {
    MODIFIER_MAPPINGS.iter().find(|(k, _)| *k == key).map(|(_, m)| *m)
}

#[must_use]
pub fn option_for_modifier(modifier: &str) -> Option<OptionKey> {
    MODIFIER_MAPPINGS.iter().find(|(_, m)| *m == modifier).map(|(k, _)| *k)
}

/// Server modifiers carried by `options`, in option order. Values are copied
/// as-is; options without a modifier are skipped.
#[must_use]
pub fn map_server_modifiers(options: &QueryOptions) -> Document {
    let mut out = Document::new();
    for (key, value) in options.recognized() {
        if let Some(name) = modifier_for(key) {
            out.insert(name, value.clone());
        }
    }
    out
}

/// Reverse of [`map_server_modifiers`]: turns `$orderby`-style keys back into
/// driver options. Unknown keys are dropped.
#[must_use]
pub fn map_driver_options(modifiers: &Document) -> QueryOptions {
    let mut out = QueryOptions::new();
    for (name, value) in modifiers {
        if let Some(key) = option_for_modifier(name) {
            out.insert(key, value.clone());
        }
    }
    out
}
