use crate::options::{OptionKey, QueryOptions, is_truthy};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::fmt;

/// Cursor flags of the legacy query message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorFlag {
    TailableCursor,
    OplogReplay,
    NoCursorTimeout,
    AwaitData,
    Partial,
}

impl CursorFlag {
    pub const ALL: [Self; 5] = [
        Self::TailableCursor,
        Self::OplogReplay,
        Self::NoCursorTimeout,
        Self::AwaitData,
        Self::Partial,
    ];

    /// Bit of this flag in the OP_QUERY flags word.
    #[must_use]
    pub const fn bit(self) -> u32 {
        match self {
            Self::TailableCursor => 1 << 1,
            Self::OplogReplay => 1 << 3,
            Self::NoCursorTimeout => 1 << 4,
            Self::AwaitData => 1 << 5,
            Self::Partial => 1 << 7,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TailableCursor => "tailable_cursor",
            Self::OplogReplay => "oplog_replay",
            Self::NoCursorTimeout => "no_cursor_timeout",
            Self::AwaitData => "await_data",
            Self::Partial => "partial",
        }
    }
}

impl fmt::Display for CursorFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Option → flags table. One option may raise several flags.
pub static FLAG_MAPPINGS: &[(OptionKey, &[CursorFlag])] = &[
    (OptionKey::AllowPartialResults, &[CursorFlag::Partial]),
    (OptionKey::OplogReplay, &[CursorFlag::OplogReplay]),
    (OptionKey::NoCursorTimeout, &[CursorFlag::NoCursorTimeout]),
    (OptionKey::Tailable, &[CursorFlag::TailableCursor]),
    (OptionKey::TailableAwait, &[CursorFlag::AwaitData, CursorFlag::TailableCursor]),
    (OptionKey::AwaitData, &[CursorFlag::AwaitData]),
];

/// Flags raised by a single option; empty for options outside the table.
#[must_use]
pub fn flags_for(key: OptionKey) -> &'static [CursorFlag] {
    match FLAG_MAPPINGS.iter().find(|(k, _)| *k == key) {
        Some((_, flags)) => *flags,
        None => &[],
    }
}

/// A set of cursor flags stored as the OP_QUERY flags word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CursorFlags(u32);

impl CursorFlags {
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, flag: CursorFlag) {
        self.0 |= flag.bit();
    }

    #[must_use]
    pub const fn contains(self, flag: CursorFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Flags in wire bit order.
    pub fn iter(self) -> impl Iterator<Item = CursorFlag> {
        CursorFlag::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl FromIterator<CursorFlag> for CursorFlags {
    fn from_iter<I: IntoIterator<Item = CursorFlag>>(iter: I) -> Self {
        let mut out = Self::empty();
        for f in iter {
            out.insert(f);
        }
        out
    }
}

impl Serialize for CursorFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for f in self.iter() {
            seq.serialize_element(f.as_str())?;
        }
        seq.end()
    }
}

/// Union of the flags of every truthy option in `options`.
#[must_use]
pub fn map_flags(options: &QueryOptions) -> CursorFlags {
    options
        .recognized()
        .filter(|(_, value)| is_truthy(value))
        .flat_map(|(key, _)| flags_for(key).iter().copied())
        .collect()
}
