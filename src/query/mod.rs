// Legacy query (OP_QUERY) specification building
mod builder;
pub mod flags;
pub mod modifiers;
mod spec;
pub mod trace;

pub use builder::{OpQueryBuilder, build_specification};
pub use flags::{CursorFlag, CursorFlags, map_flags};
pub use modifiers::{map_driver_options, map_server_modifiers};
pub use spec::{QuerySpec, SpecOptions};
pub use trace::{BuildTrace, TraceCapture};
