use crate::errors::DbError;
use crate::options::OptionKey;
use crate::read_preference::ReadPreference;
use crate::view::QueryView;
use bson::{Document, doc};
use once_cell::sync::OnceCell;

use super::flags::map_flags;
use super::modifiers::map_server_modifiers;
use super::spec::{QuerySpec, SpecOptions};
use super::trace::{self, BuildTrace};

/// Turns a [`QueryView`] into a legacy query specification.
///
/// Server modifiers are extracted once, when the builder is created. Topology,
/// names and flags are read again on every [`specification`](Self::specification)
/// call. The router form of the read preference is memoized after the first
/// successful formatting.
pub struct OpQueryBuilder<'a, V: QueryView + ?Sized> {
    view: &'a V,
    modifiers: Document,
    read_formatted: OnceCell<Option<Document>>,
}

impl<'a, V: QueryView + ?Sized> OpQueryBuilder<'a, V> {
    pub fn new(view: &'a V) -> Self {
        let modifiers = map_server_modifiers(view.options());
        Self { view, modifiers, read_formatted: OnceCell::new() }
    }

    #[must_use]
    pub fn modifiers(&self) -> &Document {
        &self.modifiers
    }

    /// # Errors
    /// Propagates topology and read-preference errors unchanged.
    pub fn specification(&self) -> Result<QuerySpec, DbError> {
        let read = self.view.read();
        let wrapped = self.requires_special_filter()?;
        let (selector, read_sent) = if wrapped {
            self.special_filter(read.as_ref())?
        } else {
            (self.view.filter().clone(), false)
        };
        let spec = QuerySpec {
            selector,
            wrapped,
            read,
            options: self.query_options(),
            db_name: self.view.database_name(),
            coll_name: self.view.collection_name(),
        };
        log::debug!(
            "built query spec for {} (wrapped: {}, modifiers: {}, flags: {:#x})",
            spec.namespace(),
            wrapped,
            self.modifiers.len(),
            spec.options.flags.bits()
        );
        trace::record(BuildTrace {
            namespace: spec.namespace(),
            wrapped,
            modifiers: self.modifiers.keys().cloned().collect(),
            flags: spec.options.flags.bits(),
            read_preference_sent: read_sent,
        });
        Ok(spec)
    }

    /// Wrapping is needed when there are modifiers to carry or a router will
    /// read the query. Topology is only consulted when there are no modifiers.
    ///
    /// # Errors
    /// Propagates a topology that cannot tell whether it is sharded.
    pub fn requires_special_filter(&self) -> Result<bool, DbError> {
        if !self.modifiers.is_empty() {
            return Ok(true);
        }
        self.view.cluster().is_sharded()
    }

    // Memoized for the life of this builder.
    fn read_pref_formatted(&self, read: Option<&ReadPreference>) -> Result<Option<&Document>, DbError> {
        let Some(read) = read else {
            return Ok(None);
        };
        self.read_formatted.get_or_try_init(|| read.to_router_form()).map(Option::as_ref)
    }

    fn special_filter(&self, read: Option<&ReadPreference>) -> Result<(Document, bool), DbError> {
        let mut selector = doc! { "$query": self.view.filter().clone() };
        for (key, value) in &self.modifiers {
            selector.insert(key.clone(), value.clone());
        }
        let formatted = self.read_pref_formatted(read)?;
        if let Some(read) = formatted {
            selector.insert("$readPreference", read.clone());
        }
        Ok((selector, formatted.is_some()))
    }

    fn query_options(&self) -> SpecOptions {
        let options = self.view.options();
        SpecOptions {
            projection: options.get(OptionKey::Projection).cloned(),
            skip: options.get(OptionKey::Skip).cloned(),
            limit: options.get(OptionKey::Limit).cloned(),
            flags: map_flags(options),
            batch_size: options.get(OptionKey::BatchSize).cloned(),
        }
    }
}

/// Builds the specification for `view` in one step.
///
/// # Errors
/// See [`OpQueryBuilder::specification`].
pub fn build_specification<V: QueryView + ?Sized>(view: &V) -> Result<QuerySpec, DbError> {
    OpQueryBuilder::new(view).specification()
}
