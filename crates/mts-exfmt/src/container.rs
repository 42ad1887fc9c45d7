//! Versioned bag of sections, keyed by section type.
//!
//! ```rust,ignore
//! let mut c = Container::new();
//! c.set(ScenarioAreaSet { areas });
//! assert!(c.contains::<ScenarioAreaSet>());
//! let areas = c.get::<ScenarioAreaSet>().unwrap();
//! ```

use std::any::TypeId;
use std::collections::HashMap;

use crate::section::AnySection;
use crate::{FORMAT_VERSION, Section};

/// A version number plus at most one section of each type.
///
/// Containers are per-operation values: an injector fills one, the
/// serializer writes it, a read produces a fresh one.
pub struct Container {
    version:  u16,
    sections: HashMap<TypeId, Box<dyn AnySection>>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// An empty container at the current [`FORMAT_VERSION`].
    pub fn new() -> Self {
        Self::with_version(FORMAT_VERSION)
    }

    pub fn with_version(version: u16) -> Self {
        Self { version, sections: HashMap::new() }
    }

    #[inline]
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Insert `section`, replacing any section of the same type.
    pub fn set<S: Section>(&mut self, section: S) {
        self.sections.insert(TypeId::of::<S>(), Box::new(section));
    }

    pub(crate) fn set_boxed(&mut self, section: Box<dyn AnySection>) {
        self.sections.insert(section.section_type(), section);
    }

    pub fn get<S: Section>(&self) -> Option<&S> {
        self.sections
            .get(&TypeId::of::<S>())
            .and_then(|s| s.as_any().downcast_ref::<S>())
    }

    /// Remove and return the section of type `S`.
    pub fn take<S: Section>(&mut self) -> Option<S> {
        let boxed = self.sections.remove(&TypeId::of::<S>())?;
        boxed.into_any().downcast::<S>().ok().map(|b| *b)
    }

    pub fn contains<S: Section>(&self) -> bool {
        self.sections.contains_key(&TypeId::of::<S>())
    }

    /// Number of sections present.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub(crate) fn has_tag(&self, tag: u16) -> bool {
        self.sections.values().any(|s| s.section_tag() == tag)
    }

    /// Sections in ascending tag order, which is the order they are written.
    pub(crate) fn sections_by_tag(&self) -> Vec<&dyn AnySection> {
        let mut out: Vec<&dyn AnySection> = self.sections.values().map(|s| s.as_ref()).collect();
        out.sort_by_key(|s| s.section_tag());
        out
    }

    /// Names of the sections present, in tag order.
    pub fn section_names(&self) -> Vec<&'static str> {
        self.sections_by_tag().into_iter().map(|s| s.section_name()).collect()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("version", &self.version)
            .field("sections", &self.section_names())
            .finish()
    }
}
