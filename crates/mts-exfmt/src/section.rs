//! The `Section` trait and its type-erased form.

use std::any::{Any, TypeId};
use std::io::{Read, Write};

use crate::ExfmtResult;

/// One independently present part of a container.
///
/// `TAG` identifies the section in a stream and must never change once
/// files exist.  `encode` writes only the payload; framing (tag and length)
/// is the serializer's job.
pub trait Section: Send + Sync + Sized + 'static {
    const TAG: u16;

    /// Human-readable name used in errors and logs.
    const NAME: &'static str;

    fn encode(&self, w: &mut dyn Write) -> ExfmtResult<()>;

    fn decode(r: &mut dyn Read) -> ExfmtResult<Self>;
}

/// Object-safe view of any [`Section`] so a container can hold different
/// section types side by side.
///
/// Sealed: the blanket impl over `Section` is the only implementation.
pub trait AnySection: Send + Sync + sealed::Sealed {
    fn section_tag(&self) -> u16;

    fn section_name(&self) -> &'static str;

    fn encode_payload(&self, w: &mut dyn Write) -> ExfmtResult<()>;

    /// `TypeId` of the concrete section type.
    fn section_type(&self) -> TypeId;

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;

    #[doc(hidden)]
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

mod sealed {
    pub trait Sealed {}
}

impl<S: Section> sealed::Sealed for S {}

impl<S: Section> AnySection for S {
    fn section_tag(&self) -> u16 {
        S::TAG
    }

    fn section_name(&self) -> &'static str {
        S::NAME
    }

    fn encode_payload(&self, w: &mut dyn Write) -> ExfmtResult<()> {
        self.encode(w)
    }

    fn section_type(&self) -> TypeId {
        TypeId::of::<S>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
