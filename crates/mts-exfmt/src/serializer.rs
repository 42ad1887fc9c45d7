//! Stream framing and the per-tag decoder registry.
//!
//! # Layout
//!
//! ```text
//! magic    4 bytes   b"MTSX"
//! version  u16 LE    must equal FORMAT_VERSION
//! count    u32 LE    number of sections
//! count ×  { tag u16 LE, len u32 LE, payload [u8; len] }
//! ```
//!
//! Sections are written in ascending tag order.  A reader accepts any order
//! but rejects a tag it has no decoder for, a repeated tag, and a payload
//! its decoder does not consume exactly.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use log::{debug, info};

use crate::codec::{read_u16, read_u32, write_len, write_u16};
use crate::section::AnySection;
use crate::sections::*;
use crate::{Container, ExfmtError, ExfmtResult, FORMAT_VERSION, MAGIC, Section};

type Decoder = fn(&mut dyn Read) -> ExfmtResult<Box<dyn AnySection>>;

fn decode_boxed<S: Section>(r: &mut dyn Read) -> ExfmtResult<Box<dyn AnySection>> {
    Ok(Box::new(S::decode(r)?))
}

/// Writes containers to, and reads them from, byte streams.
#[derive(Clone)]
pub struct Serializer {
    decoders: HashMap<u16, (&'static str, Decoder)>,
}

impl Default for Serializer {
    /// A serializer that knows every built-in section.
    fn default() -> Self {
        let mut s = Self::empty();
        s.register::<ScenarioMetaInfo>();
        s.register::<ScenarioConfigInfo>();
        s.register::<ScenarioAreaSet>();
        s.register::<ScenarioRouteSet>();
        s.register::<MapSegment>();
        s.register::<StreetGraphSection>();
        s
    }
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A serializer with no decoders; every section must be registered.
    pub fn empty() -> Self {
        Self { decoders: HashMap::new() }
    }

    /// Teach the reader to decode `S`.  Re-registering a tag replaces the
    /// previous decoder.
    pub fn register<S: Section>(&mut self) -> &mut Self {
        self.decoders.insert(S::TAG, (S::NAME, decode_boxed::<S>));
        self
    }

    pub fn knows(&self, tag: u16) -> bool {
        self.decoders.contains_key(&tag)
    }

    // ── Writing ───────────────────────────────────────────────────────────

    /// Write `container` to `w`.
    ///
    /// All payloads are encoded before the first byte is written, so an
    /// encoding error leaves `w` untouched.
    pub fn write(&self, w: &mut dyn Write, container: &Container) -> ExfmtResult<()> {
        let bytes = self.to_bytes(container)?;
        w.write_all(&bytes)?;
        Ok(())
    }

    pub fn to_bytes(&self, container: &Container) -> ExfmtResult<Vec<u8>> {
        if container.version() != FORMAT_VERSION {
            return Err(ExfmtError::UnsupportedVersion {
                found:     container.version(),
                supported: FORMAT_VERSION,
            });
        }
        let sections = container.sections_by_tag();

        let mut out = Vec::new();
        out.extend_from_slice(&MAGIC);
        write_u16(&mut out, FORMAT_VERSION)?;
        write_len(&mut out, sections.len(), "container")?;
        for s in sections {
            let mut payload = Vec::new();
            s.encode_payload(&mut payload)?;
            write_u16(&mut out, s.section_tag())?;
            write_len(&mut out, payload.len(), s.section_name())?;
            out.extend_from_slice(&payload);
            debug!("encoded {} section ({} bytes)", s.section_name(), payload.len());
        }
        Ok(out)
    }

    /// Write `container` to a file, replacing it.
    ///
    /// The file is written in one call from a fully encoded buffer.
    pub fn write_file(&self, path: impl AsRef<Path>, container: &Container) -> ExfmtResult<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes(container)?;
        fs::write(path, &bytes)?;
        info!("wrote {} sections ({} bytes) to {}", container.len(), bytes.len(), path.display());
        Ok(())
    }

    // ── Reading ───────────────────────────────────────────────────────────

    /// Read one container from `r`.
    ///
    /// Either the whole stream decodes or an error is returned; no partial
    /// container is ever produced.
    pub fn read(&self, r: &mut dyn Read) -> ExfmtResult<Container> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(ExfmtError::InvalidMagic);
        }
        let version = read_u16(r)?;
        if version != FORMAT_VERSION {
            return Err(ExfmtError::UnsupportedVersion { found: version, supported: FORMAT_VERSION });
        }

        let count = read_u32(r)?;
        let mut container = Container::with_version(version);
        for _ in 0..count {
            let tag = read_u16(r)?;
            let len = read_u32(r)? as usize;
            let &(name, decode) = self.decoders.get(&tag).ok_or(ExfmtError::UnknownSection { tag })?;

            let mut payload = Vec::new();
            Read::take(&mut *r, len as u64).read_to_end(&mut payload)?;
            if payload.len() != len {
                return Err(ExfmtError::malformed(name, "stream ends inside the section"));
            }

            let mut cursor: &[u8] = &payload;
            let section = decode(&mut cursor).map_err(|e| match e {
                ExfmtError::Io(io) if io.kind() == io::ErrorKind::UnexpectedEof => {
                    ExfmtError::malformed(name, "payload shorter than its contents")
                }
                other => other,
            })?;
            if !cursor.is_empty() {
                return Err(ExfmtError::malformed(name, format!("{} trailing bytes", cursor.len())));
            }

            if container.has_tag(tag) {
                return Err(ExfmtError::malformed(name, "section appears twice"));
            }
            container.set_boxed(section);
        }
        Ok(container)
    }

    pub fn read_bytes(&self, mut bytes: &[u8]) -> ExfmtResult<Container> {
        self.read(&mut bytes)
    }

    pub fn read_file(&self, path: impl AsRef<Path>) -> ExfmtResult<Container> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let container = self.read_bytes(&bytes)?;
        info!("read {} sections ({} bytes) from {}", container.len(), bytes.len(), path.display());
        Ok(container)
    }
}

impl std::fmt::Debug for Serializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.decoders.iter().map(|(tag, (name, _))| (*tag, *name)).collect();
        names.sort_unstable();
        f.debug_struct("Serializer").field("sections", &names).finish()
    }
}
