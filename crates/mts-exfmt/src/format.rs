//! Injector / extractor registries and the per-operation manipulator.
//!
//! # Design
//!
//! An [`Injector<T>`] turns a domain value `T` into container sections; an
//! [`Extractor<T>`] rebuilds a `T` from them.  Both are registered on an
//! [`ExchangeFormat`] keyed by `TypeId::of::<T>()`, stored type-erased and
//! downcast on use, the same way component arrays are kept per type.
//!
//! ```rust,ignore
//! let fmt = ExchangeFormat::new();
//! let mut m = fmt.manipulator();
//! m.inject(&graph)?.inject(&scenario)?;
//! fmt.serializer().write_file("city.mtsx", m.container())?;
//!
//! let c = fmt.serializer().read_file("city.mtsx")?;
//! let scenario: AreaScenario = fmt.manipulator_for(c).extract()?;
//! ```

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;

use crate::adapters::{AreaScenarioExtractor, AreaScenarioInjector, StreetGraphExtractor, StreetGraphInjector};
use crate::{Container, ExfmtError, ExfmtResult, Serializer};

// ── Type-keyed storage ────────────────────────────────────────────────────────

#[derive(Default)]
struct TypeMap {
    map: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl TypeMap {
    fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        self.map.insert(TypeId::of::<T>(), Box::new(value));
    }

    fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.map.get(&TypeId::of::<T>()).and_then(|b| b.downcast_ref::<T>())
    }

    fn get_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.map.get_mut(&TypeId::of::<T>()).and_then(|b| b.downcast_mut::<T>())
    }

    fn remove<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        let boxed = self.map.remove(&TypeId::of::<T>())?;
        boxed.downcast::<T>().ok().map(|b| *b)
    }

    fn contains<T: 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }
}

// ── ExfmtConfig ───────────────────────────────────────────────────────────────

/// Options for injectors and extractors, one entry per entry type.
///
/// Every entry type has a `Default`, so adapters read their options with
/// [`get_or_default`](Self::get_or_default) and an empty config is valid.
#[derive(Default)]
pub struct ExfmtConfig {
    entries: TypeMap,
}

impl ExfmtConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `entry`, replacing any entry of the same type.
    pub fn set<T: Send + Sync + 'static>(&mut self, entry: T) -> &mut Self {
        self.entries.insert(entry);
        self
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.entries.get::<T>()
    }

    pub fn get_or_default<T: Default + Clone + Send + Sync + 'static>(&self) -> T {
        self.get::<T>().cloned().unwrap_or_default()
    }
}

// ── Context ───────────────────────────────────────────────────────────────────

/// Scratch state shared by the adapters of one manipulator.
///
/// Extractors leave intermediate results here for later ones, e.g. the
/// graph extracted for a scenario as `Arc<StreetGraph>`.  Callers may also
/// pre-seed it, for instance with a graph already in memory.
#[derive(Default)]
pub struct Context {
    entries: TypeMap,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: Send + Sync + 'static>(&mut self, value: T) -> &mut Self {
        self.entries.insert(value);
        self
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.entries.get::<T>()
    }

    pub fn get_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.entries.get_mut::<T>()
    }

    pub fn take<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.entries.remove::<T>()
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains::<T>()
    }
}

// ── Adapter traits ────────────────────────────────────────────────────────────

/// Writes a `T` into container sections.
pub trait Injector<T>: Send + Sync {
    fn inject(&self, fmt: &ExchangeFormat, ctx: &mut Context, dst: &mut Container, src: &T) -> ExfmtResult<()>;
}

/// Rebuilds a `T` from container sections.
pub trait Extractor<T>: Send + Sync {
    fn extract(&self, fmt: &ExchangeFormat, ctx: &mut Context, src: &Container) -> ExfmtResult<T>;
}

// ── ExchangeFormat ────────────────────────────────────────────────────────────

/// Configuration, serializer and adapter registries in one place.
///
/// `ExchangeFormat::new()` knows every built-in section and has adapters
/// for `StreetGraph` and `AreaScenario`; `empty()` starts with none.
pub struct ExchangeFormat {
    config:     ExfmtConfig,
    serializer: Serializer,
    injectors:  HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    extractors: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Default for ExchangeFormat {
    fn default() -> Self {
        let mut fmt = Self::empty();
        fmt.serializer = Serializer::new();
        fmt.register_injector(StreetGraphInjector)
            .register_extractor(StreetGraphExtractor)
            .register_injector(AreaScenarioInjector)
            .register_extractor(AreaScenarioExtractor);
        fmt
    }
}

impl ExchangeFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        Self {
            config:     ExfmtConfig::new(),
            serializer: Serializer::empty(),
            injectors:  HashMap::new(),
            extractors: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ExfmtConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ExfmtConfig {
        &mut self.config
    }

    pub fn serializer(&self) -> &Serializer {
        &self.serializer
    }

    pub fn serializer_mut(&mut self) -> &mut Serializer {
        &mut self.serializer
    }

    // ── Registration ──────────────────────────────────────────────────────

    pub fn register_injector<T: 'static>(&mut self, injector: impl Injector<T> + 'static) -> &mut Self {
        let boxed: Box<dyn Injector<T>> = Box::new(injector);
        self.injectors.insert(TypeId::of::<T>(), Box::new(boxed));
        self
    }

    pub fn register_extractor<T: 'static>(&mut self, extractor: impl Extractor<T> + 'static) -> &mut Self {
        let boxed: Box<dyn Extractor<T>> = Box::new(extractor);
        self.extractors.insert(TypeId::of::<T>(), Box::new(boxed));
        self
    }

    fn injector<T: 'static>(&self) -> Option<&dyn Injector<T>> {
        self.injectors
            .get(&TypeId::of::<T>())
            .and_then(|b| b.downcast_ref::<Box<dyn Injector<T>>>())
            .map(|b| b.as_ref())
    }

    fn extractor<T: 'static>(&self) -> Option<&dyn Extractor<T>> {
        self.extractors
            .get(&TypeId::of::<T>())
            .and_then(|b| b.downcast_ref::<Box<dyn Extractor<T>>>())
            .map(|b| b.as_ref())
    }

    // ── Use ───────────────────────────────────────────────────────────────

    /// Run the injector registered for `T`.
    pub fn inject<T: 'static>(&self, ctx: &mut Context, dst: &mut Container, src: &T) -> ExfmtResult<()> {
        let injector = self
            .injector::<T>()
            .ok_or(ExfmtError::MissingInjector(type_name::<T>()))?;
        injector.inject(self, ctx, dst, src)
    }

    /// Run the extractor registered for `T`.
    pub fn extract<T: 'static>(&self, ctx: &mut Context, src: &Container) -> ExfmtResult<T> {
        let extractor = self
            .extractor::<T>()
            .ok_or(ExfmtError::MissingExtractor(type_name::<T>()))?;
        extractor.extract(self, ctx, src)
    }

    /// A manipulator over a new, empty container.
    pub fn manipulator(&self) -> Manipulator<'_> {
        self.manipulator_for(Container::new())
    }

    /// A manipulator over an existing container, e.g. one just read.
    pub fn manipulator_for(&self, container: Container) -> Manipulator<'_> {
        Manipulator { fmt: self, ctx: Context::new(), container }
    }
}

// ── Manipulator ───────────────────────────────────────────────────────────────

/// One container plus one context, bound to a format for a single
/// inject or extract session.
pub struct Manipulator<'a> {
    fmt:       &'a ExchangeFormat,
    ctx:       Context,
    container: Container,
}

impl<'a> Manipulator<'a> {
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn into_container(self) -> Container {
        self.container
    }

    pub fn inject<T: 'static>(&mut self, src: &T) -> ExfmtResult<&mut Self> {
        self.fmt.inject(&mut self.ctx, &mut self.container, src)?;
        Ok(self)
    }

    pub fn extract<T: 'static>(&mut self) -> ExfmtResult<T> {
        self.fmt.extract(&mut self.ctx, &self.container)
    }
}
