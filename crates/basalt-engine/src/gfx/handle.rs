use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU64;

/// Opaque identifier for one live GPU resource.
///
/// All resource kinds share a single ID space. Values are handed out by a
/// strictly increasing counter and are never reused, so a stale handle is
/// always detected instead of silently aliasing a newer resource.
///
/// The raw value `0` is the "no resource" sentinel and cannot be represented
/// by a `Handle`; APIs that accept "no resource" take `Option<Handle>`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Handle(NonZeroU64);

impl Handle {
    /// Returns the caller-visible integer value.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0.get()
    }

    /// Rebuilds a handle from its integer value. `0` maps to `None`.
    #[inline]
    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Resource kind tag stored next to every handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceKind {
    Shader,
    Program,
    Buffer,
    VertexArray,
    Texture,
    Framebuffer,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Shader,
        ResourceKind::Program,
        ResourceKind::Buffer,
        ResourceKind::VertexArray,
        ResourceKind::Texture,
        ResourceKind::Framebuffer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Shader => "shader",
            ResourceKind::Program => "program",
            ResourceKind::Buffer => "buffer",
            ResourceKind::VertexArray => "vertex array",
            ResourceKind::Texture => "texture",
            ResourceKind::Framebuffer => "framebuffer",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lookup failure inside a [`HandleTable`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HandleError {
    /// The handle was never allocated or has already been released.
    Unknown(Handle),
    /// The handle is live but names a different kind of resource.
    WrongKind {
        handle: Handle,
        expected: ResourceKind,
        actual: ResourceKind,
    },
    /// The 64-bit counter has no values left.
    Exhausted,
}

impl fmt::Display for HandleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleError::Unknown(h) => write!(f, "unknown handle {h}"),
            HandleError::WrongKind {
                handle,
                expected,
                actual,
            } => write!(f, "handle {handle} is a {actual}, expected a {expected}"),
            HandleError::Exhausted => f.write_str("handle space exhausted"),
        }
    }
}

impl std::error::Error for HandleError {}

#[derive(Debug, Copy, Clone)]
struct Record<N> {
    kind: ResourceKind,
    native: N,
}

/// Maps caller-visible handles to native object identifiers.
///
/// `N` is the backend's native identifier type (a GL object name for the
/// OpenGL backend). Lookups are hashed and O(1) amortized; they sit on the
/// path of every bind and draw call.
#[derive(Debug)]
pub struct HandleTable<N> {
    records: HashMap<Handle, Record<N>>,
    next: u64,
}

impl<N: Copy> HandleTable<N> {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            next: 1,
        }
    }

    /// Registers a native object and returns its new handle.
    pub fn allocate(&mut self, kind: ResourceKind, native: N) -> Result<Handle, HandleError> {
        let handle = Handle::from_raw(self.next).ok_or(HandleError::Exhausted)?;
        self.next = self.next.checked_add(1).ok_or(HandleError::Exhausted)?;
        self.records.insert(handle, Record { kind, native });
        Ok(handle)
    }

    /// Returns the native identifier behind `handle`, whatever its kind.
    pub fn resolve(&self, handle: Handle) -> Result<N, HandleError> {
        self.records
            .get(&handle)
            .map(|r| r.native)
            .ok_or(HandleError::Unknown(handle))
    }

    /// Like [`resolve`](Self::resolve) but also requires the resource to be of `kind`.
    pub fn resolve_kind(&self, handle: Handle, kind: ResourceKind) -> Result<N, HandleError> {
        let record = self.records.get(&handle).ok_or(HandleError::Unknown(handle))?;
        if record.kind != kind {
            return Err(HandleError::WrongKind {
                handle,
                expected: kind,
                actual: record.kind,
            });
        }
        Ok(record.native)
    }

    /// Removes the mapping and returns the native identifier it held.
    pub fn release(&mut self, handle: Handle) -> Result<N, HandleError> {
        self.records
            .remove(&handle)
            .map(|r| r.native)
            .ok_or(HandleError::Unknown(handle))
    }

    /// Removes the mapping only if it names a resource of `kind`.
    pub fn release_kind(&mut self, handle: Handle, kind: ResourceKind) -> Result<N, HandleError> {
        self.resolve_kind(handle, kind)?;
        self.release(handle)
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.records.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of live resources of one kind.
    pub fn count(&self, kind: ResourceKind) -> usize {
        self.records.values().filter(|r| r.kind == kind).count()
    }

    /// Iterates over live handles in no particular order.
    pub fn live(&self) -> impl Iterator<Item = (Handle, ResourceKind)> + '_ {
        self.records.iter().map(|(h, r)| (*h, r.kind))
    }
}

impl<N: Copy> Default for HandleTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn first_handle_is_above_sentinel() {
        let mut table = HandleTable::new();
        let h = table.allocate(ResourceKind::Shader, 7u32).unwrap();
        assert_eq!(h.raw(), 1);
        assert!(Handle::from_raw(0).is_none());
    }

    #[test]
    fn resolve_returns_native_id() {
        let mut table = HandleTable::new();
        let h = table.allocate(ResourceKind::Texture, 42u32).unwrap();
        assert_eq!(table.resolve(h), Ok(42));
        assert_eq!(table.resolve_kind(h, ResourceKind::Texture), Ok(42));
    }

    #[test]
    fn resolve_after_release_fails_for_every_kind() {
        let mut table = HandleTable::new();
        for (i, kind) in ResourceKind::ALL.into_iter().enumerate() {
            let h = table.allocate(kind, i as u32 + 1).unwrap();
            assert_eq!(table.release(h), Ok(i as u32 + 1));
            assert_eq!(table.resolve(h), Err(HandleError::Unknown(h)));
            assert_eq!(table.release(h), Err(HandleError::Unknown(h)));
        }
        assert!(table.is_empty());
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let mut table = HandleTable::new();
        let h = table.allocate(ResourceKind::Buffer, 3u32).unwrap();
        assert_eq!(
            table.resolve_kind(h, ResourceKind::Texture),
            Err(HandleError::WrongKind {
                handle: h,
                expected: ResourceKind::Texture,
                actual: ResourceKind::Buffer,
            })
        );
        // A rejected release leaves the mapping alone.
        assert!(table.release_kind(h, ResourceKind::Program).is_err());
        assert!(table.contains(h));
    }

    #[test]
    fn handles_are_never_reused() {
        let mut table = HandleTable::new();
        let a = table.allocate(ResourceKind::Program, 1u32).unwrap();
        table.release(a).unwrap();
        // The driver may hand back the same native name; the handle still differs.
        let b = table.allocate(ResourceKind::Program, 1u32).unwrap();
        assert_ne!(a, b);
        assert_eq!(table.resolve(a), Err(HandleError::Unknown(a)));
    }

    #[test]
    fn live_handles_stay_unique_across_mixed_sequences() {
        let mut table = HandleTable::new();
        let mut live: Vec<Handle> = Vec::new();
        let mut seen = HashSet::new();

        // Deterministic pseudo-random create/destroy mix.
        let mut seed = 0x2545_f491u32;
        for step in 0..500u32 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;

            if seed % 3 == 0 && !live.is_empty() {
                let idx = (seed as usize / 3) % live.len();
                let h = live.swap_remove(idx);
                table.release(h).unwrap();
            } else {
                let kind = ResourceKind::ALL[(seed % 6) as usize];
                let h = table.allocate(kind, step % 8).unwrap();
                assert!(seen.insert(h), "handle {h} handed out twice");
                live.push(h);
            }

            let unique: HashSet<_> = table.live().map(|(h, _)| h).collect();
            assert_eq!(unique.len(), table.len());
            assert_eq!(table.len(), live.len());
        }
    }

    #[test]
    fn exhausted_counter_reports_error() {
        let mut table: HandleTable<u32> = HandleTable::new();
        table.next = u64::MAX;
        assert_eq!(
            table.allocate(ResourceKind::Shader, 1),
            Err(HandleError::Exhausted)
        );
    }

    #[test]
    fn count_by_kind() {
        let mut table = HandleTable::new();
        table.allocate(ResourceKind::Texture, 1u32).unwrap();
        table.allocate(ResourceKind::Texture, 2u32).unwrap();
        table.allocate(ResourceKind::Buffer, 3u32).unwrap();
        assert_eq!(table.count(ResourceKind::Texture), 2);
        assert_eq!(table.count(ResourceKind::Buffer), 1);
        assert_eq!(table.count(ResourceKind::Shader), 0);
    }
}
