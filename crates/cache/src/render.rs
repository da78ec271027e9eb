use std::{error::Error as StdError, sync::Arc};

use waterfill_core::Terrain;

/// An opaque rendered blob stored alongside a solved level.
///
/// The cache never looks inside an artifact. Clones share the same bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Artifact(Arc<[u8]>);

impl Artifact {
    /// Wraps rendered bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Arc::from(bytes.into()))
    }

    /// Returns the artifact bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the size of the artifact in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the artifact holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Artifact({} bytes)", self.0.len())
    }
}

impl From<Vec<u8>> for Artifact {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<String> for Artifact {
    fn from(text: String) -> Self {
        Self::new(text.into_bytes())
    }
}

/// Produces the artifact for a solved instance.
///
/// Closures of the shape `Fn(&Terrain, f64) -> Result<Artifact, E>` are
/// renderers.
pub trait Render {
    type Error: StdError + Send + Sync + 'static;

    /// Renders `terrain` filled with water up to `level`.
    ///
    /// # Errors
    ///
    /// Each renderer defines its own `Error` type.
    fn render(&self, terrain: &Terrain, level: f64) -> Result<Artifact, Self::Error>;
}

impl<F, E> Render for F
where
    F: Fn(&Terrain, f64) -> Result<Artifact, E>,
    E: StdError + Send + Sync + 'static,
{
    type Error = E;

    fn render(&self, terrain: &Terrain, level: f64) -> Result<Artifact, Self::Error> {
        self(terrain, level)
    }
}
