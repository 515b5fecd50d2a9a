use std::collections::HashMap;

use crate::error::AssetError;
use crate::geometry::{build_named, Geometry, GeometryParams};

/// Source of meshes the engine does not generate itself.
#[allow(async_fn_in_trait)]
pub trait AssetProvider {
    async fn load_mesh(&self, path: &str) -> Result<Geometry, AssetError>;
}

/// Meshes registered up front under a path.
#[derive(Debug, Default)]
pub struct MemoryAssetProvider {
    meshes: HashMap<String, Geometry>,
}

impl MemoryAssetProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, geometry: Geometry) {
        self.meshes.insert(path.into(), geometry);
    }

    pub fn with_mesh(mut self, path: impl Into<String>, geometry: Geometry) -> Self {
        self.insert(path, geometry);
        self
    }
}

impl AssetProvider for MemoryAssetProvider {
    async fn load_mesh(&self, path: &str) -> Result<Geometry, AssetError> {
        self.meshes
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::AssetNotFound(path.to_string()))
    }
}

/// Serves `builtin/<kind>` paths by building the named primitive, e.g.
/// `builtin/dodecahedron`.
#[derive(Debug, Clone, Default)]
pub struct BuiltinAssetProvider {
    params: GeometryParams,
}

pub const BUILTIN_PREFIX: &str = "builtin/";

impl BuiltinAssetProvider {
    pub fn new(params: GeometryParams) -> Self {
        Self { params }
    }
}

impl AssetProvider for BuiltinAssetProvider {
    async fn load_mesh(&self, path: &str) -> Result<Geometry, AssetError> {
        let name = path
            .strip_prefix(BUILTIN_PREFIX)
            .ok_or_else(|| AssetError::AssetNotFound(path.to_string()))?;

        build_named(name, &self.params).map_err(|err| AssetError::AssetParseError {
            path: path.to_string(),
            reason: err.to_string(),
        })
    }
}

/// Tries `primary` first and falls back to `secondary` for missing assets.
/// Parse errors are not retried.
pub struct LayeredAssetProvider<A, B> {
    pub primary: A,
    pub secondary: B,
}

impl<A: AssetProvider, B: AssetProvider> AssetProvider for LayeredAssetProvider<A, B> {
    async fn load_mesh(&self, path: &str) -> Result<Geometry, AssetError> {
        match self.primary.load_mesh(path).await {
            Err(AssetError::AssetNotFound(_)) => self.secondary.load_mesh(path).await,
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{build, GeometryKind, Topology};

    #[test]
    fn test_memory_provider() {
        let octahedron = build(GeometryKind::Octahedron, &GeometryParams::default()).unwrap();
        let provider = MemoryAssetProvider::new().with_mesh("models/rock.obj", octahedron.clone());

        let loaded = pollster::block_on(provider.load_mesh("models/rock.obj")).unwrap();
        assert_eq!(loaded, octahedron);

        let missing = pollster::block_on(provider.load_mesh("models/asteroid.obj"));
        assert_eq!(
            missing,
            Err(AssetError::AssetNotFound("models/asteroid.obj".to_string()))
        );
    }

    #[test]
    fn test_builtin_provider() {
        let provider = BuiltinAssetProvider::default();

        let mesh = pollster::block_on(provider.load_mesh("builtin/dodecahedron")).unwrap();
        assert_eq!(mesh.topology(), Topology::TriangleList);
        assert_eq!(mesh.vertex_count(), 60);

        assert!(matches!(
            pollster::block_on(provider.load_mesh("builtin/teapot")),
            Err(AssetError::AssetParseError { .. })
        ));
        assert!(matches!(
            pollster::block_on(provider.load_mesh("models/teapot.obj")),
            Err(AssetError::AssetNotFound(_))
        ));
    }

    #[test]
    fn test_layered_provider_falls_back_on_missing() {
        let provider = LayeredAssetProvider {
            primary: MemoryAssetProvider::new(),
            secondary: BuiltinAssetProvider::default(),
        };

        let mesh = pollster::block_on(provider.load_mesh("builtin/octahedron")).unwrap();
        assert_eq!(mesh.vertex_count(), 24);

        assert!(matches!(
            pollster::block_on(provider.load_mesh("builtin/teapot")),
            Err(AssetError::AssetParseError { .. })
        ));
    }
}
