use anyhow::Result;

/// Supplies compiled contract interfaces for leaf-payload encoding and the
/// canonical serialized configuration. Opaque lookup by name; the core
/// never interprets artifact contents.
pub trait ConfigProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Compiled artifact bytes for `name`.
    fn artifact(&self, name: &str) -> Result<Vec<u8>>;

    /// The full compiled configuration, canonically serialized.
    fn canonical_config(&self) -> Result<Vec<u8>>;
}
