//! Pool configuration.

use fieldpool_arena::{ConfigError, GridConfig};
use fieldpool_core::{Catalog, ContextDecl, ContextSpec};

/// Everything needed to construct a [`FieldPool`](crate::FieldPool).
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Contexts in declaration order. `ContextId(n)` is `contexts[n]`.
    pub contexts: Vec<ContextSpec>,
    /// Storage extents.
    pub grid: GridConfig,
}

impl PoolConfig {
    /// Configuration for a static declaration table on the default grid.
    pub fn from_decls(decls: &[ContextDecl]) -> Self {
        Self {
            contexts: decls.iter().map(ContextSpec::from).collect(),
            grid: GridConfig::default(),
        }
    }

    /// Replace the grid.
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    /// Validate the grid and the catalog.
    ///
    /// This is a pure validation pass; the pool constructor builds the
    /// [`Catalog`] itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        Catalog::from_specs(self.contexts.clone())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldpool_core::{CatalogError, ParamDecl};

    const DECLS: &[ContextDecl] = &[ContextDecl::new("dycore", &[ParamDecl::d3("u")])];

    #[test]
    fn from_decls_uses_default_grid() {
        let config = PoolConfig::from_decls(DECLS);
        assert_eq!(config.grid, GridConfig::default());
        assert_eq!(config.contexts.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_reports_catalog_errors() {
        let mut config = PoolConfig::from_decls(DECLS);
        config.contexts.push(config.contexts[0].clone());
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::Catalog(CatalogError::DuplicateContext {
                name: "dycore".into()
            })
        );
    }

    #[test]
    fn validate_reports_grid_errors() {
        let config = PoolConfig::from_decls(DECLS).with_grid(GridConfig::new(0, 1, 1));
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::ZeroExtent { axis: "ni" }
        );
    }
}
