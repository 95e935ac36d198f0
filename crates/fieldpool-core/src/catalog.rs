//! The parameter catalog: which fields exist, per context, and their
//! shape class.
//!
//! A catalog starts life as a static declaration table of
//! [`ContextDecl`]s. The table can be checked at compile time with
//! [`is_well_formed`] and individual keys resolved with [`const_key`],
//! both of which are `const fn`: using them in a `const` item turns a
//! misspelt or undeclared `(context, parameter)` reference into a build
//! failure rather than a runtime one.
//!
//! At pool construction the table is converted into a [`Catalog`], which
//! repeats the validation and adds O(1) name lookup.

use indexmap::IndexMap;

use crate::error::CatalogError;
use crate::id::{ContextId, ParamId, ParamKey};
use crate::shape::ShapeClass;

/// Static declaration of one parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamDecl {
    /// Parameter name, unique within its context.
    pub name: &'static str,
    /// Declared shape class.
    pub shape: ShapeClass,
}

impl ParamDecl {
    /// Declare a 2D parameter.
    pub const fn d2(name: &'static str) -> Self {
        Self {
            name,
            shape: ShapeClass::D2,
        }
    }

    /// Declare a 3D parameter.
    pub const fn d3(name: &'static str) -> Self {
        Self {
            name,
            shape: ShapeClass::D3,
        }
    }
}

/// Static declaration of one context and its parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContextDecl {
    /// Context name, unique within the catalog.
    pub name: &'static str,
    /// Parameters in declaration order.
    pub params: &'static [ParamDecl],
}

impl ContextDecl {
    /// Declare a context.
    pub const fn new(name: &'static str, params: &'static [ParamDecl]) -> Self {
        Self { name, params }
    }
}

const fn str_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Compile-time check of a declaration table.
///
/// Returns `false` for empty names, repeated context names, or a
/// parameter name repeated within a context (whatever its shape class).
pub const fn is_well_formed(decls: &[ContextDecl]) -> bool {
    let mut c = 0;
    while c < decls.len() {
        let ctx = &decls[c];
        if ctx.name.is_empty() {
            return false;
        }
        let mut other = c + 1;
        while other < decls.len() {
            if str_eq(ctx.name, decls[other].name) {
                return false;
            }
            other += 1;
        }
        let mut p = 0;
        while p < ctx.params.len() {
            let name = ctx.params[p].name;
            if name.is_empty() {
                return false;
            }
            let mut q = p + 1;
            while q < ctx.params.len() {
                if str_eq(name, ctx.params[q].name) {
                    return false;
                }
                q += 1;
            }
            p += 1;
        }
        c += 1;
    }
    true
}

/// Resolve `(context, param)` names to a [`ParamKey`] at compile time.
///
/// # Panics
///
/// Panics if the pair is not declared. In a `const` item this is a
/// compile error.
pub const fn const_key(decls: &[ContextDecl], context: &str, param: &str) -> ParamKey {
    let mut c = 0;
    while c < decls.len() {
        if str_eq(decls[c].name, context) {
            let params = decls[c].params;
            let mut p = 0;
            while p < params.len() {
                if str_eq(params[p].name, param) {
                    return ParamKey::new(ContextId(c as u32), ParamId(p as u32));
                }
                p += 1;
            }
            panic!("parameter is not declared for this context");
        }
        c += 1;
    }
    panic!("context is not declared in this catalog");
}

/// Runtime form of a parameter declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamSpec {
    /// Parameter name.
    pub name: String,
    /// Declared shape class.
    pub shape: ShapeClass,
}

/// Runtime form of a context declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextSpec {
    /// Context name.
    pub name: String,
    /// Parameters; `ParamId(n)` is `params[n]`.
    pub params: Vec<ParamSpec>,
}

impl From<&ContextDecl> for ContextSpec {
    fn from(decl: &ContextDecl) -> Self {
        Self {
            name: decl.name.to_string(),
            params: decl
                .params
                .iter()
                .map(|p| ParamSpec {
                    name: p.name.to_string(),
                    shape: p.shape,
                })
                .collect(),
        }
    }
}

/// A validated catalog of contexts and parameters.
///
/// `ContextId(n)` is the n-th declared context. Name lookups go through
/// `IndexMap`s so iteration order always equals declaration order.
#[derive(Clone, Debug)]
pub struct Catalog {
    contexts: Vec<ContextSpec>,
    context_ids: IndexMap<String, ContextId>,
    param_ids: Vec<IndexMap<String, ParamId>>,
}

impl Catalog {
    /// Validate and index a static declaration table.
    pub fn from_decls(decls: &[ContextDecl]) -> Result<Self, CatalogError> {
        Self::from_specs(decls.iter().map(ContextSpec::from).collect())
    }

    /// Validate and index runtime context specs.
    pub fn from_specs(contexts: Vec<ContextSpec>) -> Result<Self, CatalogError> {
        if u32::try_from(contexts.len()).is_err() {
            return Err(CatalogError::TooManyEntries {
                count: contexts.len(),
            });
        }

        let mut context_ids = IndexMap::with_capacity(contexts.len());
        let mut param_ids = Vec::with_capacity(contexts.len());
        let mut total = 0usize;

        for (index, ctx) in contexts.iter().enumerate() {
            if ctx.name.is_empty() {
                return Err(CatalogError::EmptyContextName { index });
            }
            if context_ids.contains_key(&ctx.name) {
                return Err(CatalogError::DuplicateContext {
                    name: ctx.name.clone(),
                });
            }
            context_ids.insert(ctx.name.clone(), ContextId(index as u32));

            let mut ids: IndexMap<String, ParamId> = IndexMap::with_capacity(ctx.params.len());
            for (p, param) in ctx.params.iter().enumerate() {
                if param.name.is_empty() {
                    return Err(CatalogError::EmptyParamName {
                        context: ctx.name.clone(),
                    });
                }
                if let Some(&ParamId(first)) = ids.get(&param.name) {
                    let first_shape = ctx.params[first as usize].shape;
                    return Err(if first_shape == param.shape {
                        CatalogError::DuplicateParameter {
                            context: ctx.name.clone(),
                            param: param.name.clone(),
                        }
                    } else {
                        CatalogError::DualShapeClass {
                            context: ctx.name.clone(),
                            param: param.name.clone(),
                        }
                    });
                }
                ids.insert(param.name.clone(), ParamId(p as u32));
            }
            total += ids.len();
            param_ids.push(ids);
        }

        // Placeholder ids are global u32s over every parameter.
        if u32::try_from(total).is_err() {
            return Err(CatalogError::TooManyEntries { count: total });
        }

        Ok(Self {
            contexts,
            context_ids,
            param_ids,
        })
    }

    /// Number of contexts.
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Whether the catalog declares no contexts.
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Total number of parameters across all contexts.
    pub fn total_params(&self) -> usize {
        self.contexts.iter().map(|c| c.params.len()).sum()
    }

    /// Iterate over contexts in declaration order.
    pub fn contexts(&self) -> impl Iterator<Item = (ContextId, &ContextSpec)> {
        self.contexts
            .iter()
            .enumerate()
            .map(|(i, c)| (ContextId(i as u32), c))
    }

    /// The spec of a context.
    pub fn context(&self, context: ContextId) -> Option<&ContextSpec> {
        self.contexts.get(context.0 as usize)
    }

    /// Look up a context by name.
    pub fn context_id(&self, name: &str) -> Option<ContextId> {
        self.context_ids.get(name).copied()
    }

    /// Name of a context.
    pub fn context_name(&self, context: ContextId) -> Option<&str> {
        self.context(context).map(|c| c.name.as_str())
    }

    /// Look up a parameter key by context and parameter name.
    pub fn key(&self, context: &str, param: &str) -> Option<ParamKey> {
        let ctx = self.context_id(context)?;
        let id = self.param_ids[ctx.0 as usize].get(param)?;
        Some(ParamKey::new(ctx, *id))
    }

    /// Whether `key` names a declared parameter.
    pub fn contains(&self, key: ParamKey) -> bool {
        self.param(key).is_some()
    }

    /// The spec of a parameter.
    pub fn param(&self, key: ParamKey) -> Option<&ParamSpec> {
        self.context(key.context())?.params.get(key.param().0 as usize)
    }

    /// Name of a parameter.
    pub fn param_name(&self, key: ParamKey) -> Option<&str> {
        self.param(key).map(|p| p.name.as_str())
    }

    /// Declared shape class of a parameter.
    pub fn shape_of(&self, key: ParamKey) -> Option<ShapeClass> {
        self.param(key).map(|p| p.shape)
    }

    /// Keys of a context's parameters in declaration order.
    pub fn params(&self, context: ContextId) -> impl Iterator<Item = (ParamKey, &ParamSpec)> {
        self.context(context)
            .map(|c| c.params.as_slice())
            .unwrap_or(&[])
            .iter()
            .enumerate()
            .map(move |(p, spec)| (ParamKey::new(context, ParamId(p as u32)), spec))
    }
}

/// Incremental builder for runtime-assembled catalogs.
///
/// ```
/// use fieldpool_core::{CatalogBuilder, ShapeClass};
///
/// let catalog = CatalogBuilder::new()
///     .context("dycore")
///     .param("u", ShapeClass::D3)
///     .param("fc", ShapeClass::D2)
///     .build()
///     .unwrap();
/// assert_eq!(catalog.total_params(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CatalogBuilder {
    contexts: Vec<ContextSpec>,
    orphan: Option<String>,
}

impl CatalogBuilder {
    /// Start an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new context; subsequent parameters belong to it.
    pub fn context(mut self, name: impl Into<String>) -> Self {
        self.contexts.push(ContextSpec {
            name: name.into(),
            params: Vec::new(),
        });
        self
    }

    /// Declare a parameter in the most recently opened context.
    pub fn param(mut self, name: impl Into<String>, shape: ShapeClass) -> Self {
        let name = name.into();
        match self.contexts.last_mut() {
            Some(ctx) => ctx.params.push(ParamSpec { name, shape }),
            None => {
                self.orphan.get_or_insert(name);
            }
        }
        self
    }

    /// Validate and build the catalog.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        if let Some(param) = self.orphan {
            return Err(CatalogError::ParameterOutsideContext { param });
        }
        Catalog::from_specs(self.contexts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DECLS: &[ContextDecl] = &[
        ContextDecl::new(
            "dycore",
            &[ParamDecl::d3("u"), ParamDecl::d3("v"), ParamDecl::d2("fc")],
        ),
        ContextDecl::new("fast_waves", &[ParamDecl::d3("lgsA"), ParamDecl::d2("rCosPhi")]),
    ];

    const _: () = assert!(is_well_formed(DECLS));
    const FC: ParamKey = const_key(DECLS, "dycore", "fc");
    const LGS_A: ParamKey = const_key(DECLS, "fast_waves", "lgsA");

    #[test]
    fn const_key_matches_runtime_lookup() {
        let catalog = Catalog::from_decls(DECLS).unwrap();
        assert_eq!(catalog.key("dycore", "fc"), Some(FC));
        assert_eq!(catalog.key("fast_waves", "lgsA"), Some(LGS_A));
        assert_eq!(FC, ParamKey::new(ContextId(0), ParamId(2)));
    }

    #[test]
    fn shape_of_follows_declaration() {
        let catalog = Catalog::from_decls(DECLS).unwrap();
        assert_eq!(catalog.shape_of(FC), Some(ShapeClass::D2));
        assert_eq!(catalog.shape_of(LGS_A), Some(ShapeClass::D3));
    }

    #[test]
    fn unknown_names_resolve_to_none() {
        let catalog = Catalog::from_decls(DECLS).unwrap();
        assert_eq!(catalog.key("dycore", "lgsA"), None);
        assert_eq!(catalog.key("vadvect", "data"), None);
        assert!(!catalog.contains(ParamKey::new(ContextId(0), ParamId(3))));
    }

    #[test]
    fn params_iterate_in_declaration_order() {
        let catalog = Catalog::from_decls(DECLS).unwrap();
        let names: Vec<_> = catalog
            .params(ContextId(0))
            .map(|(_, p)| p.name.as_str())
            .collect();
        assert_eq!(names, ["u", "v", "fc"]);
        assert_eq!(catalog.params(ContextId(9)).count(), 0);
    }

    #[test]
    fn dual_shape_class_is_rejected() {
        const DUAL: &[ContextDecl] = &[ContextDecl::new(
            "fast_waves",
            &[ParamDecl::d3("rCosPhi"), ParamDecl::d2("rCosPhi")],
        )];
        assert!(!is_well_formed(DUAL));
        assert_eq!(
            Catalog::from_decls(DUAL).unwrap_err(),
            CatalogError::DualShapeClass {
                context: "fast_waves".into(),
                param: "rCosPhi".into(),
            }
        );
    }

    #[test]
    fn repeated_parameter_is_rejected() {
        let err = CatalogBuilder::new()
            .context("dycore")
            .param("u", ShapeClass::D3)
            .param("u", ShapeClass::D3)
            .build()
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateParameter { .. }));
    }

    #[test]
    fn same_parameter_name_in_two_contexts_is_fine() {
        let catalog = CatalogBuilder::new()
            .context("dycore")
            .param("fc", ShapeClass::D2)
            .context("vadvect")
            .param("fc", ShapeClass::D2)
            .build()
            .unwrap();
        assert_ne!(catalog.key("dycore", "fc"), catalog.key("vadvect", "fc"));
    }

    #[test]
    fn repeated_context_is_rejected() {
        let err = CatalogBuilder::new()
            .context("dycore")
            .context("dycore")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateContext {
                name: "dycore".into()
            }
        );
    }

    #[test]
    fn empty_names_are_rejected() {
        let err = CatalogBuilder::new().context("").build().unwrap_err();
        assert_eq!(err, CatalogError::EmptyContextName { index: 0 });

        let err = CatalogBuilder::new()
            .context("dycore")
            .param("", ShapeClass::D2)
            .build()
            .unwrap_err();
        assert!(matches!(err, CatalogError::EmptyParamName { .. }));
    }

    #[test]
    fn parameter_before_context_is_rejected() {
        let err = CatalogBuilder::new()
            .param("u", ShapeClass::D3)
            .context("dycore")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::ParameterOutsideContext { param: "u".into() }
        );
    }

    proptest! {
        #[test]
        fn unique_names_always_build(
            shapes in prop::collection::vec(
                prop::collection::vec(prop::bool::ANY, 0..12),
                1..6,
            ),
        ) {
            let mut builder = CatalogBuilder::new();
            for (c, params) in shapes.iter().enumerate() {
                builder = builder.context(format!("ctx{c}"));
                for (p, &is_3d) in params.iter().enumerate() {
                    let shape = if is_3d { ShapeClass::D3 } else { ShapeClass::D2 };
                    builder = builder.param(format!("p{p}"), shape);
                }
            }
            let catalog = builder.build().unwrap();
            prop_assert_eq!(catalog.len(), shapes.len());
            prop_assert_eq!(
                catalog.total_params(),
                shapes.iter().map(Vec::len).sum::<usize>()
            );
            for (c, params) in shapes.iter().enumerate() {
                for p in 0..params.len() {
                    let key = catalog.key(&format!("ctx{c}"), &format!("p{p}")).unwrap();
                    prop_assert_eq!(key, ParamKey::new(ContextId(c as u32), ParamId(p as u32)));
                }
            }
        }
    }
}
