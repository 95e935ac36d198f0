//! Parameter catalog of the atmospheric dynamical core.
//!
//! Three contexts:
//!
//! - [`dycore`]: prognostic fields, their tendencies, and constant fields.
//! - [`fast_waves`]: the linear system of the fast-waves solver.
//! - [`vadvect`]: generic placeholders for the vertical advection operator,
//!   rebound to `u`, `v`, `w` (and their tendencies) on each application.
//!
//! The keys below are resolved with [`const_key`], so a reference to a
//! parameter that is not declared here does not compile.

use fieldpool_arena::ConfigError;
use fieldpool_core::{const_key, is_well_formed, ContextDecl, ParamDecl};

use crate::pool::FieldPool;

/// Declaration table, in placeholder order.
pub const CATALOG: &[ContextDecl] = &[
    ContextDecl::new(
        "dycore",
        &[
            ParamDecl::d3("u"),
            ParamDecl::d3("v"),
            ParamDecl::d3("w"),
            ParamDecl::d3("tp"),
            ParamDecl::d3("utens"),
            ParamDecl::d3("vtens"),
            ParamDecl::d3("wtens"),
            ParamDecl::d3("hdmask"),
            ParamDecl::d2("fc"),
        ],
    ),
    ContextDecl::new(
        "fast_waves",
        &[
            ParamDecl::d3("lgsA"),
            ParamDecl::d3("lgsB"),
            ParamDecl::d3("lgsC"),
            ParamDecl::d3("lgsRHS"),
            // cos(latitude) metric term; one value per column.
            ParamDecl::d2("rCosPhi"),
        ],
    ),
    ContextDecl::new(
        "vadvect",
        &[
            ParamDecl::d3("data"),
            ParamDecl::d3("datatens"),
            ParamDecl::d2("fc"),
        ],
    ),
];

const _: () = assert!(is_well_formed(CATALOG));

/// Build a pool for [`CATALOG`] on the default grid.
pub fn pool() -> Result<FieldPool, ConfigError> {
    FieldPool::from_decls(CATALOG)
}

/// Keys of the `dycore` context.
pub mod dycore {
    use super::*;
    use fieldpool_core::{ContextId, ParamKey};

    /// The context.
    pub const CONTEXT: ContextId = U.context();
    /// Zonal wind.
    pub const U: ParamKey = const_key(CATALOG, "dycore", "u");
    /// Meridional wind.
    pub const V: ParamKey = const_key(CATALOG, "dycore", "v");
    /// Vertical wind.
    pub const W: ParamKey = const_key(CATALOG, "dycore", "w");
    /// Temperature perturbation.
    pub const TP: ParamKey = const_key(CATALOG, "dycore", "tp");
    /// Tendency of `u`.
    pub const UTENS: ParamKey = const_key(CATALOG, "dycore", "utens");
    /// Tendency of `v`.
    pub const VTENS: ParamKey = const_key(CATALOG, "dycore", "vtens");
    /// Tendency of `w`.
    pub const WTENS: ParamKey = const_key(CATALOG, "dycore", "wtens");
    /// Horizontal diffusion mask.
    pub const HDMASK: ParamKey = const_key(CATALOG, "dycore", "hdmask");
    /// Coriolis parameter.
    pub const FC: ParamKey = const_key(CATALOG, "dycore", "fc");
}

/// Keys of the `fast_waves` context.
pub mod fast_waves {
    use super::*;
    use fieldpool_core::{ContextId, ParamKey};

    /// The context.
    pub const CONTEXT: ContextId = LGS_A.context();
    /// Lower diagonal of the tridiagonal system.
    pub const LGS_A: ParamKey = const_key(CATALOG, "fast_waves", "lgsA");
    /// Main diagonal.
    pub const LGS_B: ParamKey = const_key(CATALOG, "fast_waves", "lgsB");
    /// Upper diagonal.
    pub const LGS_C: ParamKey = const_key(CATALOG, "fast_waves", "lgsC");
    /// Right-hand side.
    pub const LGS_RHS: ParamKey = const_key(CATALOG, "fast_waves", "lgsRHS");
    /// Reciprocal cosine of latitude.
    pub const R_COS_PHI: ParamKey = const_key(CATALOG, "fast_waves", "rCosPhi");
}

/// Keys of the `vadvect` context.
pub mod vadvect {
    use super::*;
    use fieldpool_core::{ContextId, ParamKey};

    /// The context.
    pub const CONTEXT: ContextId = DATA.context();
    /// Advected field.
    pub const DATA: ParamKey = const_key(CATALOG, "vadvect", "data");
    /// Tendency of the advected field.
    pub const DATATENS: ParamKey = const_key(CATALOG, "vadvect", "datatens");
    /// Coriolis parameter.
    pub const FC: ParamKey = const_key(CATALOG, "vadvect", "fc");
}
