//! Operator classification
//!
//! Every form's operator resolves to one [`Operator`] descriptor. The role is
//! chosen by the identifier's first character, then the role's own table is
//! searched for the exact identifier:
//!
//! | prefix | role       | table entry                           |
//! |--------|------------|---------------------------------------|
//! | `p`    | primitive  | operand count and distance function   |
//! | `o`    | combinator | leading literal parameters and callee |
//! | `m`    | material   | material constructor                  |
//! | `t`    | transform  | point transform function              |
//! | `.`    | context    | ambient value                         |

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use serde::Deserialize;

use crate::error::{CompileError, Result};

/// Semantic role of an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Primitive,
    Combinator,
    Material,
    Transform,
    ContextRef,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Primitive,
        Role::Combinator,
        Role::Material,
        Role::Transform,
        Role::ContextRef,
    ];

    /// Role selected by an identifier's naming convention
    pub fn of(identifier: &str) -> Option<Role> {
        let first = identifier.chars().next()?;
        Role::ALL.into_iter().find(|role| role.prefix() == first)
    }

    pub fn prefix(self) -> char {
        match self {
            Role::Primitive => 'p',
            Role::Combinator => 'o',
            Role::Material => 'm',
            Role::Transform => 't',
            Role::ContextRef => '.',
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Primitive => "primitive",
            Role::Combinator => "combinator",
            Role::Material => "material",
            Role::Transform => "transform",
            Role::ContextRef => "context reference",
        })
    }
}

/// A leaf shape: `callee(point, operands...)`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrimitiveDef {
    pub arity: usize,
    pub callee: String,
}

/// A shape combinator: `callee(params..., a, b)`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CombinatorDef {
    /// Number of leading operands passed through as literal parameters
    #[serde(default)]
    pub literal_params: usize,
    pub callee: String,
}

/// What a context reference resolves to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextValue {
    /// The point expression threaded through enclosing transforms
    CurrentPoint,
    /// The untransformed point variable of the target
    WorldPoint,
    /// A fixed target-language expression
    Named(String),
}

/// Resolved descriptor of one operator, borrowed from its table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator<'t> {
    Primitive { arity: usize, callee: &'t str },
    Combinator { literal_params: usize, callee: &'t str },
    Material { constructor: &'t str },
    Transform { function: &'t str },
    Context(&'t ContextValue),
}

impl Operator<'_> {
    pub fn role(&self) -> Role {
        match self {
            Operator::Primitive { .. } => Role::Primitive,
            Operator::Combinator { .. } => Role::Combinator,
            Operator::Material { .. } => Role::Material,
            Operator::Transform { .. } => Role::Transform,
            Operator::Context(_) => Role::ContextRef,
        }
    }
}

impl fmt::Display for Operator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Primitive { arity, callee } => {
                write!(f, "primitive  {} ({} operand(s))", callee, arity)
            }
            Operator::Combinator {
                literal_params,
                callee,
            } => write!(f, "combinator {} ({} literal param(s))", callee, literal_params),
            Operator::Material { constructor } => write!(f, "material   {}", constructor),
            Operator::Transform { function } => write!(f, "transform  {}", function),
            Operator::Context(ContextValue::CurrentPoint) => f.write_str("context    <current point>"),
            Operator::Context(ContextValue::WorldPoint) => f.write_str("context    <world point>"),
            Operator::Context(ContextValue::Named(name)) => write!(f, "context    {}", name),
        }
    }
}

/// Operator tables, one per role.
///
/// `Default` is the empty table; [`OperatorTable::builtin`] is the standard set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OperatorTable {
    pub primitives: BTreeMap<String, PrimitiveDef>,
    pub combinators: BTreeMap<String, CombinatorDef>,
    pub materials: BTreeMap<String, String>,
    pub transforms: BTreeMap<String, String>,
    pub context: BTreeMap<String, ContextValue>,
}

const BUILTIN_PRIMITIVES: &[(&str, usize, &str)] = &[
    ("pSphere", 1, "sphere_sdf"),
    ("pBox", 3, "box_sdf"),
    ("pPlane", 4, "plane_sdf"),
    ("pOctahedron", 1, "octahedron_bound_sdf"),
];

const BUILTIN_COMBINATORS: &[(&str, usize, &str)] = &[
    ("oUnion", 0, "union_sdf"),
    ("oSub", 0, "sub_sdf"),
    ("oNeg", 0, "neg_sdf"),
    ("oSmoothUnion", 1, "smooth_union_sdf"),
    ("oFbm", 2, "fbm_noise"),
];

const BUILTIN_MATERIALS: &[(&str, &str)] = &[
    ("mLamb", "MAKE_LAMB"),
    ("mDiel", "MAKE_DIEL"),
    ("mEmit", "MAKE_EMIT"),
];

const BUILTIN_TRANSFORMS: &[(&str, &str)] = &[("tTrans", "rtrans"), ("tRot", "rrot")];

static BUILTIN: LazyLock<OperatorTable> = LazyLock::new(|| OperatorTable {
    primitives: BUILTIN_PRIMITIVES
        .iter()
        .map(|&(name, arity, callee)| {
            let def = PrimitiveDef {
                arity,
                callee: callee.to_string(),
            };
            (name.to_string(), def)
        })
        .collect(),
    combinators: BUILTIN_COMBINATORS
        .iter()
        .map(|&(name, literal_params, callee)| {
            let def = CombinatorDef {
                literal_params,
                callee: callee.to_string(),
            };
            (name.to_string(), def)
        })
        .collect(),
    materials: BUILTIN_MATERIALS
        .iter()
        .map(|&(name, ctor)| (name.to_string(), ctor.to_string()))
        .collect(),
    transforms: BUILTIN_TRANSFORMS
        .iter()
        .map(|&(name, func)| (name.to_string(), func.to_string()))
        .collect(),
    context: BTreeMap::from([
        (".time".to_string(), ContextValue::Named("elapsed_time".to_string())),
        (".p".to_string(), ContextValue::WorldPoint),
        (".tp".to_string(), ContextValue::CurrentPoint),
    ]),
});

impl OperatorTable {
    /// The standard operator set, shared by every compiler that does not override it
    pub fn builtin() -> &'static OperatorTable {
        &BUILTIN
    }

    /// Resolve an operator identifier
    pub fn lookup(&self, name: &str) -> Result<Operator<'_>> {
        let unknown = || CompileError::UnknownOperator {
            name: name.to_string(),
        };

        let operator = match Role::of(name).ok_or_else(unknown)? {
            Role::Primitive => self.primitives.get(name).map(|def| Operator::Primitive {
                arity: def.arity,
                callee: &def.callee,
            }),
            Role::Combinator => self.combinators.get(name).map(|def| Operator::Combinator {
                literal_params: def.literal_params,
                callee: &def.callee,
            }),
            Role::Material => self
                .materials
                .get(name)
                .map(|ctor| Operator::Material { constructor: ctor }),
            Role::Transform => self
                .transforms
                .get(name)
                .map(|func| Operator::Transform { function: func }),
            Role::ContextRef => self.context.get(name).map(Operator::Context),
        };

        operator.ok_or_else(unknown)
    }

    /// Add or replace entries from `other`
    pub fn merge(&mut self, other: OperatorTable) {
        self.primitives.extend(other.primitives);
        self.combinators.extend(other.combinators);
        self.materials.extend(other.materials);
        self.transforms.extend(other.transforms);
        self.context.extend(other.context);
    }

    /// Check that every entry can be reached through prefix dispatch
    pub fn validate(&self) -> Result<()> {
        let names = [
            (Role::Primitive, self.primitives.keys().collect::<Vec<_>>()),
            (Role::Combinator, self.combinators.keys().collect()),
            (Role::Material, self.materials.keys().collect()),
            (Role::Transform, self.transforms.keys().collect()),
            (Role::ContextRef, self.context.keys().collect()),
        ];

        for (role, keys) in names {
            if let Some(name) = keys.into_iter().find(|name| Role::of(name) != Some(role)) {
                return Err(CompileError::UnreachableRole {
                    name: name.clone(),
                    role,
                });
            }
        }
        Ok(())
    }

    /// All entries, grouped by role and sorted by name within a role
    pub fn entries(&self) -> Vec<(&str, Operator<'_>)> {
        let mut entries = Vec::with_capacity(self.len());
        for name in self
            .primitives
            .keys()
            .chain(self.combinators.keys())
            .chain(self.materials.keys())
            .chain(self.transforms.keys())
            .chain(self.context.keys())
        {
            if let Ok(operator) = self.lookup(name) {
                entries.push((name.as_str(), operator));
            }
        }
        entries
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
            + self.combinators.len()
            + self.materials.len()
            + self.transforms.len()
            + self.context.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_prefixes() {
        assert_eq!(Role::of("pSphere"), Some(Role::Primitive));
        assert_eq!(Role::of("oUnion"), Some(Role::Combinator));
        assert_eq!(Role::of("mLamb"), Some(Role::Material));
        assert_eq!(Role::of("tRot"), Some(Role::Transform));
        assert_eq!(Role::of(".time"), Some(Role::ContextRef));
        assert_eq!(Role::of("zzz"), None);
        assert_eq!(Role::of(""), None);
    }

    #[test]
    fn test_builtin_lookup() {
        let table = OperatorTable::builtin();
        assert_eq!(
            table.lookup("pBox").unwrap(),
            Operator::Primitive {
                arity: 3,
                callee: "box_sdf"
            }
        );
        assert_eq!(
            table.lookup("oFbm").unwrap(),
            Operator::Combinator {
                literal_params: 2,
                callee: "fbm_noise"
            }
        );
        assert_eq!(
            table.lookup("mDiel").unwrap(),
            Operator::Material {
                constructor: "MAKE_DIEL"
            }
        );
        assert_eq!(
            table.lookup("tTrans").unwrap(),
            Operator::Transform { function: "rtrans" }
        );
        assert_eq!(
            table.lookup(".tp").unwrap(),
            Operator::Context(&ContextValue::CurrentPoint)
        );
        assert_eq!(table.lookup(".p").unwrap().role(), Role::ContextRef);
    }

    #[test]
    fn test_unknown_operators() {
        let table = OperatorTable::builtin();
        for name in ["zzz", "pCylinder", "oIntersect", "mMetal", "tScale", ".dt"] {
            assert!(matches!(
                table.lookup(name),
                Err(CompileError::UnknownOperator { name: ref n }) if n == name
            ));
        }
    }

    #[test]
    fn test_builtin_is_valid() {
        let table = OperatorTable::builtin();
        table.validate().unwrap();
        assert_eq!(table.len(), 17);
        assert_eq!(table.entries().len(), 17);
        assert_eq!(table.entries()[0].0, "pBox");
    }

    #[test]
    fn test_merge_and_validate() {
        let mut table = OperatorTable::builtin().clone();
        let mut extra = OperatorTable::default();
        extra.primitives.insert(
            "pSphere".into(),
            PrimitiveDef {
                arity: 2,
                callee: "ellipsoid_sdf".into(),
            },
        );
        extra.transforms.insert("tScale".into(), "rscale".into());
        table.merge(extra);

        assert_eq!(
            table.lookup("pSphere").unwrap(),
            Operator::Primitive {
                arity: 2,
                callee: "ellipsoid_sdf"
            }
        );
        assert!(table.lookup("tScale").is_ok());
        table.validate().unwrap();

        table.materials.insert("Metal".into(), "MAKE_METAL".into());
        assert!(matches!(
            table.validate(),
            Err(CompileError::UnreachableRole {
                role: Role::Material,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_table() {
        let table = OperatorTable::default();
        assert!(table.is_empty());
        assert!(table.lookup("pSphere").is_err());
    }
}
