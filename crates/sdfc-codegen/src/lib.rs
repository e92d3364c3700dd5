//! sdfc Codegen - Scene trees to GLSL SDF evaluation code
//!
//! Lowers a parsed scene into statements that evaluate the distance field
//! and material of every primitive, followed by a `return` that composes
//! them. The output is meant to be spliced into the body of a shader
//! function that has the point variable and all callees in scope.
//!
//! ## Key Types
//!
//! - [`SceneCompiler`] - Compiles scene source with a target and operator table
//! - [`OperatorTable`] - Operator identifiers and the callees they lower to
//! - [`Target`] - Names used by the generated code
//! - [`Config`] - TOML configuration of target and extra operators
//!
//! ## Example
//!
//! ```rust
//! use sdfc_codegen::compile_scene;
//!
//! let code = compile_scene("(mLamb 1 (pSphere 1))").unwrap();
//! assert!(code.contains("sdf_result_t p0 = sdf_result_t(sphere_sdf(p, 1), MAKE_LAMB(1));"));
//! assert!(code.contains("return sdf_result_t(p0);"));
//! ```

mod compiler;
mod concat;
mod config;
mod error;
mod lowering;
mod operators;
mod primitives;
mod target;
mod template;

pub use compiler::{CompiledScene, SceneCompiler, compile_scene};
pub use config::Config;
pub use error::{CompileError, Result};
pub use operators::{CombinatorDef, ContextValue, Operator, OperatorTable, PrimitiveDef, Role};
pub use target::Target;
pub use template::{SCENE_MARKER, splice_into_template};

// Re-export the front end for callers that only depend on this crate
pub use sdfc_syntax::{Expr, SyntaxError, Token, TokenKind, parse_scene, tokenize};
