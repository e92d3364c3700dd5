//! Scene compiler driver

use std::borrow::Cow;
use std::fmt;

use sdfc_syntax::{Expr, parse_scene};

use crate::config::Config;
use crate::error::{CompileError, Result};
use crate::lowering::{Context, Lowering};
use crate::operators::OperatorTable;
use crate::target::Target;

/// Output of one compile call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledScene {
    statements: String,
    return_statement: String,
    primitive_count: usize,
}

impl CompiledScene {
    /// One binding declaration per primitive, newline terminated
    pub fn statements(&self) -> &str {
        &self.statements
    }

    /// `return <result_type>(<expression>);`
    pub fn return_statement(&self) -> &str {
        &self.return_statement
    }

    pub fn primitive_count(&self) -> usize {
        self.primitive_count
    }

    /// The complete fragment to splice into a shader
    pub fn into_source(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CompiledScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.statements)?;
        writeln!(f, "{}", self.return_statement)
    }
}

/// Compiles scene source to GLSL evaluation code.
///
/// A compiler holds no per-call state and can be shared between threads.
#[derive(Debug, Clone)]
pub struct SceneCompiler {
    table: Cow<'static, OperatorTable>,
    target: Target,
}

impl SceneCompiler {
    /// Compiler using the built-in operators and default target names
    pub fn new() -> Self {
        Self {
            table: Cow::Borrowed(OperatorTable::builtin()),
            target: Target::default(),
        }
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Replace the operator table after checking that every entry is reachable
    pub fn with_operators(mut self, table: OperatorTable) -> Result<Self> {
        table.validate()?;
        self.table = Cow::Owned(table);
        Ok(self)
    }

    /// Compiler for a loaded configuration: its target, and its operators
    /// layered over the built-in set
    pub fn from_config(config: Config) -> Result<Self> {
        let Config { target, operators } = config;
        let compiler = Self::new().with_target(target);

        if operators.is_empty() {
            return Ok(compiler);
        }

        let mut table = OperatorTable::builtin().clone();
        table.merge(operators);
        compiler.with_operators(table)
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn operators(&self) -> &OperatorTable {
        &self.table
    }

    /// Compile scene source
    pub fn compile(&self, source: &str) -> Result<CompiledScene> {
        let root = parse_scene(source)?;
        self.compile_expr(&root)
    }

    /// Compile an already parsed scene
    pub fn compile_expr(&self, root: &Expr) -> Result<CompiledScene> {
        let lowering = Lowering::new(&self.table, &self.target);

        let mut statements = String::new();
        let ctx = Context::new(&self.target.point, &self.target.no_material);
        let emitted = lowering.emit_primitives(root, ctx, 0, &mut statements)?;

        let (expression, referenced) = lowering.concat(root, &self.target.point, 0)?;
        if emitted != referenced {
            return Err(CompileError::PassMismatch {
                emitted,
                referenced,
            });
        }

        tracing::debug!(primitives = emitted, "compiled scene");

        Ok(CompiledScene {
            statements,
            return_statement: format!("return {}({});", self.target.result_type, expression),
            primitive_count: emitted,
        })
    }
}

impl Default for SceneCompiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile a scene with the built-in operators and default target names
pub fn compile_scene(source: &str) -> Result<String> {
    SceneCompiler::new()
        .compile(source)
        .map(CompiledScene::into_source)
}
