//! sdfc CLI - Compile S-expression SDF scenes to GLSL

mod repl;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use sdfc_codegen::{Config, SceneCompiler, Target, splice_into_template};
use sdfc_syntax::{parse_scene, tokenize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "sdfc")]
#[command(about = "Compile S-expression SDF scenes to GLSL", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a scene file to a GLSL fragment
    Compile {
        /// Scene file, or `-` for stdin
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Shader template containing a `// SDF_SCENE_PLACEHOLDER` line
        #[arg(short, long)]
        template: Option<PathBuf>,

        #[command(flatten)]
        compiler: CompilerArgs,
    },

    /// Compile many scene files in parallel
    Batch {
        /// Scene files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory receiving one `<stem>.glsl` per scene
        #[arg(long)]
        out_dir: PathBuf,

        /// Shader template containing a `// SDF_SCENE_PLACEHOLDER` line
        #[arg(short, long)]
        template: Option<PathBuf>,

        #[command(flatten)]
        compiler: CompilerArgs,
    },

    /// Print the token stream of a scene
    Tokens {
        /// Scene file, or `-` for stdin
        input: PathBuf,
    },

    /// Print the expression tree of a scene
    Tree {
        /// Scene file, or `-` for stdin
        input: PathBuf,
    },

    /// List the operators available to scenes
    Operators {
        #[command(flatten)]
        compiler: CompilerArgs,
    },

    /// Interactive REPL for scene experimentation
    Repl {
        #[command(flatten)]
        compiler: CompilerArgs,
    },

    /// Recompile a scene whenever it changes
    Watch {
        /// Scene file to watch
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Shader template containing a `// SDF_SCENE_PLACEHOLDER` line
        #[arg(short, long)]
        template: Option<PathBuf>,

        #[command(flatten)]
        compiler: CompilerArgs,
    },
}

/// Options shared by every command that builds a compiler
#[derive(Args, Debug, Default)]
struct CompilerArgs {
    /// TOML file with target names and extra operators
    #[arg(long)]
    config: Option<PathBuf>,

    /// Point variable in scope at the insertion site
    #[arg(long)]
    point: Option<String>,

    /// Material expression for shapes outside any material
    #[arg(long)]
    no_material: Option<String>,

    /// Type of the bindings and of the returned value
    #[arg(long)]
    result_type: Option<String>,

    /// Field read from a binding in the final expression
    #[arg(long)]
    binding_field: Option<String>,
}

impl CompilerArgs {
    fn build(&self) -> Result<SceneCompiler> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::default(),
        };
        self.apply(&mut config.target);
        Ok(SceneCompiler::from_config(config)?)
    }

    /// Command-line flags win over the configuration file
    fn apply(&self, target: &mut Target) {
        if let Some(point) = &self.point {
            target.point = point.clone();
        }
        if let Some(no_material) = &self.no_material {
            target.no_material = no_material.clone();
        }
        if let Some(result_type) = &self.result_type {
            target.result_type = result_type.clone();
        }
        if let Some(field) = &self.binding_field {
            target.binding_field = Some(field.clone());
        }
    }
}

fn main() -> Result<()> {
    // Generated code goes to stdout, so logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            input,
            output,
            template,
            compiler,
        } => {
            run_compile(&input, output.as_deref(), template.as_deref(), &compiler.build()?)?;
        }
        Commands::Batch {
            inputs,
            out_dir,
            template,
            compiler,
        } => {
            run_batch(&inputs, &out_dir, template.as_deref(), &compiler.build()?)?;
        }
        Commands::Tokens { input } => {
            run_tokens(&input)?;
        }
        Commands::Tree { input } => {
            run_tree(&input)?;
        }
        Commands::Operators { compiler } => {
            run_operators(&compiler.build()?);
        }
        Commands::Repl { compiler } => {
            repl::run_repl(compiler.build()?)?;
        }
        Commands::Watch {
            input,
            output,
            template,
            compiler,
        } => {
            run_watch(&input, output.as_deref(), template.as_deref(), &compiler.build()?)?;
        }
    }

    Ok(())
}

/// Read a scene from a file, or from stdin when the path is `-`
fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read scene from stdin")?;
        return Ok(source);
    }

    std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}

fn read_template(template: Option<&Path>) -> Result<Option<String>> {
    template
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read template {}", path.display()))
        })
        .transpose()
}

/// Compile one source and splice it into the template, if any
fn render(compiler: &SceneCompiler, source: &str, template: Option<&str>) -> Result<String> {
    let fragment = compiler.compile(source)?.into_source();
    match template {
        Some(template) => Ok(splice_into_template(template, &fragment)?),
        None => Ok(fragment),
    }
}

fn write_output(output: Option<&Path>, code: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, code)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote shader code");
        }
        None => print!("{}", code),
    }
    Ok(())
}

fn run_compile(
    input: &Path,
    output: Option<&Path>,
    template: Option<&Path>,
    compiler: &SceneCompiler,
) -> Result<()> {
    let source = read_input(input)?;
    let template = read_template(template)?;
    let code = render(compiler, &source, template.as_deref())
        .with_context(|| format!("Failed to compile {}", input.display()))?;
    write_output(output, &code)
}

/// `<out_dir>/<stem>.glsl`, keeping any dots inside the stem
fn batch_output_path(input: &Path, out_dir: &Path) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .with_context(|| format!("{} has no file name", input.display()))?;
    let mut name = stem.to_os_string();
    name.push(".glsl");
    Ok(out_dir.join(name))
}

/// Output path for every input, failing if two inputs would write the same file
fn batch_output_paths(inputs: &[PathBuf], out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::with_capacity(inputs.len());
    let mut clashes = Vec::new();
    let mut outputs = Vec::with_capacity(inputs.len());

    for input in inputs {
        let output = batch_output_path(input, out_dir)?;
        match claimed.entry(output.clone()) {
            Entry::Occupied(first) => clashes.push(format!(
                "{} and {} both write {}",
                first.get().display(),
                input.display(),
                output.display()
            )),
            Entry::Vacant(slot) => {
                slot.insert(input);
            }
        }
        outputs.push(output);
    }

    if !clashes.is_empty() {
        anyhow::bail!("Conflicting batch outputs:\n  {}", clashes.join("\n  "));
    }
    Ok(outputs)
}

fn compile_to_file(
    compiler: &SceneCompiler,
    input: &Path,
    output: &Path,
    template: Option<&str>,
) -> Result<()> {
    let source = read_input(input)?;
    let code = render(compiler, &source, template)?;
    std::fs::write(output, code).with_context(|| format!("Failed to write {}", output.display()))
}

fn run_batch(
    inputs: &[PathBuf],
    out_dir: &Path,
    template: Option<&Path>,
    compiler: &SceneCompiler,
) -> Result<()> {
    let outputs = batch_output_paths(inputs, out_dir)?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let template = read_template(template)?;

    println!("Compiling {} scene(s) into {}...", inputs.len(), out_dir.display());

    let results: Vec<(&PathBuf, &PathBuf, Result<()>)> = inputs
        .par_iter()
        .zip(&outputs)
        .map(|(input, output)| {
            (
                input,
                output,
                compile_to_file(compiler, input, output, template.as_deref()),
            )
        })
        .collect();

    let mut failures = 0;
    for (input, output, result) in &results {
        match result {
            Ok(()) => println!("  OK     {} -> {}", input.display(), output.display()),
            Err(e) => {
                eprintln!("  FAILED {}: {:#}", input.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} scene(s) failed to compile", failures, inputs.len());
    }

    println!("Compiled {} scene(s)", inputs.len());
    Ok(())
}

fn run_tokens(input: &Path) -> Result<()> {
    let source = read_input(input)?;
    for token in tokenize(&source) {
        println!("{}", token);
    }
    Ok(())
}

fn run_tree(input: &Path) -> Result<()> {
    let source = read_input(input)?;
    let root = parse_scene(&source).with_context(|| format!("Failed to parse {}", input.display()))?;
    print!("{}", root.tree());
    Ok(())
}

fn run_operators(compiler: &SceneCompiler) {
    for (name, operator) in compiler.operators().entries() {
        println!("{:<16} {}", name, operator);
    }
}

fn run_watch(
    input: &Path,
    output: Option<&Path>,
    template: Option<&Path>,
    compiler: &SceneCompiler,
) -> Result<()> {
    use notify::{RecursiveMode, Watcher};
    use std::sync::mpsc::channel;
    use std::time::Duration;

    if !input.exists() {
        anyhow::bail!("Scene file not found: {}", input.display());
    }
    let template = read_template(template)?;

    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            if event.kind.is_modify() {
                let _ = tx.send(());
            }
        }
    })?;

    watcher.watch(input, RecursiveMode::NonRecursive)?;

    eprintln!("Watching {}", input.display());
    eprintln!("Press Ctrl+C to stop\n");

    // Initial compile
    compile_and_report(compiler, input, output, template.as_deref());

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(()) => {
                // Editors often emit several events per save
                while rx.try_recv().is_ok() {}
                compile_and_report(compiler, input, output, template.as_deref());
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}

fn compile_and_report(
    compiler: &SceneCompiler,
    input: &Path,
    output: Option<&Path>,
    template: Option<&str>,
) {
    eprintln!("--- Compiling: {} ---", input.display());

    let result = read_input(input)
        .and_then(|source| render(compiler, &source, template))
        .and_then(|code| write_output(output, &code));

    match result {
        Ok(()) => eprintln!("OK"),
        Err(e) => eprintln!("ERROR: {:#}", e),
    }
}
