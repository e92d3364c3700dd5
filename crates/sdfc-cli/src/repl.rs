//! Interactive REPL for scene experimentation
//!
//! Each complete scene typed at the prompt is compiled and its fragment
//! printed. Input with unbalanced parentheses continues on the next line.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, EditMode, Editor};
use sdfc_codegen::SceneCompiler;
use sdfc_syntax::{parse_scene, tokenize};
use std::path::PathBuf;

/// REPL state
pub struct Repl {
    compiler: SceneCompiler,
    editor: Editor<(), DefaultHistory>,
    history_path: Option<PathBuf>,
    last_scene: Option<String>,
}

impl Repl {
    pub fn new(compiler: SceneCompiler) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .edit_mode(EditMode::Emacs)
            .build();

        let mut editor = Editor::with_config(config)?;

        let history_path = history_path();
        if let Some(ref path) = history_path {
            let _ = editor.load_history(path);
        }

        Ok(Self {
            compiler,
            editor,
            history_path,
            last_scene: None,
        })
    }

    /// Run the REPL loop
    pub fn run(&mut self) -> Result<()> {
        println!("{}", WELCOME_MESSAGE);

        let mut buffer = String::new();

        loop {
            let prompt = if buffer.is_empty() { "scene> " } else { "  ...> " };

            match self.editor.readline(prompt) {
                Ok(line) => {
                    let trimmed = line.trim();

                    if trimmed.starts_with(':') && buffer.is_empty() {
                        let _ = self.editor.add_history_entry(trimmed);
                        match self.handle_command(trimmed) {
                            CommandResult::Continue => continue,
                            CommandResult::Exit => break,
                            CommandResult::Error(e) => {
                                eprintln!("Error: {}", e);
                                continue;
                            }
                        }
                    }

                    buffer.push_str(&line);
                    buffer.push('\n');

                    if paren_depth(&buffer) > 0 {
                        continue;
                    }

                    let input = std::mem::take(&mut buffer);
                    if input.trim().is_empty() {
                        continue;
                    }

                    let _ = self.editor.add_history_entry(input.trim());
                    self.compile_and_print(&input);
                }
                Err(ReadlineError::Interrupted) => {
                    if buffer.is_empty() {
                        println!("Use :quit or Ctrl+D to exit");
                    } else {
                        println!("^C - input cancelled");
                        buffer.clear();
                    }
                }
                Err(ReadlineError::Eof) => {
                    println!("\nGoodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = self.editor.save_history(path);
        }

        Ok(())
    }

    fn compile_and_print(&mut self, source: &str) {
        match self.compiler.compile(source) {
            Ok(scene) => {
                print!("{}", scene);
                println!("=> {} primitive(s)", scene.primitive_count());
                self.last_scene = Some(source.trim().to_string());
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    fn handle_command(&mut self, cmd: &str) -> CommandResult {
        let (command, args) = match cmd.split_once(' ') {
            Some((command, args)) => (command, Some(args.trim()).filter(|a| !a.is_empty())),
            None => (cmd, None),
        };

        match command {
            ":help" | ":h" | ":?" => {
                println!("{}", HELP_MESSAGE);
                CommandResult::Continue
            }
            ":quit" | ":q" | ":exit" => CommandResult::Exit,
            ":tokens" | ":t" => match args {
                Some(source) => {
                    for token in tokenize(source) {
                        println!("  {}", token);
                    }
                    CommandResult::Continue
                }
                None => {
                    println!("Usage: :tokens <scene>");
                    CommandResult::Continue
                }
            },
            ":tree" => match args.or(self.last_scene.as_deref()) {
                Some(source) => match parse_scene(source) {
                    Ok(root) => {
                        print!("{}", root.tree());
                        CommandResult::Continue
                    }
                    Err(e) => CommandResult::Error(e.to_string()),
                },
                None => {
                    println!("Usage: :tree <scene>");
                    CommandResult::Continue
                }
            },
            ":load" | ":l" => match args {
                Some(path) => self.load_scene(path),
                None => {
                    println!("Usage: :load <filename>");
                    CommandResult::Continue
                }
            },
            ":last" => {
                match &self.last_scene {
                    Some(source) => println!("{}", source),
                    None => println!("No scene compiled yet"),
                }
                CommandResult::Continue
            }
            _ => CommandResult::Error(format!(
                "Unknown command: {}. Type :help for available commands.",
                command
            )),
        }
    }

    fn load_scene(&mut self, path: &str) -> CommandResult {
        let path = std::path::Path::new(path);

        match std::fs::read_to_string(path) {
            Ok(source) => {
                println!("Loading {}...", path.display());
                self.compile_and_print(&source);
                CommandResult::Continue
            }
            Err(e) => CommandResult::Error(format!("Failed to read {}: {}", path.display(), e)),
        }
    }
}

/// Result of handling a command
enum CommandResult {
    Continue,
    Exit,
    Error(String),
}

/// Open parentheses minus closed ones
///
/// A negative depth means the input already has a stray `)`; the compiler
/// reports that, so only a positive depth asks for more input.
fn paren_depth(input: &str) -> i32 {
    input.chars().fold(0, |depth, c| match c {
        '(' => depth + 1,
        ')' => depth - 1,
        _ => depth,
    })
}

fn history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("sdfc").join("repl_history"))
}

const WELCOME_MESSAGE: &str = r#"
sdfc interactive scene compiler

  Type a scene to see the GLSL it compiles to, e.g. (mLamb 1 (pSphere 1))
  Type :help for commands.
"#;

const HELP_MESSAGE: &str = r#"
Commands:
  :help, :h, :?       - Show this help message
  :quit, :q, :exit    - Exit the REPL
  :tokens <scene>     - Show the token stream of a scene
  :tree [scene]       - Show the expression tree (defaults to the last scene)
  :load <file>        - Compile a scene file
  :last               - Show the last scene that compiled

Tips:
  - Unfinished scenes (unbalanced parentheses) continue on the next line
  - Use Ctrl+C to cancel current input, Ctrl+D to exit
"#;

/// Entry point for the REPL command
pub fn run_repl(compiler: SceneCompiler) -> Result<()> {
    let mut repl = Repl::new(compiler)?;
    repl.run()
}
