//! Integration tests for tokenizing and parsing scene files

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use sdfc_syntax::{Expr, SyntaxError, TokenKind, parse_scene, tokenize};
use std::path::{Path, PathBuf};

fn scene_files() -> Vec<PathBuf> {
    // Find scenes directory relative to the crate root
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let scenes_dir = Path::new(manifest_dir)
        .parent()
        .expect("Should have parent")
        .parent()
        .expect("Should have grandparent")
        .join("scenes");

    if !scenes_dir.exists() {
        eprintln!("Scenes directory not found at {:?}, skipping", scenes_dir);
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(&scenes_dir)
        .expect("Should read scenes dir")
        .map(|entry| entry.expect("Should read entry").path())
        .filter(|path| path.extension().is_some_and(|e| e == "scene"))
        .collect();
    files.sort();
    files
}

#[test]
fn all_scenes_parse() {
    let files = scene_files();

    for path in &files {
        let source = std::fs::read_to_string(path).expect("Should read file");
        let root = parse_scene(&source)
            .unwrap_or_else(|e| panic!("Scene {} should parse: {}", path.display(), e));
        assert!(root.operator().is_some(), "{}", path.display());
    }
}

#[test]
fn scene_brackets_balance() {
    for path in scene_files() {
        let source = std::fs::read_to_string(&path).expect("Should read file");
        let tokens = tokenize(&source);

        let opens = tokens.iter().filter(|t| t.kind == TokenKind::OpenGroup).count();
        let closes = tokens.iter().filter(|t| t.kind == TokenKind::CloseGroup).count();
        assert_eq!(opens, closes, "{}", path.display());
        assert_eq!(tokens.first().map(|t| &t.kind), Some(&TokenKind::OpenGroup));
    }
}

#[test]
fn printed_scenes_reparse_to_the_same_tree() {
    for path in scene_files() {
        let source = std::fs::read_to_string(&path).expect("Should read file");
        let root = parse_scene(&source).unwrap();
        let printed = root.to_string();

        assert!(!printed.contains('\n'), "{}", path.display());
        assert_eq!(parse_scene(&printed).unwrap(), root, "{}", path.display());
    }
}

#[test]
fn multiline_scene_positions() {
    let source = "(oUnion\n  (pSphere 1)\n  (pBox 1 1 1))";
    let tokens = tokenize(source);

    let box_token = tokens
        .iter()
        .find(|t| t.text() == Some("pBox"))
        .expect("Should find pBox");
    assert_eq!((box_token.line, box_token.column), (3, 4));

    let root = parse_scene(source).unwrap();
    assert_eq!(root.operands().len(), 2);
    assert_eq!(
        root.operands()[1].operands(),
        [Expr::Literal(1.0), Expr::Literal(1.0), Expr::Literal(1.0)]
    );
}

#[test]
fn context_references_must_be_grouped() {
    assert!(parse_scene("(tRot 0 1 0 (.time) (pSphere 1))").is_ok());
    assert!(matches!(
        parse_scene("(tRot 0 1 0 .time (pSphere 1))"),
        Err(SyntaxError::UnexpectedToken { line: 1, column: 13, .. })
    ));
}

#[test]
fn errors_report_positions() {
    let err = parse_scene("(oUnion\n  (pSphere 1)\n  (1 2))").unwrap_err();
    assert!(matches!(
        err,
        SyntaxError::ExpectedOperator {
            line: 3,
            column: 4,
            ..
        }
    ));
}
