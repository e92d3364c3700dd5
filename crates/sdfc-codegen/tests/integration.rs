//! Integration tests for scene source to shader fragment compilation

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use sdfc_codegen::{
    CompileError, Config, SceneCompiler, Target, compile_scene, parse_scene,
    splice_into_template,
};
use std::path::Path;

const SCENES: &[&str] = &[
    "(pSphere 1)",
    "(oUnion (pSphere 1) (pBox 1 1 1))",
    "(mLamb 1 (tTrans 0 1 0 (pSphere 1)))",
    "(oSmoothUnion 0.2 (pSphere 1) (pOctahedron 1) (mEmit 2 (pBox 1 1 1)))",
    "(oUnion (oSub (pSphere 1) (oNeg (pSphere 0.5))) (tRot 0 1 0 (.time) (oFbm 0.1 (.tp) (pPlane 0 1 0 0))))",
];

/// Binding indices referenced by a return statement, in order of appearance
fn referenced_bindings(code: &str, prefix: &str) -> Vec<usize> {
    code.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter_map(|word| word.strip_prefix(prefix))
        .filter_map(|index| index.parse().ok())
        .collect()
}

fn prefixed_compiler() -> SceneCompiler {
    SceneCompiler::new().with_target(Target {
        binding_prefix: "prim_".to_string(),
        ..Target::default()
    })
}

#[test]
fn lambertian_sphere_end_to_end() {
    let code = compile_scene("(mLamb 1 (pSphere 1))").expect("Scene should compile");
    let lines: Vec<&str> = code.lines().filter(|l| !l.is_empty()).collect();
    assert_eq!(
        lines,
        vec![
            "sdf_result_t p0 = sdf_result_t(sphere_sdf(p, 1), MAKE_LAMB(1));",
            "return sdf_result_t(p0);",
        ]
    );
}

#[test]
fn bindings_are_referenced_exactly_once_in_order() {
    let compiler = prefixed_compiler();

    for source in SCENES {
        let tree = parse_scene(source).expect("Scene should parse");
        let primitives = tree.count_forms(&|op: &str| op.starts_with('p'));

        let scene = compiler.compile(source).expect("Scene should compile");
        assert_eq!(scene.primitive_count(), primitives, "{}", source);
        assert_eq!(scene.statements().lines().count(), primitives, "{}", source);

        let declared = referenced_bindings(scene.statements(), "prim_");
        assert_eq!(declared, (0..primitives).collect::<Vec<_>>(), "{}", source);

        let mut referenced = referenced_bindings(scene.return_statement(), "prim_");
        referenced.sort_unstable();
        assert_eq!(referenced, (0..primitives).collect::<Vec<_>>(), "{}", source);
    }
}

#[test]
fn compilation_is_deterministic() {
    for source in SCENES {
        let first = compile_scene(source).expect("Scene should compile");
        let second = compile_scene(source).expect("Scene should compile");
        assert_eq!(first, second);
    }
}

#[test]
fn material_and_transform_compose_in_either_order() {
    let expected = "sdf_result_t p0 = sdf_result_t(sphere_sdf(rrot(p, 1, 0, 0, 2), 1), MAKE_EMIT(3));";

    let outer_material = compile_scene("(mEmit 3 (tRot 1 0 0 2 (pSphere 1)))").unwrap();
    let outer_transform = compile_scene("(tRot 1 0 0 2 (mEmit 3 (pSphere 1)))").unwrap();

    assert_eq!(outer_material.lines().next(), Some(expected));
    assert_eq!(outer_transform.lines().next(), Some(expected));
}

#[test]
fn innermost_material_wins() {
    let code = compile_scene("(mLamb 1 (oUnion (mDiel 1.5 (pSphere 1)) (pSphere 2)))").unwrap();
    assert!(code.contains("sphere_sdf(p, 1), MAKE_DIEL(1.5));"));
    assert!(code.contains("sphere_sdf(p, 2), MAKE_LAMB(1));"));
}

#[test]
fn errors_are_distinguishable() {
    assert!(matches!(
        compile_scene("(pSphere 1 2)"),
        Err(CompileError::ArityMismatch {
            expected: 1,
            found: 2,
            ..
        })
    ));
    assert!(matches!(
        compile_scene("(zzz 1)"),
        Err(CompileError::UnknownOperator { ref name }) if name == "zzz"
    ));
    assert!(matches!(
        compile_scene("(oUnion (pSphere 1)"),
        Err(CompileError::Syntax(_))
    ));
    assert!(matches!(
        compile_scene("(mLamb 1 (pSphere 1)) extra"),
        Err(CompileError::Syntax(_))
    ));
}

#[test]
fn configured_operators_compile() {
    let config = Config::from_toml_str(
        r#"
        [target]
        result_type = "Hit"
        binding_field = "d"

        [operators.primitives.pTorus]
        arity = 2
        callee = "torus_sdf"
        "#,
    )
    .expect("Config should parse");

    let compiler = SceneCompiler::from_config(config).expect("Compiler should build");
    let scene = compiler
        .compile("(oUnion (pTorus 1 0.25) (pSphere 1))")
        .expect("Scene should compile");

    assert_eq!(
        scene.statements(),
        "Hit p0 = Hit(torus_sdf(p, 1, 0.25), MAKE_NO_MAT());\nHit p1 = Hit(sphere_sdf(p, 1), MAKE_NO_MAT());\n"
    );
    assert_eq!(scene.return_statement(), "return Hit(union_sdf(p0.d, p1.d));");
}

#[test]
fn compiles_concurrently() {
    let compiler = &prefixed_compiler();
    let expected: Vec<String> = SCENES
        .iter()
        .map(|s| compiler.compile(s).unwrap().into_source())
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = SCENES
            .iter()
            .map(|source| scope.spawn(move || compiler.compile(source).unwrap().into_source()))
            .collect();

        for (handle, expected) in handles.into_iter().zip(&expected) {
            assert_eq!(&handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn spliced_into_template() {
    let template = "sdf_result_t scene(vec3 p) {\n  // SDF_SCENE_PLACEHOLDER\n}\n";
    let code = compile_scene("(pSphere 1)").unwrap();
    let shader = splice_into_template(template, &code).unwrap();

    assert!(shader.starts_with("sdf_result_t scene(vec3 p) {\n  sdf_result_t p0 ="));
    assert!(shader.ends_with("  return sdf_result_t(p0);\n}\n"));
}

#[test]
fn all_scenes_compile() {
    let compiler = SceneCompiler::new();

    // Find scenes directory relative to the crate root
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let scenes_dir = Path::new(manifest_dir)
        .parent()
        .expect("Should have parent")
        .parent()
        .expect("Should have grandparent")
        .join("scenes");

    if !scenes_dir.exists() {
        eprintln!("Scenes directory not found at {:?}, skipping test", scenes_dir);
        return;
    }

    let mut count = 0;
    for entry in std::fs::read_dir(&scenes_dir).expect("Should read scenes dir") {
        let path = entry.expect("Should read entry").path();
        if path.extension().is_some_and(|e| e == "scene") {
            let content = std::fs::read_to_string(&path).expect("Should read file");
            let scene = compiler
                .compile(&content)
                .unwrap_or_else(|e| panic!("Scene {} should compile: {}", path.display(), e));
            assert!(scene.primitive_count() > 0, "{}", path.display());
            count += 1;
        }
    }

    assert!(count > 0, "Should have found at least one scene file");
}
