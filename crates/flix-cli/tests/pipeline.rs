//! End-to-end CLI pipeline scenarios (§8 S3/S4), driven the same way a
//! real invocation is: a JSON-encoded `SurfaceProgram` on disk, parsed
//! through `Cli::try_parse_from`, executed through `pipeline::execute`.

use std::fs;

use flix_base::Span;
use flix_cli::config::Config;
use flix_cli::pipeline::{execute, EXIT_FRONTEND_ERROR, EXIT_OK};
use flix_cli::Cli;
use flix_ir::surface::{
    SurfaceDefinition, SurfaceEnum, SurfaceExpr, SurfaceExprKind, SurfaceLit, SurfaceProgram, SurfaceType,
};

fn write_program(dir: &tempfile::TempDir, file_name: &str, program: &SurfaceProgram) -> std::path::PathBuf {
    let path = dir.path().join(file_name);
    fs::write(&path, serde_json::to_string(program).unwrap()).unwrap();
    path
}

fn span() -> Span {
    Span::new(0, 1)
}

/// S4: `enum E { case A, case A }` fails weeding with a duplicate-tag
/// error, and the pipeline never reaches the Resolver/Typer/Simplifier —
/// observable from the outside only as exit code 1.
#[test]
fn duplicate_enum_tag_fails_the_frontend() {
    let dir = tempfile::tempdir().unwrap();
    let program = SurfaceProgram {
        decls: vec![flix_ir::surface::SurfaceDecl::Enum(SurfaceEnum {
            name: "E".into(),
            tags: vec![("A".into(), None, Span::new(5, 6)), ("A".into(), None, Span::new(15, 16))],
            span: span(),
        })],
    };
    let path = write_program(&dir, "e.json", &program);

    let cli = Cli::try_parse_from(["flix", "check", path.to_str().unwrap()]).unwrap();
    let config = Config::default();
    assert_eq!(execute(&cli, &config), EXIT_FRONTEND_ERROR);
}

/// A well-formed single-function program clears the whole front end
/// (weed, resolve, type, simplify) and `check` reports success.
#[test]
fn well_formed_function_clears_the_frontend() {
    let dir = tempfile::tempdir().unwrap();
    let body = SurfaceExpr::new(SurfaceExprKind::Lit(SurfaceLit::Bool(true)), span());
    let program = SurfaceProgram {
        decls: vec![flix_ir::surface::SurfaceDecl::Definition(SurfaceDefinition {
            name: "alwaysTrue".into(),
            params: vec!["x".into()],
            annotations: vec![],
            ret_ty: Some(SurfaceType::Named(vec!["Bool".into()])),
            body,
            span: span(),
        })],
    };
    let path = write_program(&dir, "f.json", &program);

    let cli = Cli::try_parse_from(["flix", "check", path.to_str().unwrap()]).unwrap();
    let config = Config::default();
    assert_eq!(execute(&cli, &config), EXIT_OK);
}

/// Loading a path that isn't valid JSON is a frontend-class error, same
/// exit code as any other load/weed/resolve/type failure (§6 exit codes
/// only distinguish solver-nontermination and strict-verify failure).
#[test]
fn malformed_source_file_fails_the_frontend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, b"not json").unwrap();

    let cli = Cli::try_parse_from(["flix", "check", path.to_str().unwrap()]).unwrap();
    let config = Config::default();
    assert_eq!(execute(&cli, &config), EXIT_FRONTEND_ERROR);
}
