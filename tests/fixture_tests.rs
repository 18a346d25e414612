//! Integration tests over the SIL files in `tests/fixtures`.

use bumpalo::Bump;
use silcast::cast::{AstFactory, CAst, NodeKind, Position};
use silcast::core::{BuiltinFilter, CollectingSink, DiagnosticKind, TranslationSession, TranslatorConfig};
use silcast::sil::{parse_module, InstKind, SilModule};
use silcast::translator::ReturnType;
use silcast::translate_module;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture_path(filename: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(filename)
}

/// Helper to load and parse a SIL file from the fixture directory
fn load_sil_file(filename: &str) -> SilModule {
    let path = fixture_path(filename);
    let contents = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));

    parse_module(&contents).unwrap_or_else(|e| panic!("Failed to parse {filename}: {e}"))
}

/// Helper to check if output contains expected patterns
fn check_output_contains(output: &str, patterns: &[&str]) {
    for pattern in patterns {
        assert!(
            output.contains(pattern),
            "Output missing expected pattern: '{pattern}'\nFull output:\n{output}"
        );
    }
}

fn counter_config() -> TranslatorConfig {
    let builtins = BuiltinFilter::from_file(fixture_path("builtins.txt"))
        .unwrap_or_else(|e| panic!("Failed to read builtins: {e}"));
    TranslatorConfig::default().with_builtins(builtins)
}

#[test]
fn test_counter_sil_parses() {
    let module = load_sil_file("counter.sil");

    assert_eq!(module.source_file.as_deref(), Some("counter.swift"));
    assert_eq!(module.functions.len(), 4);

    let main = &module.functions[0];
    assert_eq!(main.blocks.len(), 3);
    assert_eq!(main.instruction_count(), 16);
    assert_eq!(main.arguments[1].name, None);
    assert_eq!(main.blocks[0].instructions[9].kind, InstKind::Apply);

    assert!(module.function("$s7counter5resetyyF").unwrap().is_empty());
}

#[test]
fn test_counter_entities() {
    let _ = env_logger::builder().is_test(true).try_init();
    let module = load_sil_file("counter.sil");
    let config = counter_config();

    let arena = Bump::new();
    let session = TranslationSession::new(&arena);
    let mut ast = CAst::new(&session);
    let mut sink = CollectingSink::new();

    let translated = translate_module(&mut ast, &session, &module, &config, &mut sink)
        .unwrap_or_else(|e| panic!("Translation failed: {e}"));

    let output: String = translated.entities.iter().map(|e| e.to_string()).collect();
    check_output_contains(
        &output,
        &[
            "FUNCTION NAME: main",
            "# OF BASIC BLOCKS: 3",
            "# OF CALL NODES: 1",
            "# OF CONTROL FLOW NODES: 3",
            "FUNCTION NAME: counter.step(Int) -> Int",
            "# OF BASIC BLOCKS: 1",
        ],
    );

    assert_eq!(translated.entities.len(), 2);
    assert_eq!(translated.stats.builtins_skipped, 1);
    assert_eq!(translated.stats.empty_functions_skipped, 1);
    assert_eq!(sink.count(DiagnosticKind::EmptyFunction), 1);
    assert_eq!(sink.diagnostics().len(), 1);

    let main = translated.script().unwrap();
    assert_eq!(main.position, Position::new(1, 1, 12, 1));
    assert_eq!(main.return_type, ReturnType::Single("Int32".to_string()));
    assert_eq!(main.parameters.len(), 1);
    assert_eq!(main.parameters[0].name, "argc");
    assert_eq!(main.decl_nodes.len(), 6);

    let call = main.call_nodes[0];
    let info = main.node_info.get(call).unwrap();
    assert_eq!(info.instruction, Some(InstKind::Apply));
    assert_eq!(info.position, Position::new(7, 5, 7, 5));
    assert_eq!(info.file.as_deref(), Some("counter.swift"));

    let bb0 = ast.children(main.blocks[0]);
    assert_eq!(ast.dump(bb0[0]), "(LabelStmt \"bb0\")");
    assert!(bb0[1..6].iter().all(|&d| ast.kind(d) == NodeKind::DeclStmt));
    assert_eq!(ast.kind(bb0[6]), NodeKind::Empty);

    let slot = bb0
        .iter()
        .copied()
        .find(|&n| {
            ast.kind(n) == NodeKind::Assign
                && ast.kind(ast.children(n)[1]) == NodeKind::ObjectRef
        })
        .unwrap();
    assert_eq!(main.position_of(slot), Position::new(5, 5, 5, 5));

    let step = translated.entity("counter.step(Int) -> Int").unwrap();
    assert_eq!(step.return_type, ReturnType::Single("Int".to_string()));
    assert_eq!(step.cf_nodes.len(), 1);
    assert!(step.call_nodes.is_empty());
}

#[test]
fn test_counter_without_empty_nodes() {
    let module = load_sil_file("counter.sil");
    let config = counter_config().with_empty_nodes(false);

    let arena = Bump::new();
    let session = TranslationSession::new(&arena);
    let mut ast = CAst::new(&session);
    let mut sink = CollectingSink::new();

    let translated = translate_module(&mut ast, &session, &module, &config, &mut sink).unwrap();
    let main = &translated.entities[0];

    for &block in &main.blocks {
        assert!(ast
            .children(block)
            .iter()
            .all(|&n| ast.kind(n) != NodeKind::Empty));
    }
    assert!(main.call_nodes.is_empty());
    assert!(main.cf_nodes.is_empty());

    // bb2 only deallocates and returns
    assert_eq!(ast.dump(main.blocks[2]), "(BlockStmt\n  (LabelStmt \"bb2\"))");
}
