//! End-to-end tests for the binding form compiler

use super::*;

fn targets(names: &[&str]) -> Element {
    Element::List(names.iter().map(|n| Element::symbol(*n)).collect())
}

fn pair(key: &str, def: &str) -> KeyDefEntry {
    KeyDefEntry::plain(Element::string(key), Element::symbol(def))
}

fn compile_with(src: &str, options: CompileOptions) -> Result<Vec<Batch>, CompileError> {
    let elements = read(src).expect("test source should read");
    compile(&elements, options)
}

fn compile_default(src: &str) -> Result<Vec<Batch>, CompileError> {
    compile_with(src, CompileOptions::default())
}

#[test]
fn test_single_separator_single_batch() {
    let batches = compile_default(r#"mapA | "a" defA "b" defB"#).unwrap();

    assert_eq!(batches.len(), 1);
    assert_eq!(
        batches[0].settings(),
        &Settings::new().with(KEYMAPS, targets(&["mapA"]))
    );
    assert_eq!(batches[0].entries(), &[pair("a", "defA"), pair("b", "defB")]);
}

#[test]
fn test_n_sections_n_batches_in_order() {
    let batches = compile_default(
        r#"mapA | "a" defA | :prefix "SPC" "b" defB | :infix "f" "c" defC "d" defD"#,
    )
    .unwrap();

    assert_eq!(batches.len(), 3);
    assert_eq!(batches[0].entries(), &[pair("a", "defA")]);
    assert_eq!(batches[1].entries(), &[pair("b", "defB")]);
    assert_eq!(batches[2].entries(), &[pair("c", "defC"), pair("d", "defD")]);
}

#[test]
fn test_options_carry_across_sections() {
    let batches = compile_default(r#"mapA | :prefix "SPC" "a" defA | "b" defB"#).unwrap();

    assert_eq!(batches[0].settings().get("prefix"), Some(&Element::string("SPC")));
    assert_eq!(
        batches[1].settings().get("prefix"),
        Some(&Element::string("SPC")),
        "later sections inherit earlier overrides"
    );
}

#[test]
fn test_later_option_overrides_earlier() {
    let batches =
        compile_default(r#"mapA | :prefix "SPC" "a" defA | :prefix "," "b" defB"#).unwrap();

    assert_eq!(batches[0].settings().get("prefix"), Some(&Element::string("SPC")));
    assert_eq!(batches[1].settings().get("prefix"), Some(&Element::string(",")));
}

#[test]
fn test_clearing_separator_restores_defaults() {
    let batches = compile_default(r#"mapA | :infix "x" "a" defA || "b" defB"#).unwrap();

    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].settings().get("infix"), Some(&Element::string("x")));
    assert_eq!(
        batches[1].settings(),
        &Settings::new().with(KEYMAPS, targets(&["mapA"])),
        "clearing keeps only the leading default section"
    );
}

#[test]
fn test_clearing_keeps_default_options() {
    let batches =
        compile_default(r#":states normal mapA | :prefix "SPC" "a" defA || "b" defB"#).unwrap();

    let expected = Settings::new()
        .with(STATES, targets(&["normal"]))
        .with(KEYMAPS, targets(&["mapA"]));
    assert_eq!(batches[1].settings(), &expected);
}

#[test]
fn test_clear_policy_all_empties_settings() {
    let options = CompileOptions::default().clear_policy(ClearPolicy::All);
    let batches = compile_with(r#"mapA | :infix "x" "a" defA || "b" defB"#, options).unwrap();

    assert!(batches[1].settings().is_empty());
}

#[test]
fn test_empty_sections_emit_no_batch() {
    let batches = compile_default(r#":prefix "SPC" | | :infix "f" | "a" defA ||"#).unwrap();

    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].settings().get("infix"), Some(&Element::string("f")));
}

#[test]
fn test_last_consecutive_separator_wins() {
    // Non-clearing after clearing: settings were cleared, then carried
    let batches = compile_default(r#"mapA | :infix "x" "a" defA || | "b" defB"#).unwrap();
    assert!(batches[1].settings().get("infix").is_none());

    // Clearing after non-clearing: cleared
    let batches = compile_default(r#"mapA | :infix "x" "a" defA | || "b" defB"#).unwrap();
    assert!(batches[1].settings().get("infix").is_none());
}

#[test]
fn test_options_inside_section_apply_at_flush() {
    let batches = compile_default(r#"mapA | "a" defA :prefix "SPC" "b" defB"#).unwrap();

    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].settings().get("prefix"), Some(&Element::string("SPC")));
    assert_eq!(batches[0].len(), 2);
}

#[test]
fn test_compilation_is_deterministic() {
    let src = r#"normal mapA | :prefix "SPC" "a" defA || :ext t ("b" defB :wk "b") | "c" [d e]"#;
    let first = compile_default(src).unwrap();
    for _ in 0..5 {
        assert_eq!(compile_default(src).unwrap(), first);
    }
}

#[test]
fn test_extended_only_mode_never_pairs() {
    let batches =
        compile_default(r#"mapA | :ext t ("a" defA) ("b" defB "c") ("d") | "e" defE"#).unwrap();

    assert_eq!(batches.len(), 2);
    let entries = batches[0].entries();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(KeyDefEntry::is_extended));
    assert_eq!(
        entries[1],
        KeyDefEntry::extended(Element::List(vec![
            Element::string("b"),
            Element::symbol("defB"),
            Element::string("c"),
        ]))
    );
    assert_eq!(batches[1].entries(), &[pair("e", "defE")], "mode ends at the separator");
}

#[test]
fn test_extended_only_mode_rejects_atoms() {
    let err = compile_default(r#"mapA | :ext t ("a" defA) "b" defB"#).unwrap_err();
    assert!(matches!(err, CompileError::MalformedInput { index: 5, .. }));
}

#[test]
fn test_extended_mode_survives_options_in_section() {
    let batches = compile_default(r#"mapA | :ext t ("a" defA) :prefix "SPC" ("b" defB)"#).unwrap();
    assert_eq!(batches[0].len(), 2);
    assert!(batches[0].entries().iter().all(KeyDefEntry::is_extended));
}

#[test]
fn test_ext_nil_returns_to_pairs() {
    let batches = compile_default(r#"mapA | :ext t ("a" defA) :ext nil "b" defB"#).unwrap();
    assert_eq!(
        batches[0].entries(),
        &[
            KeyDefEntry::extended(Element::List(vec![
                Element::string("a"),
                Element::symbol("defA")
            ])),
            pair("b", "defB"),
        ]
    );
}

#[test]
fn test_marked_extended_entry_between_pairs() {
    let batches =
        compile_default(r#"mapA | "a" defA :ext ("b" defB :which-key "b") "c" defC"#).unwrap();
    let entries = batches[0].entries();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0], pair("a", "defA"));
    assert!(entries[1].is_extended());
    assert_eq!(entries[2], pair("c", "defC"));
}

#[test]
fn test_ext_empty_list_reads_as_nil() {
    let batches = compile_default(r#"mapA | :ext t ("a" defA) :ext () "b" defB"#).unwrap();
    assert_eq!(batches[0].len(), 2);
    assert!(batches[0].entries()[0].is_extended());
    assert_eq!(batches[0].entries()[1], pair("b", "defB"));

    let batches = compile_default(r#"mapA | :ext () "a" defA"#).unwrap();
    assert_eq!(batches[0].entries(), &[pair("a", "defA")], "no empty extended entry");
}

#[test]
fn test_extended_only_mode_rejects_empty_entry() {
    let err = compile_default(r#"mapA | :ext t () ("a" defA)"#).unwrap_err();
    assert!(matches!(err, CompileError::MalformedInput { index: 4, .. }));
}

#[test]
fn test_empty_list_is_not_a_context_value() {
    let err = compile_default(r#"() | "a" defA"#).unwrap_err();
    assert!(matches!(err, CompileError::MalformedInput { index: 0, .. }));

    let err = compile_default(r#":keymaps () | "a" defA"#).unwrap_err();
    assert_eq!(err.index(), 1);
}

#[test]
fn test_ext_in_default_section_rejected() {
    let err = compile_default(r#":ext t mapA | ("a" defA)"#).unwrap_err();
    assert_eq!(err.index(), 0);
}

#[test]
fn test_heuristic_single_identifier_is_context() {
    let options = CompileOptions::default().heuristic(true);
    let batches = compile_with(r#"mapA "a" defA"#, options).unwrap();

    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].settings().keymaps(), Some(&targets(&["mapA"])));
    assert_eq!(batches[0].entries(), &[pair("a", "defA")]);
}

#[test]
fn test_heuristic_disabled_same_input_fails() {
    let err = compile_default(r#"mapA "a" defA"#).unwrap_err();

    assert!(matches!(err, CompileError::MalformedInput { index: 0, .. }));
    assert_eq!(err.hint(), Some("heuristic mode disabled; separator required here"));
}

#[test]
fn test_heuristic_states_and_keymaps() {
    let options = CompileOptions::default().heuristic(true);
    let batches = compile_with(r#":prefix "SPC" (normal visual) mapA "a" defA"#, options).unwrap();

    let settings = batches[0].settings();
    assert_eq!(settings.states(), Some(&targets(&["normal", "visual"])));
    assert_eq!(settings.keymaps(), Some(&targets(&["mapA"])));
    assert_eq!(settings.get("prefix"), Some(&Element::string("SPC")));
}

#[test]
fn test_heuristic_without_context_values() {
    let options = CompileOptions::default().heuristic(true);
    let batches = compile_with(r#":keymaps mapA "a" defA "b" defB"#, options).unwrap();
    assert_eq!(batches[0].len(), 2);
}

#[test]
fn test_heuristic_cannot_infer_function() {
    let options = CompileOptions::default().heuristic(true);
    let err = compile_with(r#"mapA #'defA "a" defA"#, options).unwrap_err();
    assert_eq!(err.index(), 1);
}

#[test]
fn test_heuristic_clearing_restores_inferred_context() {
    // A separator anywhere switches to the explicit path
    let options = CompileOptions::default().heuristic(true);
    let batches = compile_with(r#"mapA | :infix "x" "a" defA || "b" defB"#, options).unwrap();
    assert_eq!(batches[1].settings().keymaps(), Some(&targets(&["mapA"])));
    assert!(batches[1].settings().get("infix").is_none());
}

#[test]
fn test_odd_run_is_unpaired() {
    let err = compile_default(r#"mapA | "a" defA "b""#).unwrap_err();
    assert_eq!(
        err,
        CompileError::UnpairedKey {
            index: 4,
            key: Element::string("b"),
        }
    );
}

#[test]
fn test_no_separator_is_malformed() {
    let err = compile_default(r#":keymaps mapA"#).unwrap_err();
    assert!(matches!(err, CompileError::MalformedInput { index: 2, .. }));

    let err = compile_default("").unwrap_err();
    assert_eq!(err.index(), 0);
}

#[test]
fn test_empty_input_heuristic_has_no_batches() {
    let options = CompileOptions::default().heuristic(true);
    assert!(compile_with("", options).unwrap().is_empty());
    assert!(compile_with("mapA", options).unwrap().is_empty());
}

#[test]
fn test_unknown_option_is_error() {
    let err = compile_default(r#"mapA | :prefx "SPC" "a" defA"#).unwrap_err();
    assert_eq!(
        err,
        CompileError::UnknownOption {
            index: 2,
            name: "prefx".to_string(),
            suggestion: Some("prefix".to_string()),
        }
    );
}

#[test]
fn test_registered_option_becomes_setting() {
    let registry = OptionRegistry::builtin()
        .with_option(OptionSpec::setting("repeat", ValueShape::Boolean, "Repeatable keys"))
        .unwrap();
    let compiler = Compiler::new(registry, CompileOptions::default());
    let elements = read(r#"mapA | :repeat t "a" defA"#).unwrap();

    let batches = compiler.compile(&elements).unwrap();
    assert_eq!(batches[0].settings().get("repeat"), Some(&Element::symbol("t")));
}

#[test]
fn test_definition_shapes() {
    let batches = compile_default(r#"mapA | "a" #'defA "b" "C-x b" [c] nil "d" [x y]"#).unwrap();
    let entries = batches[0].entries();

    assert_eq!(entries.len(), 4);
    assert_eq!(
        entries[0],
        KeyDefEntry::plain(Element::string("a"), Element::function("defA"))
    );
    assert_eq!(
        entries[1],
        KeyDefEntry::plain(Element::string("b"), Element::string("C-x b"))
    );
    assert_eq!(
        entries[2],
        KeyDefEntry::plain(
            Element::Vector(vec![Element::symbol("c")]),
            Element::symbol("nil")
        )
    );
    assert_eq!(
        entries[3],
        KeyDefEntry::plain(
            Element::string("d"),
            Element::Vector(vec![Element::symbol("x"), Element::symbol("y")])
        )
    );
}

#[test]
fn test_list_definition_rejected() {
    let err = compile_default(r#"mapA | "a" (lambda () foo)"#).unwrap_err();
    assert!(matches!(err, CompileError::MalformedInput { index: 3, .. }));
}

#[test]
fn test_identifier_key_rejected() {
    let err = compile_default(r#"mapA | "a" defA defB defC"#).unwrap_err();
    assert!(matches!(err, CompileError::MalformedInput { index: 4, .. }));
}

#[test]
fn test_batches_serialize_to_json() {
    let batches = compile_default(r#"mapA | "a" defA :ext ("b" defB)"#).unwrap();
    let json = serde_json::to_value(&batches).unwrap();

    assert_eq!(json[0]["settings"]["keymaps"]["list"][0]["symbol"], "mapA");
    assert_eq!(json[0]["entries"][0]["form"], "plain");
    assert_eq!(json[0]["entries"][1]["form"], "extended");
}
