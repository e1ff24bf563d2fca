use pretty_assertions::assert_eq;
use tint_theme::resolver::selection_path;
use tint_theme::{
    hex_to_rgb_triple, overrides, rgb_triple_to_hex, schema, DomSnapshot, OverrideRule,
    ScopeResolver, StyleTree, ThemeSession, VariableMap, OVERRIDE_MARKER,
};

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn hex_round_trips_through_triple() {
    for r in (0..=255u32).step_by(17) {
        for g in [0u32, 1, 127, 128, 254, 255] {
            for b in [0u32, 15, 16, 200] {
                let hex = format!("#{:02x}{:02x}{:02x}", r, g, b);
                let triple = hex_to_rgb_triple(&hex).expect("valid hex");
                assert_eq!(rgb_triple_to_hex(&triple), hex);
            }
        }
    }
    let upper = hex_to_rgb_triple("#AbCdEf").unwrap();
    assert_eq!(rgb_triple_to_hex(&upper), "#abcdef");
}

#[test]
fn color_scenario() {
    assert_eq!(hex_to_rgb_triple("#ff8040").as_deref(), Some("255 128 64"));
    assert_eq!(rgb_triple_to_hex("255 128 64"), "#ff8040");
    assert_eq!(rgb_triple_to_hex("255 128"), "");
}

#[test]
fn serialized_output_covers_schema_exactly_once() {
    let inputs = [
        "",
        "garbage { without: variables }",
        "--oui-color-primary: 10 20 30; --oui-color-primary: 1 1 1;",
        ":root { --oui-rounded: 3px; --custom-thing: 1; }\n/* AI Fine-Tune Overrides */\n.x { --oui-spacing-xs: 0; }",
    ];
    for input in inputs {
        let css = VariableMap::parse(input).serialize();
        for entry in schema::entries() {
            let needle = format!("--{}:", entry.name);
            assert_eq!(count(&css, &needle), 1, "{} in output for {:?}", entry.name, input);
        }
    }
}

#[test]
fn parse_and_serialize_scenario() {
    let map = VariableMap::parse("--oui-color-primary: 10 20 30;");
    assert_eq!(map.iter().collect::<Vec<_>>(), vec![("oui-color-primary", "10 20 30")]);

    let css = map.serialize();
    assert!(css.contains("--oui-color-primary: 10 20 30;"));
    assert!(css.contains("--oui-color-danger: 245 97 139;"));
}

#[test]
fn serialize_drops_override_region() {
    let doc = format!(":root {{ --oui-rounded: 3px; }}\n\n{OVERRIDE_MARKER}\n.btn {{ color: red; }}");
    let css = VariableMap::parse(&doc).serialize();
    assert!(!css.contains(OVERRIDE_MARKER));
    assert!(!css.contains(".btn"));
}

#[test]
fn extract_scenario() {
    let doc = ":root{...} /* AI Fine-Tune Overrides */\n.btn { color: red; }";
    let extracted = overrides::extract(doc);
    assert_eq!(extracted.base, ":root{...}");
    assert_eq!(
        extracted.rules(),
        vec![OverrideRule::new(".btn", "color: red")]
    );
    assert_eq!(extracted.rules()[0].properties, "color: red");
}

#[test]
fn upsert_replaces_in_place() {
    let doc = ":root{...} /* AI Fine-Tune Overrides */\n.btn { color: red; }";
    let updated = overrides::upsert_rule(doc, ".btn", "color: blue");

    let rules = overrides::override_rules(&updated);
    assert_eq!(rules, vec![OverrideRule::new(".btn", "color: blue")]);
    assert!(!updated.contains("color: red"));
    assert_eq!(count(&updated, OVERRIDE_MARKER), 1);
}

#[test]
fn upsert_is_idempotent() {
    let base = VariableMap::new().serialize();
    let once = overrides::upsert_rule(&base, ".card > .title", "font-weight: 600;");
    let twice = overrides::upsert_rule(&once, ".card > .title", "font-weight: 600;");

    assert_eq!(once, twice);
    let rules = overrides::override_rules(&twice);
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].selector, ".card > .title");
}

#[test]
fn upsert_keeps_position_and_appends_new() {
    let mut doc = VariableMap::new().serialize();
    for (selector, props) in [(".a", "x: 1"), (".b", "x: 2"), (".a", "x: 3"), (".c", "x: 4")] {
        doc = overrides::upsert_rule(&doc, selector, props);
    }
    let rules = overrides::override_rules(&doc);
    let summary: Vec<_> = rules
        .iter()
        .map(|r| (r.selector.as_str(), r.properties.as_str()))
        .collect();
    assert_eq!(summary, vec![(".a", "x: 3"), (".b", "x: 2"), (".c", "x: 4")]);
}

#[test]
fn upsert_selectors_compare_as_text() {
    let doc = overrides::upsert_rule("", ".a > .b", "x: 1");
    let doc = overrides::upsert_rule(&doc, ".a>.b", "x: 2");
    assert_eq!(overrides::override_rules(&doc).len(), 2);
}

#[test]
fn deleting_last_rule_removes_marker() {
    let base = VariableMap::new().serialize();
    let doc = overrides::upsert_rule(&base, ".btn", "color: red");
    let rule = overrides::override_rules(&doc).remove(0);

    let doc = overrides::delete_rule(&doc, &rule);
    assert!(!doc.contains(OVERRIDE_MARKER));
    assert!(overrides::override_rules(&doc).is_empty());
    assert!(overrides::extract(&doc).rules().is_empty());
}

#[test]
fn deleting_one_of_many_keeps_the_rest() {
    let doc = format!(
        ":root {{}}\n\n{OVERRIDE_MARKER}\n.a {{ x: 1; }}\n.b  {{\n  x: 2;\n}}\n.c {{ x: 3; }}"
    );
    let target = overrides::override_rules(&doc).remove(1);
    let doc = overrides::delete_rule(&doc, &target);

    let selectors: Vec<_> = overrides::override_rules(&doc)
        .into_iter()
        .map(|r| r.selector)
        .collect();
    assert_eq!(selectors, vec![".a", ".c"]);
    assert_eq!(count(&doc, OVERRIDE_MARKER), 1);
}

#[test]
fn repeated_edits_do_not_grow_whitespace() {
    let mut session = ThemeSession::new(VariableMap::new().serialize());
    session.upsert_override(".btn", "color: red");
    let first = session.css().to_string();
    for _ in 0..5 {
        session.update_value("oui-rounded", "4px");
        session.upsert_override(".btn", "color: red");
    }
    assert_eq!(session.css(), first);
    assert!(!session.css().contains("\n\n\n"));
}

#[test]
fn session_edits_preserve_overrides() {
    let mut session = ThemeSession::new(VariableMap::new().serialize());
    session.upsert_override(".btn:hover", "--oui-color-primary: 0 0 0");
    session.update_color("primary", "#102030");
    session.update_value("--oui-font-size-base", "14px");

    let css = session.css();
    assert!(css.contains("  --oui-color-primary: 16 32 48;"));
    assert!(css.contains("font-size: 14px;"));
    assert_eq!(
        session.override_rules(),
        vec![OverrideRule::new(".btn:hover", "--oui-color-primary: 0 0 0")]
    );
    assert_eq!(session.color_hex("primary").as_deref(), Some("#102030"));
}

/// `C > B > A > E`, each declaring its own variable inline
fn nested_page() -> DomSnapshot {
    DomSnapshot::from_json(
        r#"{
            "root": {"tag": "html", "children": [
                {"tag": "body", "children": [
                    {"tag": "div", "classes": ["c"], "style": "--oui-c: 3", "children": [
                        {"tag": "div", "classes": ["b"], "style": "--oui-b: 2", "children": [
                            {"tag": "div", "classes": ["a"], "style": "--oui-a: 1", "children": [
                                {"tag": "span", "classes": ["e"], "style": "--oui-e: 0", "children": [
                                    {"tag": "i", "style": "--oui-inner: 9; color: rgb(var(--oui-b))"}
                                ]}
                            ]}
                        ]}
                    ]}
                ]}
            ]}
        }"#,
    )
    .expect("snapshot")
}

#[test]
fn scoped_variables_exclude_levels_outside_path() {
    let dom = nested_page();
    let e = dom.query_selector(".e").unwrap().unwrap();
    let path = selection_path(&dom, e, 2);
    assert_eq!(path.len(), 3);
    assert_eq!(dom.classes(path[2]), vec!["b"]);

    let vars = ScopeResolver::new(&dom).scoped_variables(&path);
    let names: Vec<_> = vars.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["--oui-a", "--oui-b", "--oui-e"]);
    assert!(vars.iter().all(|v| v.name != "--oui-c"));
    assert!(vars.iter().all(|v| v.name != "--oui-inner"));
}

#[test]
fn scoped_variables_keep_closest_declaration() {
    let mut dom = nested_page();
    let a = dom.query_selector(".a").unwrap().unwrap();
    dom.set_attribute(a, "style", "--oui-a: 1; --oui-b: 20");
    let e = dom.query_selector(".e").unwrap().unwrap();

    let resolver = ScopeResolver::new(&dom);
    let vars = resolver.scoped_variables(&resolver.selection_path(e));
    let b = vars.iter().find(|v| v.name == "--oui-b").unwrap();
    assert_eq!(b.value, "20");
    assert_eq!(b.computed_value, "20");
    assert_eq!(vars.iter().filter(|v| v.name == "--oui-b").count(), 1);
}

#[test]
fn element_variables_resolve_against_the_element() {
    let dom = nested_page();
    let a = dom.query_selector(".a").unwrap().unwrap();
    let vars = ScopeResolver::new(&dom).element_variables(a);

    // `--oui-e` and `--oui-inner` are declared below `a` and have no value
    // there. `--oui-b` is used below `a` and inherited from `.b`.
    let names: Vec<_> = vars.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["--oui-a", "--oui-b"]);
    assert_eq!(vars[1].value, "2");
    assert_eq!(vars[1].computed_value, "2");

    let i = dom.query_selector("i").unwrap().unwrap();
    let inner: Vec<_> = ScopeResolver::new(&dom)
        .element_variables(i)
        .into_iter()
        .map(|v| (v.name, v.value))
        .collect();
    assert_eq!(
        inner,
        vec![
            ("--oui-b".to_string(), "2".to_string()),
            ("--oui-inner".to_string(), "9".to_string()),
        ]
    );
}
