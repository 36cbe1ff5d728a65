use super::*;
use facet_testhelpers::test;
use ini_parse::ParseCallback;

#[test]
fn test_parse_simple() {
    let doc = Document::parse("[server]\nhost = localhost\nport = 8080").unwrap();
    assert_eq!(doc.sections.len(), 1);
    assert_eq!(
        doc.get("server", "host").and_then(|p| p.as_str()),
        Some("localhost")
    );
    assert_eq!(doc.get("server", "port").and_then(|p| p.as_i64()), Some(8080));
}

#[test]
fn test_parse_empty() {
    let doc = parse("").unwrap();
    assert!(doc.is_empty());
}

#[test]
fn test_keys_before_header_go_to_default() {
    let doc = parse("name = top\n[s]\nname = inner").unwrap();
    let names: Vec<_> = doc.sections().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["default", "s"]);

    let default = doc.section("default").unwrap();
    assert!(default.implicit);
    assert_eq!(default.start_mark, Mark::new(0, 0, 0));
    assert!(!doc.section("s").unwrap().implicit);
    assert_eq!(doc.get("default", "name").and_then(|p| p.as_str()), Some("top"));
}

#[test]
fn test_inherited_lookup() {
    let source = "[base]\nport = 80\nhost = base.local\n[web:base]\nhost = example.com";
    let doc = parse(source).unwrap();

    let web = doc.section("web").unwrap();
    assert_eq!(web.parent.as_deref(), Some("base"));
    assert_eq!(web.properties.len(), 1);

    // Own keys shadow the parent's.
    assert_eq!(
        doc.get("web", "host").and_then(|p| p.as_str()),
        Some("example.com")
    );
    assert_eq!(doc.get("web", "port").and_then(|p| p.as_i64()), Some(80));
    assert!(doc.get("web", "missing").is_none());
    assert!(doc.get("nope", "port").is_none());
}

#[test]
fn test_ancestry_chain() {
    let doc = parse("[a]\nx = 1\n[b:a]\n[c:b]").unwrap();
    assert_eq!(doc.ancestry("c"), ["c", "b", "a"]);
    assert_eq!(doc.get("c", "x").and_then(|p| p.as_i64()), Some(1));
    assert!(doc.ancestry("zzz").is_empty());
}

#[test]
fn test_inheritance_cycle_terminates() {
    let mut doc = parse("[a]\n[b:a]").unwrap();
    doc.sections[0].parent = Some("b".to_string());
    assert!(doc.get("a", "k").is_none());
    assert_eq!(doc.ancestry("a"), ["a", "b"]);
}

#[test]
fn test_unknown_parent() {
    let err = parse("[web:base]\nhost = x").unwrap_err();
    match err {
        TreeError::Build(BuildError::UnknownParent {
            section,
            parent,
            mark,
        }) => {
            assert_eq!(section, "web");
            assert_eq!(parent, "base");
            assert_eq!(mark, Mark::new(0, 0, 0));
        }
        other => panic!("expected UnknownParent, got {:?}", other),
    }
}

#[test]
fn test_repeated_header_merges() {
    let doc = parse("[a]\nx = 1\n[b]\ny = 2\n[a]\nz = 3").unwrap();
    assert_eq!(doc.sections.len(), 2);
    let a = doc.section("a").unwrap();
    let keys: Vec<_> = a.properties.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, ["x", "z"]);
}

#[test]
fn test_repeated_header_adds_parent() {
    let doc = parse("[a]\n[b]\n[b:a]").unwrap();
    assert_eq!(doc.section("b").unwrap().parent.as_deref(), Some("a"));
}

#[test]
fn test_later_assignment_wins() {
    let doc = parse("[a]\nk = 1\nk = 2").unwrap();
    let a = doc.section("a").unwrap();
    assert_eq!(a.properties.len(), 2);
    assert_eq!(a.get("k").and_then(|p| p.as_i64()), Some(2));
}

#[test]
fn test_empty_section() {
    let doc = parse("[a]\n[b]\nk = v").unwrap();
    assert!(doc.section("a").unwrap().is_empty());
    assert!(!doc.section("b").unwrap().is_empty());
}

#[test]
fn test_property_accessors() {
    let source = "[t]\nhex = 0x1f\nneg = -1_000\nratio = 1.5\nflag = yes\noff = Off\nblank =\nname = hello";
    let doc = parse(source).unwrap();
    let get = |key: &str| doc.get("t", key).unwrap();

    assert_eq!(get("hex").as_i64(), Some(31));
    assert_eq!(get("neg").as_i64(), Some(-1000));
    assert_eq!(get("neg").as_f64(), Some(-1000.0));
    assert_eq!(get("ratio").tag, Tag::Float);
    assert_eq!(get("ratio").as_f64(), Some(1.5));
    assert_eq!(get("flag").as_bool(), Some(true));
    assert_eq!(get("off").as_bool(), Some(false));
    assert_eq!(get("name").as_bool(), None);
    assert_eq!(get("name").as_i64(), None);

    let blank = get("blank");
    assert!(blank.is_null());
    assert_eq!(blank.value, "");
    assert_eq!(blank.as_str(), None);
}

#[test]
fn test_integer_bounds() {
    let doc = parse("[n]\nmin = -9223372036854775808\nmax = 9223372036854775807\nover = 9223372036854775808\nneg_hex = -0x10").unwrap();
    let get = |key: &str| doc.get("n", key).unwrap();
    assert_eq!(get("min").as_i64(), Some(i64::MIN));
    assert_eq!(get("max").as_i64(), Some(i64::MAX));
    assert_eq!(get("over").tag, Tag::Int);
    assert_eq!(get("over").as_i64(), None);
    assert_eq!(get("neg_hex").as_i64(), Some(-16));
}

#[test]
fn test_stray_close_bracket_continues_section() {
    let doc = parse("[a]\n]\nk = v").unwrap();
    assert_eq!(doc.sections.len(), 1);
    assert_eq!(doc.get("a", "k").and_then(|p| p.as_str()), Some("v"));
}

#[test]
fn test_quoted_child_name_with_marker_is_rejected() {
    let err = parse("[base]\nk = 1\n[\"a:b\":base]\n").unwrap_err();
    let TreeError::Parse(inner) = err else {
        panic!("expected a parse error, got {:?}", err);
    };
    assert_eq!(inner.kind, ErrorKind::Scanner);
    assert_eq!(inner.problem_mark, Mark::new(14, 2, 1));
}

#[test]
fn test_quoted_and_commented_values() {
    let doc = parse("[q]\na = \"two words\"\nb = plain ; trailing note\n; whole line\nc = 'it''s'").unwrap();
    assert_eq!(doc.get("q", "a").and_then(|p| p.as_str()), Some("two words"));
    assert_eq!(doc.get("q", "b").and_then(|p| p.as_str()), Some("plain"));
    assert_eq!(doc.get("q", "c").and_then(|p| p.as_str()), Some("it's"));
    assert_eq!(doc.section("q").unwrap().properties.len(), 3);
}

#[test]
fn test_property_marks() {
    let doc = parse("[s]\nkey = v").unwrap();
    let property = doc.get("s", "key").unwrap();
    assert_eq!(property.key_mark, Mark::new(4, 1, 0));
    assert_eq!(property.value_mark, Mark::new(8, 1, 4));
}

#[test]
fn test_parse_error_is_reported() {
    let source = "[server\nport = 80";
    let err = parse(source).unwrap_err();
    let TreeError::Parse(inner) = &err else {
        panic!("expected a parse error, got {:?}", err);
    };
    assert_eq!(inner.problem, "did not find expected <section-end>");
    assert!(err.to_string().starts_with("did not find expected <section-end> at line 2"));

    let rendered = err.render("test.ini", source);
    let stripped = String::from_utf8(strip_ansi_escapes::strip(rendered.as_bytes())).unwrap();
    assert!(stripped.contains("did not find expected <section-end>"));
}

#[test]
fn test_key_without_value_marker() {
    let err = parse("[s]\nflag\nother = 1").unwrap_err();
    let TreeError::Parse(inner) = err else {
        panic!("expected a parse error");
    };
    assert_eq!(inner.problem, "did not find expected <section-value>");
}

#[test]
fn test_builder_rejects_truncated_stream() {
    let mut builder = TreeBuilder::new();
    let events = ini_parse::Parser::new("[a]\nk = v").parse_to_vec().unwrap();
    for event in events.into_iter().take(3) {
        assert!(builder.event(event));
    }
    assert_eq!(builder.finish(), Err(BuildError::Incomplete));
}

#[test]
fn test_builder_rejects_out_of_order_events() {
    let mut builder = TreeBuilder::new();
    let mut events = ini_parse::Parser::new("[a]\nk = v").parse_to_vec().unwrap();
    // Drop DocumentStart.
    events.remove(0);
    let first = events.remove(0);
    assert!(!builder.event(first));
    assert!(matches!(
        builder.finish(),
        Err(BuildError::UnexpectedEvent { .. })
    ));
}
