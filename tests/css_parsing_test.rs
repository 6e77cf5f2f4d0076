use svgsmith::engine::css::{self, Parser};

#[test]
fn test_parse_all_css_syntax() {
    let css = r#"
    /* コメント */
    body {
        margin: 0;
        padding: 1em 2px 3% 4rem;
        color: #f00;
        background-color: rgb(255, 255, 255);
        border: 1px solid black !important;
    }

    /* 複数セレクタ */
    h1, h2 ,  h3 {
        font-weight: bold;
    }

    #main { content: "a;b{c}"; }
    .card { box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1), 0 1px 3px rgba(0, 0, 0, 0.08); }

    @media (max-width: 600px) { body { color: blue } }

    @keyframes fade {
        to { opacity: 0 }
        from { opacity: 1 }
        50% { opacity: 0.5 }
    }
    "#;

    let sheet = Parser::new(css).parse();

    assert_eq!(sheet.rules["body"]["border"], "1px solid black");
    assert_eq!(sheet.rules["body"]["color"], "#f00");
    assert_eq!(sheet.rules["#main"]["content"], "\"a;b{c}\"");
    assert_eq!(
        sheet.rules[".card"]["box-shadow"],
        "0 4px 6px rgba(0, 0, 0, 0.1), 0 1px 3px rgba(0, 0, 0, 0.08)"
    );

    let frames = sheet.keyframes("fade").unwrap_or_default();
    let offsets: Vec<f32> = frames.iter().map(|f| f.offset_percent).collect();
    assert_eq!(offsets, vec![0.0, 50.0, 100.0]);
    assert_eq!(frames[0].properties["opacity"], "1");
}

#[test]
fn selector_list_registers_every_selector() {
    let sheet = css::parse("h1, h2 ,h3,  .title , #hero { color: gold }");
    assert_eq!(sheet.rules.len(), 5);
    for selector in ["h1", "h2", "h3", ".title", "#hero"] {
        assert_eq!(sheet.rules[selector]["color"], "gold", "selector {selector}");
    }
}

#[test]
fn malformed_declaration_is_dropped() {
    let sheet = css::parse("div{color:}");
    assert!(sheet.rule("div").is_none_or(|d| !d.contains_key("color")));

    let sheet = css::parse("div { color red; : blue; width: 10px }");
    assert_eq!(sheet.rules["div"].len(), 1);
    assert_eq!(sheet.rules["div"]["width"], "10px");
}

#[test]
fn unbalanced_input_does_not_fail() {
    for input in ["}", "div {", "div { color: red", "@keyframes {", "/* never closed", "a { b: \"}"] {
        let _ = css::parse(input);
    }
    let sheet = css::parse("} p { color: red }");
    assert_eq!(sheet.rules["p"]["color"], "red");
}
