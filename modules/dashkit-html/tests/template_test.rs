//! Composition properties of the template builder.

use dashkit_html::{escape, html, is_escaped, trust_html, SafeFragment, TemplateValue};

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

#[test]
fn escaped_output_never_contains_raw_markup_characters() {
    let alphabet = ['&', '<', '>', '"', '\'', 'a', ' ', ';', '#', 'é'];
    // Every string of length 0..=3 over the alphabet.
    let mut inputs = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..3 {
        frontier = frontier
            .iter()
            .flat_map(|prefix| alphabet.iter().map(move |ch| format!("{prefix}{ch}")))
            .collect();
        inputs.extend(frontier.iter().cloned());
    }

    for input in &inputs {
        let escaped = escape(input);
        assert!(is_escaped(&escaped), "raw markup survived escaping {input:?} -> {escaped:?}");
        let rendered = html!("<p>" {input} "</p>");
        assert!(is_escaped(
            rendered
                .as_str()
                .trim_start_matches("<p>")
                .trim_end_matches("</p>")
        ));
    }
}

#[test]
fn values_are_escaped_but_literals_are_not() {
    let fragment = html!("<a href=\"/x\">" {"<script>"} "</a>");
    assert_eq!(fragment.as_str(), "<a href=\"/x\">&lt;script&gt;</a>");
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

#[test]
fn nested_fragment_is_not_escaped_twice() {
    let inner = html!("" {"a & b"} "");
    let outer = html!("<b>" {inner} "</b>");
    assert_eq!(outer.as_str(), "<b>a &amp; b</b>");

    let authored = html!("a &amp; b");
    assert_eq!(html!("<b>" {authored} "</b>").as_str(), "<b>a &amp; b</b>");
}

#[test]
fn deep_nesting_keeps_inner_text_unchanged() {
    let mut fragment = html!("" {"x<y"} "");
    for _ in 0..10 {
        fragment = html!("<div>" {fragment} "</div>");
    }
    let expected = format!("{}x&lt;y{}", "<div>".repeat(10), "</div>".repeat(10));
    assert_eq!(fragment.as_str(), expected);
}

#[test]
fn arrays_of_fragments_flatten_without_separator() {
    let items = [html!("<i>1</i>"), html!("<i>2</i>")];
    assert_eq!(html!({items}).as_str(), "<i>1</i><i>2</i>");
}

#[test]
fn fragments_inside_nested_arrays_stay_verbatim() {
    let nested = vec![
        vec![TemplateValue::from(html!("<hr>")), TemplateValue::from("<hr>")],
        vec![],
        vec![TemplateValue::List(vec![TemplateValue::from(html!("<br>"))])],
    ];
    assert_eq!(html!({nested}).as_str(), "<hr>&lt;hr&gt;<br>");
}

#[test]
fn empty_array_contributes_nothing() {
    let nothing: Vec<SafeFragment> = Vec::new();
    assert_eq!(html!("<ul>" {nothing} "</ul>").as_str(), "<ul></ul>");
}

#[test]
fn null_and_missing_values_render_empty() {
    let missing: Option<u32> = None;
    assert_eq!(
        html!("[" {missing} "|" {TemplateValue::Null} "]").as_str(),
        "[|]"
    );
}

#[test]
fn identical_inputs_give_identical_payloads() {
    let build = |name: &str, count: u32| html!("<span title=\"" {name} "\">" {count} "</span>");
    assert_eq!(build("O'Brien", 3), build("O'Brien", 3));
    assert_eq!(build("O'Brien", 3).as_str(), build("O'Brien", 3).as_str());
}

// ---------------------------------------------------------------------------
// Trusted bypass
// ---------------------------------------------------------------------------

#[test]
fn trusted_bypass_is_opt_in() {
    let input = "<img onerror=x>";

    let escaped = html!("<div>" {input} "</div>");
    assert_eq!(escaped.as_str(), "<div>&lt;img onerror=x&gt;</div>");

    let trusted = html!("<div>" {trust_html(input)} "</div>");
    assert_eq!(trusted.as_str(), "<div><img onerror=x></div>");
}
