//! Dialog markup and open/close helpers.
//!
//! A dialog is a `<dialog>` element found by id. Visibility is the `open`
//! attribute; toggling it keeps the dialog's body and listeners.

use dashkit_dom::{Document, DomResult};
use dashkit_html::{attr, html, SafeFragment};

use crate::icon::Icon;

pub const CLOSE_SELECTOR: &str = "[data-dialog-close]";
const BODY_SELECTOR: &str = ".dialog-body";

pub fn dialog(id: &str, title: &str, body: &SafeFragment) -> SafeFragment {
    let title_id = format!("{id}-title");
    html!(
        "<dialog class=\"dialog\"" {attr("id", id)} {attr("aria-labelledby", &title_id)} ">"
        "<header class=\"dialog-header\">"
        "<h2" {attr("id", &title_id)} ">" {title} "</h2>"
        "<button type=\"button\" class=\"btn-icon\" data-dialog-close aria-label=\"Close\">" {Icon::Close.render()} "</button>"
        "</header>"
        "<div class=\"dialog-body\">" {body} "</div>"
        "</dialog>"
    )
}

/// Show the dialog. Returns `false` when no element has this id.
pub fn open_dialog(doc: &mut Document, id: &str) -> DomResult<bool> {
    set_open(doc, id, true)
}

/// Hide the dialog. Returns `false` when no element has this id.
pub fn close_dialog(doc: &mut Document, id: &str) -> DomResult<bool> {
    set_open(doc, id, false)
}

pub fn is_dialog_open(doc: &Document, id: &str) -> bool {
    doc.get_by_id(id)
        .and_then(|el| doc.has_attr(el, "open").ok())
        .unwrap_or(false)
}

/// Replace the body of an existing dialog.
pub fn set_dialog_body(doc: &mut Document, id: &str, body: &SafeFragment) -> DomResult<bool> {
    let Some(dialog) = doc.get_by_id(id) else {
        return Ok(false);
    };
    match doc.query_in(dialog, BODY_SELECTOR)? {
        Some(slot) => {
            doc.commit(slot, body)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn set_open(doc: &mut Document, id: &str, open: bool) -> DomResult<bool> {
    let Some(dialog) = doc.get_by_id(id) else {
        tracing::debug!(id, "Dialog not found");
        return Ok(false);
    };
    doc.set_attr(dialog, "open", open.then_some(""))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_dialog() -> Document {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let markup = dialog("confirm", "Delete <idea>?", &html!("<p>Sure?</p>"));
        doc.commit(body, &markup).unwrap();
        doc
    }

    #[test]
    fn dialog_markup_escapes_title() {
        let markup = dialog("confirm", "Delete <idea>?", &SafeFragment::empty());
        assert!(markup.as_str().contains("<h2 id=\"confirm-title\">Delete &lt;idea&gt;?</h2>"));
    }

    #[test]
    fn open_and_close_toggle_visibility() {
        let mut doc = doc_with_dialog();
        assert!(!is_dialog_open(&doc, "confirm"));

        assert!(open_dialog(&mut doc, "confirm").unwrap());
        assert!(is_dialog_open(&doc, "confirm"));

        assert!(close_dialog(&mut doc, "confirm").unwrap());
        assert!(!is_dialog_open(&doc, "confirm"));
    }

    #[test]
    fn unknown_dialog_is_not_an_error() {
        let mut doc = doc_with_dialog();
        assert!(!open_dialog(&mut doc, "missing").unwrap());
        assert!(!is_dialog_open(&doc, "missing"));
    }

    #[test]
    fn body_survives_toggle_and_can_be_replaced() {
        let mut doc = doc_with_dialog();
        open_dialog(&mut doc, "confirm").unwrap();
        assert!(doc.query("dialog[open] .dialog-body p").unwrap().is_some());

        assert!(set_dialog_body(&mut doc, "confirm", &html!("<em>changed</em>")).unwrap());
        let dialog = doc.get_by_id("confirm").unwrap();
        assert!(doc.text(dialog).unwrap().contains("changed"));
    }
}
