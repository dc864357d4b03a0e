//! Whitespace minification.
//!
//! Runs of HTML whitespace collapse to one space, and spaces are dropped at the
//! start and end of blocks, around `<br>`, and after another space. `<pre>`
//! content is left alone. Non-breaking spaces are content, not whitespace.

use std::sync::OnceLock;

use regex::Regex;

use super::dom::HtmlNode;

fn whitespace_run() -> &'static Regex {
    static WS: OnceLock<Regex> = OnceLock::new();
    WS.get_or_init(|| Regex::new(r"[ \t\n\r\x0C]+").expect("Invalid whitespace regex"))
}

/// Elements that start and end a line of text.
pub(crate) fn is_block_tag(tag: &str) -> bool {
    matches!(
        tag,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "body"
            | "caption"
            | "dd"
            | "details"
            | "dialog"
            | "div"
            | "dl"
            | "dt"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "form"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "hgroup"
            | "hr"
            | "html"
            | "li"
            | "main"
            | "nav"
            | "ol"
            | "p"
            | "pre"
            | "section"
            | "summary"
            | "table"
            | "tbody"
            | "td"
            | "tfoot"
            | "th"
            | "thead"
            | "tr"
            | "ul"
    )
}

/// Inline elements that render as content of their own.
pub(crate) fn is_embedded_tag(tag: &str) -> bool {
    matches!(
        tag,
        "img" | "iframe" | "embed" | "video" | "audio" | "object" | "svg" | "canvas"
    )
}

/// True while the last emitted character was a space or nothing has been
/// emitted on the current line yet.
struct State {
    after_space: bool,
}

/// Minifies whitespace in `nodes`, treating them as the content of one block.
pub(crate) fn minify(nodes: &mut Vec<HtmlNode>) {
    let mut state = State { after_space: true };
    minify_children(nodes, &mut state, false);
    trim_trailing(nodes);
}

fn minify_children(nodes: &mut Vec<HtmlNode>, state: &mut State, in_pre: bool) {
    for node in std::mem::take(nodes) {
        match node {
            HtmlNode::Text(text) if in_pre => {
                state.after_space = text.ends_with(char::is_whitespace);
                nodes.push(HtmlNode::Text(text));
            }
            HtmlNode::Text(text) => {
                let collapsed = whitespace_run().replace_all(&text, " ");
                let mut kept = collapsed.as_ref();
                if state.after_space {
                    kept = kept.strip_prefix(' ').unwrap_or(kept);
                }
                if kept.is_empty() {
                    continue;
                }
                state.after_space = kept.ends_with(' ');
                nodes.push(HtmlNode::Text(kept.to_string()));
            }
            HtmlNode::Element(mut el) => {
                let tag = el.tag.as_str();
                if is_block_tag(tag) {
                    if !in_pre {
                        trim_trailing(nodes);
                    }
                    let pre = in_pre || tag == "pre";
                    state.after_space = true;
                    minify_children(&mut el.children, state, pre);
                    if !pre {
                        trim_trailing(&mut el.children);
                    }
                    state.after_space = true;
                } else if tag == "br" {
                    if !in_pre {
                        trim_trailing(nodes);
                    }
                    state.after_space = true;
                } else if is_embedded_tag(tag) {
                    state.after_space = false;
                } else {
                    minify_children(&mut el.children, state, in_pre);
                }
                nodes.push(HtmlNode::Element(el));
            }
        }
    }
}

/// Drops trailing spaces, descending into trailing inline elements.
///
/// Returns true once content that must stay has been reached.
fn trim_trailing(nodes: &mut Vec<HtmlNode>) -> bool {
    let mut i = nodes.len();
    while i > 0 {
        i -= 1;
        match &mut nodes[i] {
            HtmlNode::Text(text) => {
                let kept = text.trim_end_matches(' ').len();
                if kept == 0 {
                    nodes.remove(i);
                    continue;
                }
                text.truncate(kept);
                return true;
            }
            HtmlNode::Element(el) => {
                if is_block_tag(&el.tag) || is_embedded_tag(&el.tag) || el.tag == "br" {
                    return true;
                }
                if trim_trailing(&mut el.children) {
                    return true;
                }
            }
        }
    }
    false
}
