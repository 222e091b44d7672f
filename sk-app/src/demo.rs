//! Demo page: a message list with an options menu

use sk_core::{KeyMap, LogicalKey};
use sk_tree::{Document, NodeSpec, ViewTree};

/// Build the demo page, tagging the footer buttons with `keymap`'s keys
pub fn build(keymap: &KeyMap) -> Document {
    let mut doc = Document::new();
    let root = doc.root();

    doc.append(root, NodeSpec::new("header").id("title").text("Messages"));

    let list = doc.append(root, NodeSpec::new("section").id("list"));
    doc.append(list, NodeSpec::new("li").id("m1").text("Alice: lunch at noon?"));
    doc.append(list, NodeSpec::new("li").id("m2").text("Bob: build is green"));
    doc.append(list, NodeSpec::new("li").id("m3").text("Carol: slides attached"));

    let menu = doc.append(
        root,
        NodeSpec::new("menu").id("msg-opts").header("Message").hidden(),
    );
    doc.append(menu, NodeSpec::new("button").id("reply").text("Reply").icon("reply"));
    doc.append(menu, NodeSpec::new("button").id("forward").text("Forward").icon("forward"));
    doc.append(menu, NodeSpec::new("button").id("mark").text("Mark as unread"));
    doc.append(menu, NodeSpec::new("button").id("delete").text("Delete").icon("delete"));

    let footer = doc.append(root, NodeSpec::new("footer").id("bar"));
    doc.append(
        footer,
        NodeSpec::new("button")
            .id("options")
            .text("Options")
            .accesskey(keymap.physical(LogicalKey::Lsk))
            .contextmenu("msg-opts"),
    );
    doc.append(
        footer,
        NodeSpec::new("button")
            .id("select")
            .text("Select")
            .accesskey(keymap.physical(LogicalKey::Csk)),
    );
    doc.append(
        footer,
        NodeSpec::new("button")
            .id("back")
            .text("Back")
            .accesskey(keymap.physical(LogicalKey::Rsk)),
    );

    doc
}
