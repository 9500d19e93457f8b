//! BBCode -> HTML -> BBCode through the default converter.
//!
//! After one trip the BBCode is normalized; a second trip must not change it
//! any further.

use bbcode_bridge::{bbcode2html, html2bbcode};

fn trip(bbcode: &str) -> String {
    html2bbcode(&bbcode2html(bbcode).unwrap())
}

fn assert_stable(bbcode: &str, expected: &str) {
    let once = trip(bbcode);
    assert_eq!(once, expected, "first trip of {:?}", bbcode);
    assert_eq!(trip(&once), once, "second trip of {:?}", bbcode);
}

#[test]
fn inline_styles() {
    assert_stable(
        "[b]bold[/b] [i]it[/i] [u]under[/u] [s]gone[/s]",
        "[b]bold[/b] [i]it[/i] [u]under[/u] [s]gone[/s]",
    );
    assert_stable("[b][i]both[/i][/b]", "[b][i]both[/i][/b]");
}

#[test]
fn color_and_size() {
    assert_stable("[color=red]r[/color]", "[color=red]r[/color]");
    assert_stable("[color=#FF0000]r[/color]", "[color=#ff0000]r[/color]");
    assert_stable("[size=20]big[/size]", "[size=20]big[/size]");
}

#[test]
fn links() {
    assert_stable(
        "[url]https://example.com/[/url]",
        "[url]https://example.com/[/url]",
    );
    assert_stable(
        "[url=https://example.com/]Example[/url]",
        "[url=\"https://example.com/\"]Example[/url]",
    );
}

#[test]
fn images() {
    assert_stable(
        "[img]https://example.com/a.png[/img]",
        "[img]https://example.com/a.png[/img]",
    );
    assert_stable(
        "[img alt=\"a cat\"]https://example.com/a.png[/img]",
        "[img alt=\"a cat\"]https://example.com/a.png[/img]",
    );
}

#[test]
fn paragraphs() {
    assert_stable("one\n\ntwo", "one\n\ntwo");
    assert_stable("one\ntwo", "one\ntwo");
    assert_stable("one\n\n\n\ntwo", "one\n\ntwo");
}

#[test]
fn quotes() {
    assert_stable("[quote]hello[/quote]", "[quote]\nhello\n[/quote]");
    assert_stable(
        "[quote]a\n\nb[/quote]",
        "[quote]\na\n\nb\n[/quote]",
    );
}

#[test]
fn quote_author_is_lost() {
    assert_stable("[quote=Alice]hi[/quote]", "[quote]\nhi\n[/quote]");
}

#[test]
fn code_blocks() {
    assert_stable(
        "[code=rust]\nfn main() {}\n[/code]",
        "[code=rust]\nfn main() {}\n[/code]",
    );
    assert_stable("[code]a < b[/code]", "[code]\na < b\n[/code]");
    assert_stable(
        "[code]\n\n[b]not bold[/b]\n\n[/code]",
        "[code]\n[b]not bold[/b]\n[/code]",
    );
    assert_stable(
        "[code]\n  indented\n    more\n[/code]",
        "[code]\n  indented\n    more\n[/code]",
    );
}

#[test]
fn indented_code_from_html_is_stable() {
    let canonical = html2bbcode("<pre><code>  indented\n    more</code></pre>");
    assert_eq!(canonical, "[code]\n  indented\n    more\n[/code]");
    assert_eq!(trip(&canonical), canonical);
}

#[test]
fn lists() {
    assert_stable(
        "[list]\n[*] one\n[*] two\n[/list]",
        "[list]\n[*] one\n[*] two\n[/list]",
    );
    assert_stable(
        "[list=1]\n[*] one\n[/list]",
        "[list=1]\n[*] one\n[/list]",
    );
    assert_stable("[list=a][*]x[/list]", "[list=a]\n[*] x\n[/list]");
}

#[test]
fn headings() {
    for level in 1..=6 {
        let bbcode = format!("[h{0}]Title[/h{0}]", level);
        assert_stable(&bbcode, &bbcode);
    }
    assert_stable("[h1]Title[/h1]\n\ntext", "[h1]Title[/h1]\n\ntext");
}

#[test]
fn tables() {
    let table = "[table]\n[tr]\n[td]a[/td]\n[td]b[/td]\n[/tr]\n[/table]";
    assert_stable(table, table);
}

#[test]
fn markup_in_text_stays_text() {
    assert_stable("1 < 2 & 3 > 2", "1 < 2 & 3 > 2");
    assert_stable("[spoiler]x[/spoiler]", "[spoiler]x[/spoiler]");
}

#[test]
fn literal_tags_in_html_text_stay_literal() {
    assert_eq!(html2bbcode("<p>[b]x[/b]</p>"), "&#91;b]x&#91;/b]");
    assert_eq!(
        bbcode2html("&#91;b]x&#91;/b]").unwrap(),
        "<p>&#91;b]x&#91;/b]</p>"
    );
    assert_stable("&#91;b]x&#91;/b]", "&#91;b]x&#91;/b]");
}
