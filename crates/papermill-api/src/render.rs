//! Render a completed paper as a standalone HTML document.

use papermill_core::report::Paper;
use pulldown_cmark::{Options, Parser, html};

/// Compact academic stylesheet for the rendered document.
const STYLE: &str = r#"
body {
    font-family: 'Times New Roman', Times, serif;
    font-size: 11pt;
    line-height: 1.5;
    max-width: 48em;
    margin: 2em auto;
    padding: 0 1em;
}
h1 {
    font-size: 18pt;
    text-align: center;
    border-bottom: 1px solid black;
    padding-bottom: 0.3em;
}
h2 {
    font-size: 12pt;
    text-transform: uppercase;
    margin-top: 1.2em;
}
h3 { font-size: 11pt; }
p { text-align: justify; }
pre {
    font-family: 'Courier New', Courier, monospace;
    font-size: 9pt;
    background-color: #f5f5f5;
    border: 1px solid #ddd;
    padding: 0.8em;
    white-space: pre-wrap;
}
code {
    font-family: 'Courier New', Courier, monospace;
    font-size: 9pt;
    background-color: #f5f5f5;
}
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid black; padding: 0.3em; font-size: 10pt; }
"#;

/// The paper as a self-contained HTML page, markdown body rendered.
pub fn paper_document(paper: &Paper) -> String {
    let mut body = String::new();
    let parser = Parser::new_ext(&paper.content, Options::ENABLE_TABLES);
    html::push_html(&mut body, parser);

    let title = escape_html(&paper.title);
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>{title}</h1>\n{body}</body>\n</html>\n"
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_markdown_body_and_escapes_title() {
        let paper = Paper {
            title: "Graphs & <Attention>".to_string(),
            content: "## Introduction\n\nSome *emphasis*.".to_string(),
            references: 0,
        };
        let doc = paper_document(&paper);
        assert!(doc.contains("<title>Graphs &amp; &lt;Attention&gt;</title>"));
        assert!(doc.contains("<h2>Introduction</h2>"));
        assert!(doc.contains("<em>emphasis</em>"));
    }
}
