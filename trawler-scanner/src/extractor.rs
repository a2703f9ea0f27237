use crate::error::ParseError;
use scraper::{ElementRef, Html};

/// Collect the `href` of every `<a>` element in an HTML document.
///
/// The tree is walked depth-first with an explicit stack. Children are pushed
/// in document order and so come off the stack in reverse; callers must not
/// rely on the order of the returned links.
pub fn extract_links(html: &[u8]) -> Result<Vec<String>, ParseError> {
    // Bytes that are not UTF-8 become U+FFFD; the markup around them still parses.
    let text = String::from_utf8_lossy(html);
    let document = Html::parse_document(&text);

    let mut links = Vec::new();
    let mut stack = vec![document.root_element()];

    while let Some(element) = stack.pop() {
        if element.value().name() == "a"
            && let Some(href) = element.value().attr("href")
        {
            links.push(href.to_string());
        }

        // Text and comment nodes have nothing to visit.
        stack.extend(element.children().filter_map(ElementRef::wrap));
    }

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut links: Vec<String>) -> Vec<String> {
        links.sort();
        links
    }

    #[test]
    fn test_every_distinct_href_once() {
        let mut html = String::from("<html><body>");
        for i in 0..25 {
            html.push_str(&format!(r#"<div><p><a href="/page{}">Page {}</a></p></div>"#, i, i));
        }
        html.push_str("</body></html>");

        let links = extract_links(html.as_bytes()).unwrap();
        let expected: Vec<String> = (0..25).map(|i| format!("/page{}", i)).collect();

        assert_eq!(links.len(), 25);
        assert_eq!(sorted(links), sorted(expected));
    }

    #[test]
    fn test_anchor_without_href_is_skipped() {
        let html = br#"<html><body><a name="top">Top</a><a href="/one">One</a></body></html>"#;
        assert_eq!(extract_links(html).unwrap(), vec!["/one".to_string()]);
    }

    #[test]
    fn test_nested_and_head_anchors() {
        let html = br#"<!DOCTYPE html>
            <html>
              <head><title>t</title><link href="/style.css" rel="stylesheet"></head>
              <body>
                <ul><li><a href="http://example.com/abs">abs</a></li>
                    <li><span><a href="relative/path">rel</a></span></li></ul>
                <table><tr><td><a href="?q=1">query</a></td></tr></table>
              </body>
            </html>"#;

        let links = sorted(extract_links(html).unwrap());
        assert_eq!(
            links,
            vec![
                "?q=1".to_string(),
                "http://example.com/abs".to_string(),
                "relative/path".to_string(),
            ]
        );
    }

    #[test]
    fn test_uppercase_tags_and_attributes() {
        let html = br#"<HTML><BODY><A HREF="/shout">LOUD</A></BODY></HTML>"#;
        assert_eq!(extract_links(html).unwrap(), vec!["/shout".to_string()]);
    }

    #[test]
    fn test_commented_out_anchor_is_ignored() {
        let html = br#"<html><body><!-- <a href="/hidden">x</a> --><p>text</p></body></html>"#;
        assert!(extract_links(html).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_hrefs_are_kept() {
        let html = br#"<a href="/same">1</a><a href="/same">2</a>"#;
        assert_eq!(extract_links(html).unwrap().len(), 2);
    }

    #[test]
    fn test_empty_href_is_kept() {
        let html = br#"<a href="">self</a>"#;
        assert_eq!(extract_links(html).unwrap(), vec![String::new()]);
    }

    #[test]
    fn test_empty_document() {
        assert!(extract_links(b"").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_markup_still_parses() {
        let html = br#"<p>first <a href="/one">one</a><p>second <a href="/two">two</a><div>"#;
        let links = sorted(extract_links(html).unwrap());
        assert_eq!(links, vec!["/one".to_string(), "/two".to_string()]);
    }

    #[test]
    fn test_latin1_page_still_yields_links() {
        let html = b"<html><body><p>caf\xe9</p><a href=\"/menu\">m</a></body></html>";
        assert_eq!(extract_links(html).unwrap(), vec!["/menu".to_string()]);
    }

    #[test]
    fn test_invalid_bytes_inside_anchor() {
        let html = b"<a href=\"/x\">\xff\xfe</a><a href=\"/y\xe9\">y</a>";
        let links = sorted(extract_links(html).unwrap());
        assert_eq!(links, vec!["/x".to_string(), "/y\u{FFFD}".to_string()]);
    }
}
