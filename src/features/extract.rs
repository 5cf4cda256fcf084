//! HTML -> FeatureRecord extraction

use scraper::{Html, Selector};
use url::Url;

use super::record::FeatureRecord;

/// Extraction output: the rule-evaluable record plus two page-level
/// byproducts the coordinator needs (visible text for keyword correlation,
/// favicon link for hash correlation).
#[derive(Debug, Clone, Default)]
pub struct ExtractedPage {
    pub features: FeatureRecord,
    /// Visible text content, whitespace-joined
    pub page_text: String,
    /// Favicon href resolved against the final URL, if declared
    pub favicon_url: Option<String>,
}

/// Build an [`ExtractedPage`] from the final URL and the raw HTML body.
///
/// `redirect_urls` is the session's redirect target chain; it rides along in
/// the feature record so `requests|contains` selections can see it.
pub fn extract(final_url: &str, raw_html: &str, redirect_urls: Vec<String>) -> ExtractedPage {
    let doc = Html::parse_document(raw_html);

    // Selectors are static strings; parse failures would be programmer error
    let title_sel = Selector::parse("title").unwrap();
    let script_sel = Selector::parse("script").unwrap();
    let css_sel = Selector::parse(r#"link[rel="stylesheet"]"#).unwrap();
    let icon_sel = Selector::parse(r#"link[rel="icon"], link[rel="shortcut icon"]"#).unwrap();

    let title = doc
        .select(&title_sel)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let scripts: Vec<String> = doc
        .select(&script_sel)
        .map(|s| s.text().collect::<String>())
        .collect();

    let base = Url::parse(final_url).ok();

    let stylesheet_refs: Vec<String> = doc
        .select(&css_sel)
        .filter_map(|l| l.value().attr("href"))
        .map(|href| resolve(base.as_ref(), href))
        .collect();

    let favicon_url = doc
        .select(&icon_sel)
        .find_map(|l| l.value().attr("href"))
        .map(|href| resolve(base.as_ref(), href));

    let hostname = base
        .as_ref()
        .and_then(|u| u.host_str())
        .unwrap_or_default()
        .to_string();

    let page_text = doc
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    ExtractedPage {
        features: FeatureRecord {
            title: vec![title],
            hostname,
            dom_snapshot: doc.html(),
            html_snapshot: raw_html.to_string(),
            scripts,
            stylesheet_refs,
            // cookies and headers are not observable from raw HTML;
            // the collector leaves them empty
            cookies: Vec::new(),
            response_headers: Default::default(),
            redirect_urls,
        },
        page_text,
        favicon_url,
    }
}

fn resolve(base: Option<&Url>, href: &str) -> String {
    match base.and_then(|b| b.join(href).ok()) {
        Some(abs) => abs.to_string(),
        None => href.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head>
        <title>Sign in</title>
        <link rel="stylesheet" href="/app.css">
        <link rel="icon" href="/favicon.ico">
        <script>var x = 1;</script>
      </head>
      <body><p>Welcome to Example Bank</p><script>eval(userInput)</script></body>
    </html>"#;

    #[test]
    fn extracts_title_scripts_and_hostname() {
        let page = extract("https://login.example.test/a/b", PAGE, vec![]);
        assert_eq!(page.features.title, vec!["Sign in".to_string()]);
        assert_eq!(page.features.hostname, "login.example.test");
        assert_eq!(page.features.scripts.len(), 2);
        assert!(page.features.scripts[1].contains("eval(userInput)"));
    }

    #[test]
    fn resolves_stylesheet_and_favicon_against_final_url() {
        let page = extract("https://login.example.test/a/b", PAGE, vec![]);
        assert_eq!(
            page.features.stylesheet_refs,
            vec!["https://login.example.test/app.css".to_string()]
        );
        assert_eq!(
            page.favicon_url.as_deref(),
            Some("https://login.example.test/favicon.ico")
        );
    }

    #[test]
    fn page_text_is_visible_text() {
        let page = extract("https://login.example.test/", PAGE, vec![]);
        assert!(page.page_text.contains("Welcome to Example Bank"));
    }

    #[test]
    fn redirect_chain_is_addressable_as_requests() {
        let page = extract(
            "https://final.test/",
            PAGE,
            vec!["https://hop.test/r1".to_string()],
        );
        match page.features.field("requests") {
            Some(crate::features::FieldRef::List(urls)) => {
                assert_eq!(urls, &["https://hop.test/r1".to_string()][..]);
            }
            other => panic!("unexpected field shape: {:?}", other),
        }
    }
}
