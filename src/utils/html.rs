//! Error messages embedded in the service's HTML pages

use scraper::{Html, Selector};

/// Blocks the service renders errors into, newest layout first
const ERROR_SELECTORS: &[&str] = &["ul.errorlist", "p.pkgoutput"];

/// Text of the first error block on the page, tags stripped and whitespace
/// collapsed. `None` when the page carries no (non-empty) error block.
pub fn extract_service_error(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    for selector_str in ERROR_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text = collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "));
            if !text.is_empty() {
                return Some(text);
            }
        }
    }

    None
}

/// Whether the page offers a logout action, i.e. was rendered for a
/// logged-in user.
pub fn has_logout_action(html: &str) -> bool {
    let document = Html::parse_document(html);
    ["form[action$=\"/logout\"]", "a[href$=\"/logout\"]"]
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .any(|selector| document.select(&selector).next().is_some())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_errorlist() {
        let html = r#"<html><body>
            <div class="box">
              <ul class="errorlist">
                <li>The package <strong>foo</strong> already exists.</li>
              </ul>
            </div></body></html>"#;
        assert_eq!(
            extract_service_error(html).as_deref(),
            Some("The package foo already exists.")
        );
    }

    #[test]
    fn test_legacy_pkgoutput() {
        let html = r#"<p class="pkgoutput">Error - <b>invalid</b> package</p>"#;
        assert_eq!(
            extract_service_error(html).as_deref(),
            Some("Error - invalid package")
        );
    }

    #[test]
    fn test_errorlist_wins_over_pkgoutput() {
        let html = r#"<p class="pkgoutput">old</p><ul class="errorlist"><li>new</li></ul>"#;
        assert_eq!(extract_service_error(html).as_deref(), Some("new"));
    }

    #[test]
    fn test_no_error_block() {
        assert!(extract_service_error("<html><body><p>Welcome</p></body></html>").is_none());
        assert!(extract_service_error("").is_none());
        assert!(extract_service_error(r#"<ul class="errorlist"> </ul>"#).is_none());
    }

    #[test]
    fn test_multiple_list_items() {
        let html = r#"<ul class="errorlist"><li>First problem.</li><li>Second problem.</li></ul>"#;
        assert_eq!(
            extract_service_error(html).as_deref(),
            Some("First problem. Second problem.")
        );
    }

    #[test]
    fn test_logout_action() {
        assert!(has_logout_action(
            r#"<form action="/logout" method="post"><input type="submit"></form>"#
        ));
        assert!(has_logout_action(
            r#"<a href="https://aur.archlinux.org/logout">Logout</a>"#
        ));
        assert!(!has_logout_action(r#"<a href="/login">Login</a>"#));
    }
}
