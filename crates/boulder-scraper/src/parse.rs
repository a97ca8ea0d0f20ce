//! Field extraction from catalog HTML.
//!
//! The catalog markup is regular enough that a handful of patterns cover it;
//! every helper returns `None`/empty when the expected block is missing.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

const BOULDERING_INDICATORS: [&str; 4] =
    ["bouldering", "boulder problems", "boulder area", "boulders"];

fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("valid regex"))
}

fn route_link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    pattern(&PATTERN, r#"href\s*=\s*["']([^"']*/route/\d+/[^"']*)["']"#)
}

fn area_link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    pattern(&PATTERN, r#"href\s*=\s*["']([^"']*/area/[^"']*)["']"#)
}

fn h1_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    pattern(&PATTERN, r"(?is)<h1[^>]*>(.*?)</h1>")
}

fn row_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    pattern(&PATTERN, r"(?is)<tr[^>]*>(.*?)</tr>")
}

fn cell_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    pattern(&PATTERN, r"(?is)<td([^>]*)>(.*?)</td>")
}

fn anchor_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    pattern(&PATTERN, r"(?is)<a[^>]*>(.*?)</a>")
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    pattern(&PATTERN, r"(?s)<[^>]*>")
}

fn v_grade_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    pattern(&PATTERN, r"V(\d+)")
}

/// Pattern for the inner HTML of the first `<tag>` whose `attr` attribute
/// contains the word `value`.
///
/// Stops at the first matching close tag, so nested blocks of the same tag
/// are truncated.
fn block_pattern(
    cell: &'static OnceLock<Regex>,
    tag: &str,
    attr: &str,
    value: &str,
) -> &'static Regex {
    cell.get_or_init(|| {
        let source = format!(
            r#"(?is)<{tag}\b[^>]*\b{attr}\s*=\s*["'][^"']*\b{value}\b[^"']*["'][^>]*>(.*?)</{tag}>"#,
            tag = tag,
            attr = attr,
            value = regex::escape(value),
        );
        Regex::new(&source).expect("valid regex")
    })
}

fn details_table_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    block_pattern(&PATTERN, "table", "class", "description-details")
}

fn description_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    block_pattern(&PATTERN, "div", "class", "fr-view")
}

fn breadcrumb_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    block_pattern(&PATTERN, "div", "class", "mb-half")
}

fn route_table_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    block_pattern(&PATTERN, "table", "id", "left-nav-route-table")
}

fn inner_block<'a>(re: &Regex, html: &'a str) -> Option<&'a str> {
    re.captures(html).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Plain text of an HTML fragment with whitespace collapsed.
pub fn text_of(fragment: &str) -> String {
    let stripped = tag_pattern().replace_all(fragment, " ");
    let decoded = decode_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// Every distinct route link on a page, in document order.
pub fn route_links(html: &str) -> Vec<String> {
    unique_captures(route_link_pattern(), html)
}

/// Every distinct area link on a page, in document order.
pub fn area_links(html: &str) -> Vec<String> {
    unique_captures(area_link_pattern(), html)
}

fn unique_captures(re: &Regex, html: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    re.captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|href| seen.insert(href.clone()))
        .collect()
}

/// Text of the page's first `<h1>`.
pub fn title(html: &str) -> Option<String> {
    let inner = h1_pattern().captures(html)?.get(1)?.as_str();
    let text = text_of(inner);
    (!text.is_empty()).then_some(text)
}

/// Grade from the `Grade:` row of the route details table.
pub fn grade(html: &str) -> Option<String> {
    let table = inner_block(details_table_pattern(), html)?;
    row_pattern()
        .captures_iter(table)
        .filter_map(|row| row.get(1))
        .find_map(|row| {
            let cells: Vec<String> = cell_pattern()
                .captures_iter(row.as_str())
                .filter_map(|c| c.get(2))
                .map(|m| text_of(m.as_str()))
                .collect();
            match cells.as_slice() {
                [label, value, ..] if label.contains("Grade:") && !value.is_empty() => {
                    Some(value.clone())
                }
                _ => None,
            }
        })
}

/// Route description body, empty when absent.
pub fn description(html: &str) -> String {
    inner_block(description_pattern(), html)
        .map(text_of)
        .unwrap_or_default()
}

/// Breadcrumb trail joined with ` > `, empty when absent.
pub fn breadcrumb(html: &str) -> String {
    let Some(block) = inner_block(breadcrumb_pattern(), html) else {
        return String::new();
    };
    anchor_pattern()
        .captures_iter(block)
        .filter_map(|c| c.get(1))
        .map(|m| text_of(m.as_str()))
        .filter(|crumb| !crumb.is_empty())
        .collect::<Vec<_>>()
        .join(" > ")
}

/// Whether the page looks like a bouldering area.
///
/// True when the title mentions bouldering, or the left-nav route table
/// lists at least one Boulder route.
pub fn is_bouldering_area(html: &str) -> bool {
    if let Some(title) = title(html) {
        let lower = title.to_lowercase();
        if BOULDERING_INDICATORS.iter().any(|i| lower.contains(i)) {
            return true;
        }
    }

    let Some(table) = inner_block(route_table_pattern(), html) else {
        return false;
    };
    cell_pattern().captures_iter(table).any(|cell| {
        let attrs = cell.get(1).map(|m| m.as_str()).unwrap_or_default();
        let body = cell.get(2).map(|m| m.as_str()).unwrap_or_default();
        attrs.contains("tright") && text_of(body).contains("Boulder")
    })
}

/// Whether a grade label is on the V scale.
pub fn is_v_grade(grade: &str) -> bool {
    v_grade_pattern().is_match(grade)
}

/// First `V<digits>` in a label, e.g. "V4-5 PG13" -> "V4".
pub fn v_grade(grade: &str) -> Option<String> {
    v_grade_pattern()
        .captures(grade)
        .and_then(|c| c.get(1))
        .map(|m| format!("V{}", m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTE_PAGE: &str = r#"
        <html><body>
          <div class="mb-half small text-warm">
            <a href="/route-guide">All Locations</a> &gt;
            <a href="/area/105708961/california">California</a> &gt;
            <a href="/area/106064825/bishop-area-bouldering">Bishop Area Bouldering</a>
          </div>
          <h1 class="mb-0">
            The  Mandala
            <span class="small">Boulder</span>
          </h1>
          <table class="description-details">
            <tr><td>Type:</td><td>Boulder, 16 ft</td></tr>
            <tr><td>Grade:</td><td><span class="rateYDS">V12</span></td></tr>
          </table>
          <div class="fr-view">World-class testpiece. <b>Incredibly</b> technical &amp; powerful.</div>
          <a href="/route/105833383/the-mandala">self</a>
          <a href="/route/105833384/the-mandala-sit">sit</a>
          <a href='/route/105833383/the-mandala'>dupe</a>
        </body></html>
    "#;

    #[test]
    fn extracts_route_fields() {
        assert_eq!(title(ROUTE_PAGE).as_deref(), Some("The Mandala Boulder"));
        assert_eq!(grade(ROUTE_PAGE).as_deref(), Some("V12"));
        assert_eq!(
            description(ROUTE_PAGE),
            "World-class testpiece. Incredibly technical & powerful."
        );
        assert_eq!(
            breadcrumb(ROUTE_PAGE),
            "All Locations > California > Bishop Area Bouldering"
        );
    }

    #[test]
    fn route_links_are_deduplicated_in_order() {
        assert_eq!(
            route_links(ROUTE_PAGE),
            vec![
                "/route/105833383/the-mandala".to_string(),
                "/route/105833384/the-mandala-sit".to_string(),
            ]
        );
        assert_eq!(area_links(ROUTE_PAGE).len(), 2);
    }

    #[test]
    fn missing_blocks_yield_empty_values() {
        let page = "<html><body><p>nothing here</p></body></html>";
        assert!(title(page).is_none());
        assert!(grade(page).is_none());
        assert_eq!(description(page), "");
        assert_eq!(breadcrumb(page), "");
        assert!(route_links(page).is_empty());
    }

    #[test]
    fn detects_bouldering_area_by_title() {
        let page = "<h1>Buttermilk Bouldering</h1>";
        assert!(is_bouldering_area(page));
        assert!(!is_bouldering_area("<h1>Lover's Leap</h1>"));
    }

    #[test]
    fn detects_bouldering_area_by_route_table() {
        let page = r#"
            <h1>Happy Boulders</h1>
            <table id="left-nav-route-table">
              <tr><td><a href="/route/1/x">X</a></td><td class="tright">Sport</td></tr>
            </table>
        "#;
        // "Boulders" in the title already qualifies
        assert!(is_bouldering_area(page));

        let by_table = r#"
            <h1>Owens River Gorge</h1>
            <table id="left-nav-route-table">
              <tr><td><a href="/route/1/x">X</a></td><td class="tright">Sport</td></tr>
              <tr><td><a href="/route/2/y">Y</a></td><td class="tright">Boulder</td></tr>
            </table>
        "#;
        assert!(is_bouldering_area(by_table));

        let sport_only = by_table.replace(">Boulder<", ">Trad<");
        assert!(!is_bouldering_area(&sport_only));
    }

    #[test]
    fn v_grade_extraction() {
        assert!(is_v_grade("V4-5"));
        assert!(!is_v_grade("5.10a"));
        assert_eq!(v_grade("V10 PG13").as_deref(), Some("V10"));
        assert_eq!(v_grade("5.11c"), None);
    }

    #[test]
    fn block_patterns_are_compiled_once() {
        assert!(std::ptr::eq(details_table_pattern(), details_table_pattern()));
        assert!(std::ptr::eq(route_table_pattern(), route_table_pattern()));
        for _ in 0..3 {
            assert_eq!(grade(ROUTE_PAGE).as_deref(), Some("V12"));
        }
        assert!(!details_table_pattern().is_match(r#"<div class="description-details">x</div>"#));
    }
}
