use serde::Serialize;

pub const ELLIPSIS_LABEL: &str = "…";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub label: String,
    pub href: Option<String>,
}

impl Crumb {
    pub fn new(label: &str, href: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            href: href.map(str::to_string),
        }
    }

    pub fn ellipsis() -> Self {
        Self::new(ELLIPSIS_LABEL, None)
    }

    pub fn is_ellipsis(&self) -> bool {
        self.href.is_none() && self.label == ELLIPSIS_LABEL
    }
}

/// Builds the trail for a route path such as `/groups/g1/edit`. Every crumb
/// but the last links to its prefix.
pub fn from_path(path: &str) -> Vec<Crumb> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let mut crumbs = vec![Crumb::new("Home", (!segments.is_empty()).then_some("/"))];

    let mut prefix = String::new();
    for (i, segment) in segments.iter().enumerate() {
        prefix.push('/');
        prefix.push_str(segment);
        let label = humanize(segment);
        let href = (i + 1 < segments.len()).then_some(prefix.as_str());
        crumbs.push(Crumb::new(&label, href));
    }
    crumbs
}

fn humanize(segment: &str) -> String {
    segment
        .split('-')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapses a long trail into first item, ellipsis, and the last
/// `max(1, max_items - 2)` items. `max_items == 0` disables truncation.
pub fn truncate(items: &[Crumb], max_items: usize) -> Vec<Crumb> {
    if max_items == 0 || items.len() <= max_items {
        return items.to_vec();
    }

    let tail = max_items.saturating_sub(2).max(1);
    let mut out = Vec::with_capacity(tail + 2);
    out.push(items[0].clone());
    out.push(Crumb::ellipsis());
    out.extend_from_slice(&items[items.len() - tail..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trail(n: usize) -> Vec<Crumb> {
        (1..=n)
            .map(|i| Crumb::new(&format!("Item {}", i), Some(&format!("/item-{}", i))))
            .collect()
    }

    fn labels(crumbs: &[Crumb]) -> Vec<&str> {
        crumbs.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_seven_items_truncated_to_four() {
        let out = truncate(&trail(7), 4);
        assert_eq!(labels(&out), vec!["Item 1", "…", "Item 6", "Item 7"]);
        assert!(out[1].is_ellipsis());
    }

    #[test]
    fn test_short_trail_is_untouched() {
        assert_eq!(truncate(&trail(4), 4), trail(4));
        assert_eq!(truncate(&trail(9), 0), trail(9));
    }

    #[test]
    fn test_tiny_limit_keeps_at_least_one_tail_item() {
        let out = truncate(&trail(5), 2);
        assert_eq!(labels(&out), vec!["Item 1", "…", "Item 5"]);
    }

    #[test]
    fn test_from_path() {
        let crumbs = from_path("/call-orders/co-17/edit");
        assert_eq!(labels(&crumbs), vec!["Home", "Call Orders", "Co 17", "Edit"]);
        assert_eq!(crumbs[0].href.as_deref(), Some("/"));
        assert_eq!(crumbs[2].href.as_deref(), Some("/call-orders/co-17"));
        assert_eq!(crumbs[3].href, None);

        assert_eq!(from_path("/"), vec![Crumb::new("Home", None)]);
    }
}
