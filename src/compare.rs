/// Tab comparators: the mode-dependent order and the fixed similarity order
use std::cmp::Ordering;

use crate::descriptor::TabDescriptor;
use crate::prefs::SortMode;
use crate::tokens::{compare_tokens, locale_cmp};

/// Order used to physically arrange unpinned tabs
///
/// Criteria are evaluated in the sequence the mode prescribes and the first
/// non-equal one decides. Container, scheme class and host always lead, so
/// tabs of one host stay contiguous (except in `TitleHostPath`, where the
/// title comes before the host).
pub fn order_cmp(mode: SortMode, a: &TabDescriptor, b: &TabDescriptor) -> Ordering {
    match mode {
        SortMode::None => Ordering::Equal,
        SortMode::HostTitlePath => by_container(a, b)
            .then_with(|| by_scheme_class(a, b))
            .then_with(|| by_host(a, b))
            .then_with(|| by_has_pathname(a, b))
            .then_with(|| by_title(a, b))
            .then_with(|| by_path(a, b))
            .then_with(|| by_query(a, b))
            .then_with(|| by_hash(a, b)),
        SortMode::HostPathTitle => by_container(a, b)
            .then_with(|| by_scheme_class(a, b))
            .then_with(|| by_host(a, b))
            .then_with(|| by_has_pathname(a, b))
            .then_with(|| by_path(a, b))
            .then_with(|| by_query(a, b))
            .then_with(|| by_hash(a, b))
            .then_with(|| by_title(a, b)),
        SortMode::TitleHostPath => by_container(a, b)
            .then_with(|| by_scheme_class(a, b))
            .then_with(|| by_title(a, b))
            .then_with(|| by_host(a, b))
            .then_with(|| by_has_pathname(a, b))
            .then_with(|| by_path(a, b))
            .then_with(|| by_query(a, b))
            .then_with(|| by_hash(a, b)),
        SortMode::Auto => by_container(a, b)
            .then_with(|| by_scheme_class(a, b))
            .then_with(|| by_host(a, b))
            .then_with(|| by_has_pathname(a, b))
            .then_with(|| by_path_auto(a, b)),
    }
}

/// Order used to find duplicates; two tabs comparing equal show the same page
pub fn similarity_cmp(a: &TabDescriptor, b: &TabDescriptor) -> Ordering {
    by_container(a, b)
        .then_with(|| by_scheme_class(a, b))
        .then_with(|| by_host(a, b))
        .then_with(|| by_has_pathname(a, b))
        .then_with(|| by_path(a, b))
        .then_with(|| by_query(a, b))
        .then_with(|| by_hash(a, b))
        .then_with(|| by_title(a, b))
}

fn by_container(a: &TabDescriptor, b: &TabDescriptor) -> Ordering {
    a.container_index.cmp(&b.container_index)
}

/// http and https are one class and always come first; other schemes
/// (`about:`, `file:`, ...) follow it, ordered by name among themselves
///
/// A raw string comparison would put `about:` before `https:`. Placeholder
/// and local pages are kept behind the web tabs instead.
fn by_scheme_class(a: &TabDescriptor, b: &TabDescriptor) -> Ordering {
    match (a.has_http_scheme, b.has_http_scheme) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => locale_cmp(&a.scheme, &b.scheme),
    }
}

fn by_host(a: &TabDescriptor, b: &TabDescriptor) -> Ordering {
    compare_tokens(&a.domain_tokens[..], &b.domain_tokens[..])
        .then_with(|| compare_tokens(&a.tld_tokens[..], &b.tld_tokens[..]))
}

/// Site roots before pages below them
fn by_has_pathname(a: &TabDescriptor, b: &TabDescriptor) -> Ordering {
    a.has_pathname.cmp(&b.has_pathname)
}

fn by_title(a: &TabDescriptor, b: &TabDescriptor) -> Ordering {
    locale_cmp(&a.title, &b.title)
}

fn by_path(a: &TabDescriptor, b: &TabDescriptor) -> Ordering {
    compare_tokens(&a.path_tokens[..], &b.path_tokens[..])
}

fn by_query(a: &TabDescriptor, b: &TabDescriptor) -> Ordering {
    match (&a.query_string, &b.query_string) {
        (Some(qa), Some(qb)) => locale_cmp(qa, qb),
        _ => Ordering::Equal,
    }
}

fn by_hash(a: &TabDescriptor, b: &TabDescriptor) -> Ordering {
    locale_cmp(&a.hash, &b.hash)
}

/// Path comparison for `SortMode::Auto`
///
/// Paths are grouped by their parent segments first. Top-level pages are then
/// ordered by their segment. Below the top level, siblings are usually
/// articles, so they are ordered by a label: the slug when it matches the
/// title, otherwise the title. Last segment, title, query and fragment break
/// the remaining ties.
fn by_path_auto(a: &TabDescriptor, b: &TabDescriptor) -> Ordering {
    let (a_last, a_parent) = split_last_segment(a);
    let (b_last, b_parent) = split_last_segment(b);

    compare_tokens(a_parent, b_parent)
        .then_with(|| {
            // Equal parents have equal depth
            if a_parent.is_empty() {
                Ordering::Equal
            } else {
                locale_cmp(sibling_label(a), sibling_label(b))
            }
        })
        .then_with(|| locale_cmp(a_last, b_last))
        .then_with(|| by_title(a, b))
        .then_with(|| by_query(a, b))
        .then_with(|| by_hash(a, b))
}

fn split_last_segment(d: &TabDescriptor) -> (&str, &[String]) {
    match d.path_tokens.split_last() {
        Some((last, parent)) => (last.as_str(), parent),
        None => ("", &[][..]),
    }
}

fn sibling_label(d: &TabDescriptor) -> &str {
    d.slug().unwrap_or(&d.title)
}
