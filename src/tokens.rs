/// Hostname/pathname tokenizing and token-sequence comparison
use std::cmp::Ordering;

/// Split a hostname into `(tld_tokens, domain_tokens)`
///
/// Algorithm:
/// 1. Split hostname by "." and reverse, so the TLD comes first
/// 2. If there are more than 2 labels AND the second reversed label is at most
///    3 characters long:
///    → the first two reversed labels form the TLD group (e.g. "uk", "co")
/// 3. Else:
///    → only the first reversed label is the TLD group
///
/// This is a heuristic rather than a public suffix lookup. It happily treats
/// short registrable names as part of the suffix ("www.bbc.com" yields a TLD
/// group of `["com", "bbc"]`), and callers rely on exactly that behavior.
///
/// Examples:
/// - www.example.co.uk → (["uk", "co"], ["example", "www"])
/// - example.com → (["com"], ["example"])
/// - localhost → (["localhost"], [])
pub fn split_hostname(hostname: &str) -> (Vec<String>, Vec<String>) {
    let mut labels: Vec<String> = hostname.split('.').map(str::to_string).collect();
    labels.reverse();

    let tld_len = if labels.len() > 2 && labels[1].chars().count() <= 3 {
        2
    } else {
        1
    };

    let domain = labels.split_off(tld_len.min(labels.len()));
    (labels, domain)
}

/// Split a (slash-trimmed) pathname into its segments
///
/// No normalization happens here: "" yields `[""]` and "a//b" yields
/// `["a", "", "b"]`.
pub fn split_pathname(pathname: &str) -> Vec<String> {
    pathname.split('/').map(str::to_string).collect()
}

/// Compare two token sequences element by element
///
/// The first differing element decides. When one sequence is a prefix of the
/// other the shorter one sorts first.
pub fn compare_tokens<S: AsRef<str>>(a: &[S], b: &[S]) -> Ordering {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| locale_cmp(x.as_ref(), y.as_ref()))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

/// Locale-aware string comparison
///
/// In the browser this is `String.prototype.localeCompare`.
#[cfg(target_arch = "wasm32")]
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let result = js_sys::JsString::from(a).locale_compare(
        b,
        &js_sys::Array::new(),
        &js_sys::Object::new(),
    );
    result.cmp(&0)
}

/// Locale-aware string comparison
///
/// Native builds have no ICU collator at hand, so this approximates the root
/// collation: caseless text first, then lowercase before uppercase.
#[cfg(not(target_arch = "wasm32"))]
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
