/// Tab Sorter - WebExtension background module that sorts and dedupes tabs
/// Built with Rust + WASM

mod bridge;
pub mod compare;
pub mod dedupe;
pub mod descriptor;
pub mod error;
pub mod host;
pub mod prefs;
pub mod sorter;
pub mod tab_data;
pub mod tokens;

use wasm_bindgen::prelude::*;

pub use bridge::{JsTabHost, TabSorter};
pub use error::SorterError;
pub use prefs::{Preferences, SortMode};
pub use sorter::{PassOutcome, PassStage, PassSummary, Sorter};

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export the suffix heuristic for JavaScript access
#[wasm_bindgen(js_name = tldGroup)]
pub fn tld_group(hostname: &str) -> String {
    let (mut tld, _) = tokens::split_hostname(hostname);
    tld.reverse();
    tld.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tld_group() {
        assert_eq!(tld_group("news.bbc.co.uk"), "co.uk");
        assert_eq!(tld_group("shop.example.com.au"), "com.au");
        assert_eq!(tld_group("github.com"), "com");
        assert_eq!(tld_group("localhost"), "localhost");
    }
}
