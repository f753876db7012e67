//! URL slug generation for launches.

use std::sync::LazyLock;

use regex::Regex;

/// Runs of characters that are not lowercase ASCII letters or digits.
static NON_SLUG_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9]+").expect("valid regex"));

/// Derive a URL-safe slug from a product name.
///
/// The name is lowercased, every run of characters outside `[a-z0-9]` becomes
/// a single `-`, and leading/trailing dashes are trimmed.
///
/// # Examples
///
/// ```
/// use launchpad_core::naming::launch_slug;
///
/// assert_eq!(launch_slug("WhatsApp CRM Pro"), "whatsapp-crm-pro");
/// assert_eq!(launch_slug("  CRM -- Pro!  "), "crm-pro");
/// ```
pub fn launch_slug(product_name: &str) -> String {
    let lowered = product_name.to_lowercase();
    NON_SLUG_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
