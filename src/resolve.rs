/// Turns a teaser's relative item link into an absolute item URL.
///
/// Prefixes are tested in order and only the leading one is replaced:
/// `../../../` maps onto `catalogue_base`, `../../` onto `site_root`, and
/// anything else is taken as a file name under `catalogue_base`.
pub fn resolve(relative_link: &str, site_root: &str, catalogue_base: &str) -> String {
    if let Some(rest) = relative_link.strip_prefix("../../../") {
        format!("{catalogue_base}{rest}")
    } else if let Some(rest) = relative_link.strip_prefix("../../") {
        format!("{site_root}{rest}")
    } else {
        format!("{catalogue_base}{relative_link}")
    }
}
