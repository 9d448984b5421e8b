use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// `SHOPDB_QUIET=1` turns off banners, phase headings and spinners
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("SHOPDB_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}
