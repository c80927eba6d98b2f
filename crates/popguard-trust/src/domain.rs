//! Registrable-domain resolution
//!
//! Trust decisions are keyed by the registrable domain, defined here as
//! the last two dot-separated labels of the hostname. `www.example.com`
//! and `shop.example.com` both resolve to `example.com`.

/// Derive the registrable domain from a hostname.
///
/// Hostnames with fewer than two labels (`localhost`, an empty host) are
/// returned unchanged rather than failing. Pure function, no I/O.
pub fn registrable_domain(hostname: &str) -> String {
    let host = hostname.trim_end_matches('.').to_ascii_lowercase();

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return host;
    }

    labels[labels.len() - 2..].join(".")
}
