//! Base-address selection for the review service.

use crate::config::ApiConfig;

/// Chooses the base address for a deployment host.
///
/// Hosts carrying one of the hosted-platform markers talk to the API on the
/// same origin, so the base address is empty; every other host uses the local
/// development address.
pub fn select_base_address(host: &str, hosted_markers: &[String], local_base_url: &str) -> String {
    let host = host.to_ascii_lowercase();
    if hosted_markers
        .iter()
        .any(|marker| !marker.is_empty() && host.contains(&marker.to_ascii_lowercase()))
    {
        String::new()
    } else {
        local_base_url.trim_end_matches('/').to_string()
    }
}

/// Resolved addressing for the API client and its transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiAddress {
    /// Prefix joined with every endpoint path; may be empty.
    pub base_url: String,
    /// Origin for relative requests when `base_url` is empty.
    pub origin: Option<String>,
}

impl ApiAddress {
    /// Resolves the address once at startup.
    ///
    /// An explicit `base_url` wins. Otherwise the configured host (or the
    /// machine's host name) is run through [`select_base_address`].
    pub fn resolve(api: &ApiConfig) -> Self {
        if let Some(base_url) = api.base_url.as_deref().filter(|b| !b.trim().is_empty()) {
            return Self {
                base_url: base_url.trim_end_matches('/').to_string(),
                origin: None,
            };
        }

        let host = api.host.clone().unwrap_or_else(machine_host_name);
        let base_url = select_base_address(&host, &api.hosted_markers, &api.local_base_url);
        let origin = base_url.is_empty().then(|| format!("https://{host}"));
        tracing::debug!(host = %host, base_url = %base_url, "resolved API base address");

        Self { base_url, origin }
    }
}

fn machine_host_name() -> String {
    hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "localhost".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Vec<String> {
        vec!["vercel.app".to_string(), "vercel.com".to_string()]
    }

    #[test]
    fn hosted_platform_uses_same_origin() {
        assert_eq!(
            select_base_address("doc-review.vercel.app", &markers(), "http://localhost:8000"),
            ""
        );
        assert_eq!(
            select_base_address("preview.Vercel.com", &markers(), "http://localhost:8000"),
            ""
        );
    }

    #[test]
    fn other_hosts_use_local_address() {
        assert_eq!(
            select_base_address("localhost", &markers(), "http://localhost:8000"),
            "http://localhost:8000"
        );
        assert_eq!(
            select_base_address("build-agent-7", &markers(), "http://localhost:8000/"),
            "http://localhost:8000"
        );
    }

    #[test]
    fn explicit_base_url_wins() {
        let api = ApiConfig {
            base_url: Some("https://review.internal/".into()),
            host: Some("doc-review.vercel.app".into()),
            ..ApiConfig::default()
        };
        let address = ApiAddress::resolve(&api);
        assert_eq!(address.base_url, "https://review.internal");
        assert_eq!(address.origin, None);
    }

    #[test]
    fn hosted_host_gets_an_origin() {
        let api = ApiConfig {
            host: Some("doc-review.vercel.app".into()),
            ..ApiConfig::default()
        };
        let address = ApiAddress::resolve(&api);
        assert_eq!(address.base_url, "");
        assert_eq!(address.origin.as_deref(), Some("https://doc-review.vercel.app"));
    }
}
