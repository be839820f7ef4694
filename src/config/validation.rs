//! Config validation: unknown-key detection with Levenshtein suggestions
//! and endpoint/server sanity checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::client::Endpoint;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, ", did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for DashboardConfig.
///
/// Maintained by hand to match the struct hierarchy in dashboard_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [dashboard]
        "dashboard",
        "dashboard.title",
        // [server]
        "server",
        "server.addr",
        // [endpoints]
        "endpoints",
        "endpoints.soil_carbon",
        "endpoints.fertilizer",
        "endpoints.organic_fertilizer",
        "endpoints.regional",
        // [http]
        "http",
        "http.timeout_secs",
        "http.user_agent",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_len = b.chars().count();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (k, levenshtein(unknown, k)))
        .filter(|&(_, dist)| dist <= 3)
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Settings Validation
// ============================================================================

/// Validate a parsed DashboardConfig.
///
/// Returns (errors, warnings): errors are unusable values that must
/// prevent startup; warnings are suspicious but not fatal.
pub fn validate_settings(
    config: &super::DashboardConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for endpoint in Endpoint::ALL {
        let field = format!("endpoints.{}", endpoint.to_string().replace('-', "_"));
        let raw = config.endpoints.url(endpoint);

        match reqwest::Url::parse(raw) {
            Err(e) => errors.push(format!("{field} = '{raw}' is not a valid URL ({e})")),
            Ok(url) if url.host_str().is_none() => {
                errors.push(format!("{field} = '{raw}' has no host"));
            }
            Ok(url) => match url.scheme() {
                "https" => {}
                "http" => warnings.push(ValidationWarning {
                    field: field.clone(),
                    message: format!("{field} uses plain http; soil data will travel unencrypted"),
                    suggestion: None,
                }),
                other => errors.push(format!("{field} has unsupported scheme '{other}'")),
            },
        }
    }

    if config.server.addr.parse::<SocketAddr>().is_err() {
        errors.push(format!(
            "server.addr = '{}' is not a valid HOST:PORT socket address",
            config.server.addr
        ));
    }

    if config.http.timeout_secs == Some(0) {
        errors.push("http.timeout_secs must be > 0 (omit it to use the transport default)".to_string());
    }

    if config.http.user_agent.trim().is_empty() {
        warnings.push(ValidationWarning {
            field: "http.user_agent".to_string(),
            message: "http.user_agent is empty".to_string(),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
