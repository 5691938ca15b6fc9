use anyhow::{bail, Context, Result};

/// Longest accepted idle lifetime for a view session (one week).
pub const MAX_VIEW_IDLE_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub s3_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    /// Remote auth endpoint; when unset, `auth_tokens` is used instead.
    pub auth_url: Option<String>,
    pub auth_tokens: Vec<String>,
    pub view_idle_ttl: chrono::Duration,
    pub max_views: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            s3_region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            auth_url: std::env::var("AUTH_URL").ok().filter(|u| !u.trim().is_empty()),
            auth_tokens: parse_tokens(&std::env::var("AUTH_TOKENS").unwrap_or_default()),
            view_idle_ttl: parse_idle_ttl(
                &std::env::var("VIEW_IDLE_TTL_SECS").unwrap_or_else(|_| "1800".to_string()),
            )?,
            max_views: std::env::var("MAX_VIEWS")
                .unwrap_or_else(|_| "256".to_string())
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .context("MAX_VIEWS must be a positive whole number")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_idle_ttl(raw: &str) -> Result<chrono::Duration> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .context("VIEW_IDLE_TTL_SECS must be a whole number of seconds")?;
    if secs == 0 || secs > MAX_VIEW_IDLE_TTL_SECS {
        bail!("VIEW_IDLE_TTL_SECS must be between 1 and {MAX_VIEW_IDLE_TTL_SECS}, got {secs}");
    }
    let secs = i64::try_from(secs).context("VIEW_IDLE_TTL_SECS is out of range")?;
    chrono::Duration::try_seconds(secs).context("VIEW_IDLE_TTL_SECS is out of range")
}

fn parse_tokens(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens_skips_blanks() {
        assert_eq!(parse_tokens(" a, ,b,"), vec!["a".to_string(), "b".to_string()]);
        assert!(parse_tokens("").is_empty());
    }

    #[test]
    fn test_idle_ttl_accepts_sane_values() {
        assert_eq!(parse_idle_ttl("1800").unwrap(), chrono::Duration::seconds(1800));
        assert_eq!(
            parse_idle_ttl(&MAX_VIEW_IDLE_TTL_SECS.to_string()).unwrap(),
            chrono::Duration::seconds(MAX_VIEW_IDLE_TTL_SECS as i64)
        );
    }

    #[test]
    fn test_idle_ttl_rejects_out_of_range() {
        assert!(parse_idle_ttl("0").is_err());
        assert!(parse_idle_ttl("-5").is_err());
        assert!(parse_idle_ttl("abc").is_err());
        assert!(parse_idle_ttl(&u64::MAX.to_string()).is_err());
        let err = parse_idle_ttl(&(MAX_VIEW_IDLE_TTL_SECS + 1).to_string()).unwrap_err();
        assert!(err.to_string().contains("between 1 and"), "{err}");
    }
}
