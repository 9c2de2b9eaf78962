use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: Option<PathBuf>,
    pub route_ttl: Duration,
    pub graph_cache: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("WAYFIND_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("WAYFIND_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);
        let db_path = env::var("WAYFIND_DB").ok().map(PathBuf::from);
        let route_ttl = Duration::from_secs(
            env::var("WAYFIND_ROUTE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1800),
        );
        // Opt-in; the baseline is a fresh graph build per request
        let graph_cache = env::var("WAYFIND_GRAPH_CACHE")
            .map(|s| s == "1" || s.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            db_path,
            route_ttl,
            graph_cache,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
