use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "sqlstudio")]
#[command(about = "SQLStudio - Web-based MySQL management")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "SQLSTUDIO_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Address to bind to (localhost only by default)
    #[arg(long, env = "SQLSTUDIO_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// MySQL server hostname
    #[arg(long, env = "MYSQL_HOST", default_value = "localhost")]
    pub mysql_host: String,

    /// MySQL server port
    #[arg(long, env = "MYSQL_PORT", default_value_t = 3306)]
    pub mysql_port: u16,

    /// MySQL user
    #[arg(long, env = "MYSQL_USER", default_value = "root")]
    pub mysql_user: String,

    /// MySQL password
    #[arg(long, env = "MYSQL_PASSWORD", default_value = "", hide_env_values = true)]
    pub mysql_password: String,

    /// Minimum number of pooled connections to maintain
    #[arg(long, default_value_t = 1)]
    pub pool_min_connections: u32,

    /// Maximum number of pooled connections to allow
    #[arg(long, default_value_t = 10)]
    pub pool_max_connections: u32,

    /// Admin shared secret presented at login and as X-Admin-Key
    #[arg(long, env = "SQLSTUDIO_ADMIN_SECRET", hide_env_values = true)]
    pub admin_secret: String,

    /// Login attempts allowed per source address within the window
    #[arg(long, default_value_t = 3)]
    pub login_max_attempts: u32,

    /// Login rate-limit window in seconds
    #[arg(long, default_value_t = 60)]
    pub login_window_secs: u64,

    /// Login audit log file
    #[arg(long, default_value = "logs/login.txt")]
    pub audit_log: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub host: String,
    pub port: u16,
    pub mysql_host: String,
    pub mysql_port: u16,
    pub mysql_user: String,
    pub mysql_password: String,
    pub pool_min_connections: u32,
    pub pool_max_connections: u32,
    pub admin_secret: String,
    pub login_max_attempts: u32,
    pub login_window: Duration,
    pub audit_log: PathBuf,
}

impl From<Args> for StudioConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            mysql_host: args.mysql_host,
            mysql_port: args.mysql_port,
            mysql_user: args.mysql_user,
            mysql_password: args.mysql_password,
            pool_min_connections: args.pool_min_connections,
            pool_max_connections: args.pool_max_connections,
            admin_secret: args.admin_secret,
            login_max_attempts: args.login_max_attempts,
            login_window: Duration::from_secs(args.login_window_secs),
            audit_log: args.audit_log,
        }
    }
}

impl StudioConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn mysql_url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}",
            self.mysql_user, self.mysql_password, self.mysql_host, self.mysql_port
        )
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            mysql_host: "localhost".to_string(),
            mysql_port: 3306,
            mysql_user: "root".to_string(),
            mysql_password: String::new(),
            pool_min_connections: 1,
            pool_max_connections: 10,
            admin_secret: "admin123".to_string(),
            login_max_attempts: 3,
            login_window: Duration::from_secs(60),
            audit_log: PathBuf::from("logs/login.txt"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_addr_joins_host_and_port() {
        let config = StudioConfig {
            host: "0.0.0.0".to_string(),
            port: 9000,
            ..StudioConfig::default()
        };
        assert_eq!(config.listen_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn mysql_url_carries_credentials_and_endpoint() {
        let config = StudioConfig {
            mysql_user: "admin".to_string(),
            mysql_password: "pw".to_string(),
            mysql_host: "db.internal".to_string(),
            mysql_port: 3307,
            ..StudioConfig::default()
        };
        assert_eq!(config.mysql_url(), "mysql://admin:pw@db.internal:3307");
    }
}
