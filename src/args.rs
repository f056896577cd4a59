use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Logging verbosity selectable on the command line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing_subscriber::filter::LevelFilter::ERROR,
            LogLevel::Warn => tracing_subscriber::filter::LevelFilter::WARN,
            LogLevel::Info => tracing_subscriber::filter::LevelFilter::INFO,
            LogLevel::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
            LogLevel::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
        }
    }
}

/// Command line arguments for the lab-buddy server.
#[derive(Parser, Clone, Debug)]
#[command(name = "lab-buddy", about = "Simulated lab assistant API")]
pub struct Args {
    #[arg(long, env = "LAB_BUDDY_HOST", default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, env = "LAB_BUDDY_PORT", default_value_t = 3000)]
    pub port: u16,
    /// Optional TOML configuration file
    #[arg(long, env = "LAB_BUDDY_CONFIG")]
    pub config: Option<PathBuf>,
    /// Logging verbosity level, overridden by `RUST_LOG`
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let args = Args::try_parse_from(["lab-buddy"]).unwrap();
        assert_eq!(args.log_level, LogLevel::Info);
        assert_eq!(args.port, 3000);
        assert!(args.config.is_none());
        assert_eq!(args.addr().unwrap().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn parses_overrides() {
        let args = Args::try_parse_from([
            "lab-buddy",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--log-level",
            "debug",
            "--config",
            "lab.toml",
        ])
        .unwrap();
        assert_eq!(args.log_level, LogLevel::Debug);
        assert_eq!(args.addr().unwrap().port(), 8080);
        assert_eq!(args.config.unwrap(), PathBuf::from("lab.toml"));
    }

    #[test]
    fn bad_host_is_reported() {
        let args = Args::try_parse_from(["lab-buddy", "--host", "not a host"]).unwrap();
        assert!(args.addr().is_err());
    }
}
