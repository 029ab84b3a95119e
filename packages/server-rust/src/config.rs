//! Command-line and environment configuration.

use std::ffi::OsString;

use clap::Parser;

use crate::network::{bind_addr, NetworkConfig, DEFAULT_PORT};
use crate::routing::DEFAULT_ROUTING_SERVICE_URL;

/// Command-line arguments of the handling server.
///
/// Flags take precedence over environment variables. Empty environment
/// values count as unset.
#[derive(Debug, Clone, Parser)]
#[command(name = "handling-server", version, about = "Cargo handling event registration service")]
pub struct Args {
    /// HTTP listen address. Defaults to `:$PORT`.
    #[arg(long = "http.addr", value_name = "ADDR")]
    pub http_addr: Option<String>,

    /// Port used for the default listen address.
    #[arg(long, env = "PORT", value_name = "PORT", hide = true)]
    pub port: Option<String>,

    /// Base URL of the routing service.
    #[arg(long = "service.routing", env = "ROUTINGSERVICE_URL", value_name = "URL")]
    pub routing_service_url: Option<String>,
}

/// Long flags that are also accepted with a single leading dash.
const SINGLE_DASH_LONG_FLAGS: &[&str] = &["http.addr", "service.routing", "port"];

impl Args {
    /// Parses `args` after rewriting `-http.addr` style flags to `--http.addr`.
    ///
    /// Prints help or the error and exits on invalid input, like
    /// [`Parser::parse_from`].
    pub fn parse_single_dash<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::parse_from(normalize_single_dash(args))
    }

    /// Fallible form of [`Args::parse_single_dash`].
    ///
    /// # Errors
    ///
    /// Returns the clap error for unknown flags or missing values.
    pub fn try_parse_single_dash<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_single_dash(args))
    }
}

/// Rewrites `-name` and `-name=value` to their `--` form for the known long
/// flags. Everything else passes through unchanged.
fn normalize_single_dash<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let Some(flag) = text.strip_prefix('-').filter(|f| !f.starts_with('-')) else {
                return arg;
            };
            let name = flag.split_once('=').map_or(flag, |(name, _)| name);
            if SINGLE_DASH_LONG_FLAGS.contains(&name) {
                OsString::from(format!("-{text}"))
            } else {
                arg
            }
        })
        .collect()
}

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub network: NetworkConfig,
    pub routing_service_url: String,
}

impl ServerConfig {
    /// Resolves defaults for every setting the arguments leave open.
    #[must_use]
    pub fn from_args(args: Args) -> Self {
        let port = non_empty(args.port).unwrap_or_else(|| DEFAULT_PORT.to_string());
        let http_addr = non_empty(args.http_addr).unwrap_or_else(|| format!(":{port}"));
        let routing_service_url = non_empty(args.routing_service_url)
            .unwrap_or_else(|| DEFAULT_ROUTING_SERVICE_URL.to_string());

        Self {
            network: NetworkConfig {
                http_addr: bind_addr(&http_addr),
                ..NetworkConfig::default()
            },
            routing_service_url,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
