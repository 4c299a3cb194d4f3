use clap::{Parser, Subcommand};

macro_rules! env_prefix {
    () => {
        "PDNS_HELPER_"
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the PowerDNS API webserver, e.g. http://127.0.0.1:8081
    #[arg(
        short = 'u',
        long,
        required = true,
        value_name = "URL",
        env = concat!(env_prefix!(), "API_URL")
    )]
    pub api_url: String,

    /// API key to authenticate with
    #[arg(
        short = 'k',
        long,
        required = true,
        value_name = "API_KEY",
        env = concat!(env_prefix!(), "API_KEY")
    )]
    pub api_key: String,

    /// Id of the PowerDNS server to manage. The native server is always called 'localhost'
    #[arg(
        long,
        default_value = "localhost",
        value_name = "SERVER_ID",
        env = concat!(env_prefix!(), "SERVER_ID")
    )]
    pub server_id: String,

    /// Optionally set a TTL for newly created records.
    /// Uses the built-in default (86400) if not specified
    #[arg(
        long,
        value_name = "TTL",
        env = concat!(env_prefix!(), "RECORD_TTL"),
    )]
    pub record_ttl: Option<u32>,

    /// Set the loglevel of the application
    #[arg(
        value_enum,
        short = 'l',
        long,
        default_value_t = Loglevel::Info,
        value_name = "LEVEL",
        env = concat!(env_prefix!(), "LOGLEVEL")
    )]
    pub loglevel: Loglevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create an A record, unless an identical one already exists.
    /// Fails if the name already has an A record with a different address
    CreateA {
        /// Name of the record, e.g. host.example.com
        fqdn: String,
        /// IPv4 address the record points to
        address: String,
    },
    /// Create an AAAA record, with the same collision rules as create-a
    CreateAaaa {
        /// Name of the record, e.g. host.example.com
        fqdn: String,
        /// IPv6 address the record points to
        address: String,
    },
    /// Create a PTR record mapping an address back to a hostname.
    /// The reverse node name is derived from the address
    CreatePtr {
        /// Hostname the PTR record points to
        fqdn: String,
        /// IPv4 or IPv6 address to derive the reverse name from
        address: String,
    },
    /// Remove the A record(s) at a name
    RemoveA {
        /// Name of the record to remove
        fqdn: String,
    },
    /// Remove the AAAA record(s) at a name
    RemoveAaaa {
        /// Name of the record to remove
        fqdn: String,
    },
    /// Remove the PTR record for an address
    RemovePtr {
        /// IPv4 or IPv6 address whose reverse mapping should be removed
        address: String,
    },
}

use clap::ValueEnum;
use log::LevelFilter;

/// Used to set the applications loglevel
// This is essentially a re-creation of log:Level. However, that enum doesn't derive ValueEnum, so we have to do it manually here
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum)]
pub enum Loglevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
impl From<Loglevel> for LevelFilter {
    fn from(ll: Loglevel) -> Self {
        match ll {
            Loglevel::Error => LevelFilter::Error,
            Loglevel::Warn => LevelFilter::Warn,
            Loglevel::Info => LevelFilter::Info,
            Loglevel::Debug => LevelFilter::Debug,
            Loglevel::Trace => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn should_have_valid_clap_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn should_parse_create_a_invocation() {
        let cli = Cli::parse_from([
            "powerdns-record-helper",
            "--api-url",
            "http://127.0.0.1:8081",
            "--api-key",
            "secret",
            "create-a",
            "test.example.com",
            "10.1.1.1",
        ]);
        assert_eq!(
            cli.command,
            Command::CreateA {
                fqdn: "test.example.com".to_string(),
                address: "10.1.1.1".to_string()
            }
        );
        assert_eq!(cli.server_id, "localhost");
        assert_eq!(cli.record_ttl, None);
    }
}
