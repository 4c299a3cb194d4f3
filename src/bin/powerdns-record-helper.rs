mod cli;

use std::process::ExitCode;

use clap::Parser;
use env_logger::Builder;
use log::{error, info};

use powerdns_record_helper::{
    backend::{ApiBackend, ApiBackendConfig},
    provision::{CreateOutcome, ProvisionError, Provisioner},
};

use cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();

    Builder::new().filter_level(cli.loglevel.into()).init();

    let backend = match get_backend(&cli) {
        Ok(b) => b,
        Err(e) => {
            error!("Unable to create backend: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let provisioner = Provisioner::new(&backend);
    match run_command(&provisioner, &cli.command) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn get_backend(cli: &Cli) -> Result<ApiBackend, powerdns_record_helper::backend::BackendError> {
    ApiBackend::from_config(&ApiBackendConfig {
        api_url: &cli.api_url,
        api_key: &cli.api_key,
        server_id: &cli.server_id,
        ttl: cli.record_ttl,
    })
}

fn run_command(provisioner: &Provisioner, command: &Command) -> Result<(), ProvisionError> {
    match command {
        Command::CreateA { fqdn, address } => {
            report_create(provisioner.create_a_record(fqdn, address)?);
        }
        Command::CreateAaaa { fqdn, address } => {
            report_create(provisioner.create_aaaa_record(fqdn, address)?);
        }
        Command::CreatePtr { fqdn, address } => {
            report_create(provisioner.create_ptr_record(fqdn, address)?);
        }
        Command::RemoveA { fqdn } => {
            provisioner.remove_a_record(fqdn)?;
            info!("Record removed");
        }
        Command::RemoveAaaa { fqdn } => {
            provisioner.remove_aaaa_record(fqdn)?;
            info!("Record removed");
        }
        Command::RemovePtr { address } => {
            provisioner.remove_ptr_record(address)?;
            info!("Record removed");
        }
    }
    Ok(())
}

fn report_create(outcome: CreateOutcome) {
    match outcome {
        CreateOutcome::Created => info!("Record created"),
        CreateOutcome::Unchanged => info!("Record already present, nothing to do"),
    }
}
