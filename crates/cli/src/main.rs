use anyhow::Context;
use clap::{Parser, Subcommand};
use rackdiag_core::{
    config::{diagnose_url_from_env_value, timeout_from_env_value},
    render, schema,
    simulator::{self, Fault},
    ClientConfig, FormController, HttpDiagnoseClient,
};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod interactive;

#[derive(Parser)]
#[command(name = "rackdiag")]
#[command(about = "Supermarket refrigeration diagnostics CLI")]
struct Cli {
    /// Diagnose endpoint URL (overrides RACKDIAG_DIAGNOSE_URL)
    #[arg(long, global = true)]
    url: Option<String>,
    /// Request timeout in seconds (overrides RACKDIAG_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List diagnostic types
    Types,
    /// List the fields of a diagnostic type
    Fields {
        /// Diagnostic type key, e.g. low_suction
        diagnostic_type: String,
    },
    /// Submit one diagnosis request and print the result
    Diagnose {
        /// Diagnostic type key, e.g. low_suction
        diagnostic_type: String,
        /// Field value as name=value; unset fields use their defaults
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
    /// Fill a form from a simulated rack fault and print it
    Simulate {
        /// Fault to inject: low_charge, high_discharge_temp or low_suction_pressure
        #[arg(value_parser = parse_fault)]
        fault: Fault,
        /// Diagnostic type to seed; defaults to the first type
        #[arg(long = "type")]
        diagnostic_type: Option<String>,
        /// Submit the seeded form and print the diagnosis
        #[arg(long)]
        submit: bool,
    },
    /// Fill in and submit the form interactively
    Interactive,
}

fn parse_fault(s: &str) -> Result<Fault, String> {
    s.parse().map_err(|e: rackdiag_core::DiagError| e.to_string())
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {s:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in {s:?}"));
    }
    Ok((name.to_string(), value.to_string()))
}

fn client_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let diagnose_url = diagnose_url_from_env_value(
        cli.url
            .clone()
            .or_else(|| std::env::var("RACKDIAG_DIAGNOSE_URL").ok()),
    );
    let timeout = match cli.timeout_secs {
        Some(secs) => Duration::from_secs(secs),
        None => timeout_from_env_value(std::env::var("RACKDIAG_TIMEOUT_SECS").ok())?,
    };
    Ok(ClientConfig::new(diagnose_url, timeout)?)
}

async fn submit_and_print(form: &mut FormController, cfg: &ClientConfig) -> anyhow::Result<()> {
    let client = HttpDiagnoseClient::new(cfg)?;
    tracing::info!(
        diagnostic_type = form.selected().value,
        url = cfg.diagnose_url(),
        "submitting diagnosis"
    );
    form.submit(&client, cfg.timeout()).await?;

    if let Some(text) = render::render_outcome(form) {
        print!("{text}");
    }
    if let Some(failure) = form.last_failure() {
        tracing::warn!(error = %failure, "diagnosis failed");
        anyhow::bail!("diagnosis failed: {failure}");
    }
    tracing::info!("diagnosis received");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rackdiag=info".parse()?)
                .add_directive("rackdiag_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Types) => {
            for d in schema::diagnostic_types() {
                println!("{:<16} {}", d.value, d.label);
            }
        }
        Some(Commands::Fields { diagnostic_type }) => {
            let d = schema::find(diagnostic_type)
                .with_context(|| format!("unknown diagnostic type: {diagnostic_type}"))?;
            println!("{} ({})", d.label, d.value);
            for f in d.fields {
                println!("  {:<18} {} (default {}, required)", f.name, f.label, f.default);
            }
        }
        Some(Commands::Diagnose {
            diagnostic_type,
            set,
        }) => {
            let cfg = client_config(&cli)?;

            let mut form = FormController::new();
            form.select_diagnostic_type(diagnostic_type)?;
            for (name, value) in set {
                form.set_field_value(name, value)?;
            }

            submit_and_print(&mut form, &cfg).await?;
        }
        Some(Commands::Simulate {
            fault,
            diagnostic_type,
            submit,
        }) => {
            let mut form = FormController::new();
            if let Some(key) = diagnostic_type {
                form.select_diagnostic_type(key)?;
            }
            let state = simulator::simulate(&mut rand::thread_rng(), *fault);
            let seeded = simulator::seed_form(&mut form, &state)?;
            tracing::info!(fault = fault.as_str(), fields = ?seeded, "form seeded from simulated rack");

            print!("{}", render::render_rack_state(&state));
            print!("{}", render::render_form(&form));

            if *submit {
                let cfg = client_config(&cli)?;
                submit_and_print(&mut form, &cfg).await?;
            }
        }
        Some(Commands::Interactive) => {
            let cfg = client_config(&cli)?;
            let client = HttpDiagnoseClient::new(&cfg)?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            let mut rng = rand::thread_rng();
            interactive::run(stdin, &mut stdout, &client, cfg.timeout(), &mut rng).await?;
        }
        None => {
            println!("Use 'rackdiag --help' for commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_parsing() {
        assert_eq!(
            parse_assignment("superheat=10").unwrap(),
            ("superheat".to_string(), "10".to_string())
        );
        assert_eq!(
            parse_assignment(" superheat = 1=2").unwrap(),
            ("superheat".to_string(), " 1=2".to_string())
        );
        assert!(parse_assignment("superheat").is_err());
        assert!(parse_assignment("=10").is_err());
    }

    #[test]
    fn cli_parses_repeated_set_flags() {
        let cli = Cli::parse_from([
            "rackdiag",
            "diagnose",
            "low_suction",
            "--set",
            "suction_pressure=30",
            "--set",
            "superheat=10",
            "--timeout-secs",
            "5",
        ]);
        assert_eq!(cli.timeout_secs, Some(5));
        match cli.command {
            Some(Commands::Diagnose {
                diagnostic_type,
                set,
            }) => {
                assert_eq!(diagnostic_type, "low_suction");
                assert_eq!(set.len(), 2);
            }
            _ => panic!("expected diagnose command"),
        }
    }

    #[test]
    fn cli_parses_simulate_command() {
        let cli = Cli::parse_from([
            "rackdiag",
            "simulate",
            "high_discharge_temp",
            "--type",
            "high_head",
            "--submit",
        ]);
        match cli.command {
            Some(Commands::Simulate {
                fault,
                diagnostic_type,
                submit,
            }) => {
                assert_eq!(fault, Fault::HighDischargeTemp);
                assert_eq!(diagnostic_type.as_deref(), Some("high_head"));
                assert!(submit);
            }
            _ => panic!("expected simulate command"),
        }

        assert!(Cli::try_parse_from(["rackdiag", "simulate", "frozen_coil"]).is_err());
    }
}
