//! Line-oriented interactive form.

use rackdiag_core::{
    render, schema,
    simulator::{self, Fault, RackState},
    DiagError, DiagnoseClient, FormController,
};
use rand::Rng;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const HELP: &str = "\
Commands:
  types                 list diagnostic types
  type <key>            select a diagnostic type
  set <field> <value>   enter a field value
  faults                list simulated faults
  simulate <fault>      fill the form from a simulated rack fault
  state                 show the last simulated rack state
  show                  show the form
  submit                get a diagnosis
  help                  show this help
  q                     quit
";

/// Split off the first whitespace-delimited word; the remainder keeps its inner spacing.
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim();
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}

/// Run the interactive form until `q` or end of input.
pub async fn run<R, W, G>(
    reader: R,
    out: &mut W,
    client: &dyn DiagnoseClient,
    timeout: Duration,
    rng: &mut G,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    G: Rng + ?Sized,
{
    let mut form = FormController::new();
    let mut rack: Option<RackState> = None;
    let mut lines = reader.lines();

    writeln!(out, "Supermarket Refrigeration Diagnostics")?;
    write!(out, "{HELP}")?;
    write!(out, "{}", render::render_form(&form))?;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let (command, args) = split_word(&line);

        match command {
            "" => {}
            "q" | "quit" => break,
            "help" => write!(out, "{HELP}")?,
            "types" => {
                for d in schema::diagnostic_types() {
                    writeln!(out, "  {:<16} {}", d.value, d.label)?;
                }
            }
            "type" if !args.is_empty() => match form.select_diagnostic_type(args) {
                Ok(()) => write!(out, "{}", render::render_form(&form))?,
                Err(e) => writeln!(out, "Error: {e}")?,
            },
            "set" => match split_word(args) {
                (name, value) if !name.is_empty() && !value.is_empty() => {
                    if let Err(e) = form.set_field_value(name, value) {
                        writeln!(out, "Error: {e}")?;
                    }
                }
                _ => writeln!(out, "Usage: set <field> <value>")?,
            },
            "faults" => {
                for fault in Fault::ALL {
                    writeln!(out, "  {:<22} {}", fault.as_str(), fault.label())?;
                }
            }
            "simulate" => match args.parse::<Fault>() {
                Ok(fault) => {
                    let state = simulator::simulate(rng, fault);
                    let seeded = simulator::seed_form(&mut form, &state)?;
                    tracing::info!(fault = fault.as_str(), fields = ?seeded, "form seeded from simulated rack");
                    write!(out, "{}", render::render_rack_state(&state))?;
                    write!(out, "{}", render::render_form(&form))?;
                    rack = Some(state);
                }
                Err(e) => writeln!(out, "Error: {e}")?,
            },
            "state" => match &rack {
                Some(state) => write!(out, "{}", render::render_rack_state(state))?,
                None => writeln!(out, "No rack state simulated yet.")?,
            },
            "show" => {
                write!(out, "{}", render::render_form(&form))?;
                if let Some(text) = render::render_outcome(&form) {
                    write!(out, "{text}")?;
                }
            }
            "submit" => {
                writeln!(out, "Diagnosing...")?;
                out.flush()?;
                match form.submit(client, timeout).await {
                    Ok(_) => {
                        match form.last_failure() {
                            Some(failure) => tracing::warn!(error = %failure, "interactive diagnosis failed"),
                            None => tracing::info!(diagnostic_type = form.selected().value, "interactive diagnosis received"),
                        }
                        if let Some(text) = render::render_outcome(&form) {
                            write!(out, "{text}")?;
                        }
                    }
                    Err(e @ (DiagError::InvalidFields(_) | DiagError::SubmitInFlight)) => {
                        tracing::debug!(error = %e, "submit refused");
                        writeln!(out, "Error: {e}")?
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            _ => writeln!(out, "Unrecognised command: {line}. Type 'help' for commands.")?,
        }
    }

    Ok(())
}
