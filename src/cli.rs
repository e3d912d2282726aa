use std::io::Write;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::editor::FieldListEditor;
use crate::errors::FormError;
use crate::events::FormEvent;
use crate::submit::{SubmitFormat, SubmitSink, WriterSink};

#[derive(Parser, Debug)]
#[command(name = "questionnaire")]
#[command(about = "Build a questionnaire in the terminal: add, relabel, answer and delete fields, then submit")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    /// Run in CLI mode (print the submission and exit, no interactive TUI)
    #[arg(long, global = true)]
    pub cli: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay form events against a fresh form
    Apply {
        /// Event to apply, in order: add, delete:N, label:N:TEXT, value:N:TEXT, submit
        #[arg(long = "op", value_name = "EVENT")]
        ops: Vec<FormEvent>,

        /// Output format for CLI mode (json, csv) [default: json]
        #[arg(long)]
        format: Option<SubmitFormat>,

        /// Print JSON on a single line (CLI mode only)
        #[arg(long)]
        compact: bool,
    },
}

impl Commands {
    /// Reject options that only affect CLI-mode output when the TUI will open
    pub fn check_tui_options(&self) -> Result<()> {
        match self {
            Commands::Apply { format, compact, .. } => {
                if format.is_some() || *compact {
                    return Err(anyhow::anyhow!(
                        "--format and --compact only apply together with --cli"
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Replay `ops` on a fresh form and print the resulting state.
///
/// Submit events among `ops` go to `sink`; the final state is written to
/// `out`. Nothing is written when an event fails.
pub fn print_applied<W: Write>(
    ops: &[FormEvent],
    sink: &mut dyn SubmitSink,
    out: W,
    format: SubmitFormat,
    pretty: bool,
) -> Result<FieldListEditor, FormError> {
    let mut editor = FieldListEditor::initialize();
    editor.replay(ops, sink)?;

    let mut out_sink = WriterSink::new(out, format, "stdout").with_pretty(pretty);
    out_sink.deliver(&editor.submit())?;
    Ok(editor)
}
