//! Interactive command loop over a shared [`Bank`].

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::debug;

use crate::bank::Bank;
use crate::command::{Command, HELP, parse_command};
use crate::io::config::BankerConfig;
use crate::render::{render_outcome, render_safety, render_state, render_trace};

/// Read commands from `input` until `exit` or EOF, writing results to `output`.
///
/// Parse errors and rejected requests are reported and the loop continues;
/// only I/O failures end it early.
pub fn run_shell<R: BufRead, W: Write>(
    bank: &Bank,
    config: &BankerConfig,
    input: R,
    mut output: W,
) -> Result<()> {
    write!(output, "{}", config.prompt).context("write prompt")?;
    output.flush().context("flush prompt")?;

    for line in input.lines() {
        let line = line.context("read command")?;
        debug!(line = %line, "shell input");
        match parse_command(&line) {
            Ok(Command::Exit) => return Ok(()),
            Ok(command) => execute(bank, config, command, &mut output)?,
            Err(message) => writeln!(output, "error: {}", message).context("write error")?,
        }
        write!(output, "{}", config.prompt).context("write prompt")?;
        output.flush().context("flush prompt")?;
    }

    writeln!(output).context("write newline")?;
    Ok(())
}

fn execute<W: Write>(
    bank: &Bank,
    config: &BankerConfig,
    command: Command,
    output: &mut W,
) -> Result<()> {
    match command {
        Command::ShowState => {
            let rendered = render_state(&bank.snapshot())?;
            writeln!(output, "{}", rendered.trim_end()).context("write state")?;
        }
        Command::CheckSafety => {
            let report = bank.check_safety();
            if config.show_trace {
                write_lines(output, &render_trace(&report.trace))?;
            }
            let process_count = bank.snapshot().process_count();
            writeln!(output, "{}", render_safety(&report, process_count))
                .context("write verdict")?;
        }
        Command::Request { pid, units } => {
            let outcome = bank.request(pid, &units);
            if config.show_trace {
                write_lines(output, &render_trace(outcome.trace()))?;
            }
            writeln!(output, "{}", render_outcome(&outcome)).context("write verdict")?;
        }
        Command::Help => writeln!(output, "{}", HELP).context("write help")?,
        Command::Empty | Command::Exit => {}
    }
    Ok(())
}

fn write_lines<W: Write>(output: &mut W, lines: &[String]) -> Result<()> {
    for line in lines {
        writeln!(output, "{}", line).context("write trace")?;
    }
    Ok(())
}
