//! Line-oriented command surface for the interactive shell.

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ShowState,
    CheckSafety,
    /// `request <pid> <r0> ... <r(m-1)>`. Components stay signed so the core
    /// can reject negative values itself.
    Request { pid: usize, units: Vec<i64> },
    Help,
    Exit,
    /// Blank or whitespace-only line.
    Empty,
}

pub const HELP: &str = "\
commands:
  show-state                       print total, available and per-process matrices
  check-safety                     run the safety algorithm on the current state
  request <pid> <r0> ... <r(m-1)>  ask for units on behalf of process <pid>
  help                             show this message
  exit                             leave the shell";

/// Parse one input line. Errors are human-readable and recoverable.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Command::Empty);
    };
    let rest: Vec<&str> = words.collect();

    match head {
        "show-state" | "show" => no_args(head, &rest, Command::ShowState),
        "check-safety" | "check" => no_args(head, &rest, Command::CheckSafety),
        "help" | "?" => no_args(head, &rest, Command::Help),
        "exit" | "quit" => no_args(head, &rest, Command::Exit),
        "request" => parse_request(&rest),
        other => Err(format!("unknown command '{}' (try 'help')", other)),
    }
}

fn no_args(head: &str, rest: &[&str], command: Command) -> Result<Command, String> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(format!("'{}' takes no arguments", head))
    }
}

fn parse_request(args: &[&str]) -> Result<Command, String> {
    let (pid_raw, unit_raws) = args
        .split_first()
        .ok_or_else(|| "usage: request <pid> <r0> ... <r(m-1)>".to_string())?;
    let pid = pid_raw
        .parse::<usize>()
        .map_err(|_| format!("process id must be a non-negative integer, got '{}'", pid_raw))?;
    let units = unit_raws
        .iter()
        .map(|raw| {
            raw.parse::<i64>()
                .map_err(|_| format!("resource count must be an integer, got '{}'", raw))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Command::Request { pid, units })
}
