//! Interactive line-based command menu.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::display::{render_history, render_tree};
use crate::grid::NodeId;
use crate::sim::engine::Simulation;

const MENU: &str = "\n===== Electricity Load Balancer Menu =====\n\
                    1. Display Grid\n\
                    2. Add Demand to Node\n\
                    3. Balance Load\n\
                    4. View Node Load History\n\
                    5. Show Max/Min Load Node\n\
                    6. Simulate Power Loss/Recovery\n\
                    7. Exit\n";

/// Runs the menu loop until the user exits or input ends.
///
/// Command failures (unknown node, report errors) are printed and the loop
/// continues; only I/O errors on `input`/`output` abort it.
///
/// # Errors
///
/// Returns an `io::Error` if reading input or writing output fails.
pub fn run(sim: &mut Simulation, mut input: impl BufRead, mut output: impl Write) -> io::Result<()> {
    loop {
        write!(output, "{MENU}")?;
        let Some(choice) = prompt::<u32>(&mut input, &mut output, "Enter your choice: ")? else {
            return Ok(());
        };

        match choice {
            Ok(1) => write!(output, "{}", render_tree(sim.grid()))?,
            Ok(2) => add_demand(sim, &mut input, &mut output)?,
            Ok(3) => match sim.balance() {
                Ok(outcome) => {
                    for visit in &outcome.visits {
                        writeln!(output, "\n{visit}")?;
                    }
                }
                Err(e) => writeln!(output, "error: {e}")?,
            },
            Ok(4) => {
                let Some(id) = prompt_id(&mut input, &mut output, "Enter Node ID: ")? else {
                    return Ok(());
                };
                match id.map(|id| sim.history(id)) {
                    Some(Ok(history)) => write!(output, "{}", render_history(history))?,
                    Some(Err(e)) => writeln!(output, "{e}")?,
                    None => writeln!(output, "Invalid node id.")?,
                }
            }
            Ok(5) => match sim.load_extremes() {
                Some(ext) => {
                    let name = |id| sim.grid().node(id).map_or("?", |n| n.name.as_str());
                    writeln!(output, "Max Load: {} with {} units", name(ext.max), ext.max_load)?;
                    writeln!(output, "Min Load: {} with {} units", name(ext.min), ext.min_load)?;
                }
                None => writeln!(output, "No active nodes found.")?,
            },
            Ok(6) => {
                let Some(id) = prompt_id(&mut input, &mut output, "Enter Node ID to toggle power status: ")? else {
                    return Ok(());
                };
                match id.map(|id| sim.toggle_power(id).map(|active| (id, active))) {
                    Some(Ok((id, active))) => {
                        let name = sim.grid().node(id).map_or("?", |n| n.name.as_str());
                        let state = if active { "ACTIVE" } else { "INACTIVE (Power Loss)" };
                        writeln!(output, "Node {name} is now {state}.")?;
                    }
                    Some(Err(e)) => writeln!(output, "{e}")?,
                    None => writeln!(output, "Invalid node id.")?,
                }
            }
            Ok(7) => return Ok(()),
            _ => writeln!(output, "Invalid choice.")?,
        }
    }
}

fn add_demand(sim: &mut Simulation, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<()> {
    let Some(id) = prompt_id(input, output, "Enter Node ID: ")? else {
        return Ok(());
    };
    let Some(units) = prompt::<u64>(input, output, "Enter demand (in units): ")? else {
        return Ok(());
    };
    let Some(critical) = prompt::<u8>(input, output, "Is this critical demand? (1 = Yes, 0 = No): ")? else {
        return Ok(());
    };

    match (id, units, critical) {
        (Some(id), Ok(units), Ok(flag @ (0 | 1))) => {
            if let Err(e) = sim.add_demand(id, units, flag == 1) {
                writeln!(output, "{e}")?;
            }
        }
        _ => writeln!(output, "Invalid demand input.")?,
    }
    Ok(())
}

/// Prints `label`, reads one line and parses it. `None` means end of input.
fn prompt<T: FromStr>(
    input: &mut impl BufRead,
    output: &mut impl Write,
    label: &str,
) -> io::Result<Option<Result<T, T::Err>>> {
    write!(output, "{label}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().parse::<T>()))
}

fn prompt_id(
    input: &mut impl BufRead,
    output: &mut impl Write,
    label: &str,
) -> io::Result<Option<Option<NodeId>>> {
    Ok(prompt::<u32>(input, output, label)?.map(|r| r.ok().map(NodeId)))
}
