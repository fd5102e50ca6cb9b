//! Prompt-driven interactive mode.
//!
//! A small menu loop over the same pipeline the `run` command uses. The loop
//! is generic over its input and output streams so it can be driven by
//! scripted readers in tests.

use super::{io_error, run_pod, write_outcome, write_pod_info};
use crate::error::Result;
use crate::pod::{self, PodDefinition, RuntimeInputs};
use std::io::{BufRead, Write};
use std::path::Path;

pub(super) fn interactive_loop(
    input: &mut impl BufRead,
    output: &mut impl Write,
    pods_dir: &Path,
    tools_config: &Path,
    runner_cmd: Option<&str>,
) -> Result<()> {
    writeln!(output, "OrcasAI interactive mode. Pods dir: {}", pods_dir.display())
        .map_err(io_error)?;

    loop {
        writeln!(output).map_err(io_error)?;
        writeln!(output, "1) list pods").map_err(io_error)?;
        writeln!(output, "2) pod details").map_err(io_error)?;
        writeln!(output, "3) run a pod").map_err(io_error)?;
        writeln!(output, "4) exit").map_err(io_error)?;

        let Some(choice) = prompt(input, output, "choice> ")? else {
            break;
        };

        match choice.as_str() {
            "1" => {
                list_pods(output, pods_dir)?;
            }
            "2" => {
                if let Some(def) = select_pod(input, output, pods_dir)? {
                    writeln!(output).map_err(io_error)?;
                    write_pod_info(output, &def).map_err(io_error)?;
                }
            }
            "3" => {
                if let Some(def) = select_pod(input, output, pods_dir)? {
                    run_selected(input, output, &def, pods_dir, tools_config, runner_cmd)?;
                }
            }
            "4" | "exit" | "quit" => break,
            "" => {}
            other => {
                writeln!(output, "Unknown choice '{}'.", other).map_err(io_error)?;
            }
        }
    }

    writeln!(output, "Goodbye.").map_err(io_error)?;
    Ok(())
}

/// Discover pods and print a numbered list. Shared by the list and select
/// steps.
fn list_pods(output: &mut impl Write, pods_dir: &Path) -> Result<Vec<String>> {
    let discovery = pod::discover(pods_dir)?;
    let keys: Vec<String> = discovery.pods().keys().cloned().collect();

    if keys.is_empty() {
        writeln!(output, "No pods found in '{}'.", pods_dir.display()).map_err(io_error)?;
    } else {
        writeln!(output, "Available pods:").map_err(io_error)?;
        for (i, key) in keys.iter().enumerate() {
            let name = discovery
                .get(key)
                .map(|d| d.name.as_str())
                .unwrap_or(key.as_str());
            writeln!(output, "  {}. {} - {}", i + 1, key, name).map_err(io_error)?;
        }
    }
    for err in discovery.errors() {
        writeln!(output, "  (skipped: {})", err).map_err(io_error)?;
    }
    Ok(keys)
}

/// Show the numbered pod list and read a selection, by number or by key.
/// Returns `None` when there is nothing to select or the stream ended.
fn select_pod(
    input: &mut impl BufRead,
    output: &mut impl Write,
    pods_dir: &Path,
) -> Result<Option<PodDefinition>> {
    let keys = list_pods(output, pods_dir)?;
    if keys.is_empty() {
        return Ok(None);
    }

    let Some(answer) = prompt(input, output, "pod> ")? else {
        return Ok(None);
    };

    let key = match answer.parse::<usize>() {
        Ok(n) if n >= 1 && n <= keys.len() => keys[n - 1].clone(),
        Ok(_) => {
            writeln!(output, "No pod numbered '{}'.", answer).map_err(io_error)?;
            return Ok(None);
        }
        Err(_) => answer,
    };

    match pod::get(pods_dir, &key) {
        Ok(def) => Ok(Some(def)),
        Err(err) => {
            writeln!(output, "Error: {}", err).map_err(io_error)?;
            Ok(None)
        }
    }
}

fn run_selected(
    input: &mut impl BufRead,
    output: &mut impl Write,
    def: &PodDefinition,
    pods_dir: &Path,
    tools_config: &Path,
    runner_cmd: Option<&str>,
) -> Result<()> {
    let Some(inputs) = prompt_inputs(input, output, def)? else {
        return Ok(());
    };

    writeln!(output).map_err(io_error)?;
    writeln!(output, "Deploying pod: {}", def.key).map_err(io_error)?;

    // A failed run keeps the session alive; only i/o trouble ends the loop.
    match run_pod(pods_dir, tools_config, &def.key, &inputs, runner_cmd, false) {
        Ok(outcome) => write_outcome(output, &outcome).map_err(io_error),
        Err(err) => writeln!(output, "Error: {}", err).map_err(io_error),
    }
}

/// Prompt for every declared input. Required inputs are re-asked while
/// empty; optional inputs are skipped on an empty answer so the binder can
/// apply declared defaults. Returns `None` when the input stream ends.
fn prompt_inputs(
    input: &mut impl BufRead,
    output: &mut impl Write,
    def: &PodDefinition,
) -> Result<Option<RuntimeInputs>> {
    let mut inputs = RuntimeInputs::new();

    for decl in &def.inputs.required {
        let hint = match &decl.example {
            Some(example) => format!("{} (e.g. {})> ", decl.name, example),
            None => format!("{}> ", decl.name),
        };
        loop {
            if !decl.description.is_empty() {
                writeln!(output, "{}: {}", decl.name, decl.description).map_err(io_error)?;
            }
            let Some(value) = prompt(input, output, &hint)? else {
                return Ok(None);
            };
            if value.is_empty() {
                writeln!(output, "'{}' is required.", decl.name).map_err(io_error)?;
                continue;
            }
            inputs.insert(decl.name.clone(), value);
            break;
        }
    }

    for decl in &def.inputs.optional {
        let Some(value) = prompt(input, output, &format!("{} (optional)> ", decl.name))? else {
            return Ok(None);
        };
        if !value.is_empty() {
            inputs.insert(decl.name.clone(), value);
        }
    }

    Ok(Some(inputs))
}

/// Print a prompt and read one trimmed line. `None` means end of stream.
fn prompt(
    input: &mut impl BufRead,
    output: &mut impl Write,
    text: &str,
) -> Result<Option<String>> {
    write!(output, "{}", text).map_err(io_error)?;
    output.flush().map_err(io_error)?;

    let mut line = String::new();
    let read = input.read_line(&mut line).map_err(io_error)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
