//! Command implementations for orcasai.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the shared run pipeline: look up the pod, bind
//! inputs, load the tool registry, assemble the graph, execute it.

mod interactive;

use crate::assemble;
use crate::cli::{Cli, Command, InfoArgs, InteractiveArgs, RunArgs};
use crate::error::{OrcaError, Result};
use crate::pod::{self, PodDefinition, RuntimeInputs};
use crate::runtime::{self, ConsoleProgress, ExecutionOutcome, ProcessRuntime};
use crate::template;
use crate::tools::ToolRegistry;
use std::io::Write;
use std::path::Path;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::List => cmd_list(&cli.pods_dir),
        Command::Info(args) => cmd_info(&cli.pods_dir, &args),
        Command::Run(args) => cmd_run(&cli.pods_dir, &cli.tools_config, args),
        Command::Interactive(args) => cmd_interactive(&cli.pods_dir, &cli.tools_config, args),
    }
}

fn cmd_list(pods_dir: &Path) -> Result<()> {
    let discovery = pod::discover(pods_dir)?;

    if discovery.is_empty() && discovery.errors().is_empty() {
        println!("No pods found in '{}'.", pods_dir.display());
        return Ok(());
    }

    if !discovery.is_empty() {
        println!("Available pods:");
        for (key, def) in discovery.pods() {
            println!();
            println!("  {} - {}", key, def.name);
            if !def.description.is_empty() {
                println!("      {}", def.description);
            }
            println!(
                "      agents: {}",
                def.agents.keys().cloned().collect::<Vec<_>>().join(", ")
            );
            println!("      tasks: {}", def.workflow_order().join(" -> "));
            if !def.required_input_names().is_empty() {
                println!("      required inputs: {}", def.required_input_names().join(", "));
            }
            if !def.optional_input_names().is_empty() {
                println!("      optional inputs: {}", def.optional_input_names().join(", "));
            }
        }
        println!();
    }

    if !discovery.errors().is_empty() {
        println!("Pods that failed to load:");
        for err in discovery.errors() {
            println!("  {}", err);
        }
        println!();
    }

    println!(
        "{} pod(s) loaded, {} error(s)",
        discovery.len(),
        discovery.errors().len()
    );
    Ok(())
}

fn cmd_info(pods_dir: &Path, args: &InfoArgs) -> Result<()> {
    let def = pod::get(pods_dir, &args.pod)?;
    let stdout = std::io::stdout();
    write_pod_info(&mut stdout.lock(), &def).map_err(io_error)
}

fn write_pod_info(w: &mut impl Write, def: &PodDefinition) -> std::io::Result<()> {
    writeln!(w, "Pod: {} ({})", def.name, def.key)?;
    if !def.description.is_empty() {
        writeln!(w, "Mission: {}", def.description)?;
    }
    writeln!(w, "LLM: {} @ {}", def.llm.model, def.llm.base_url)?;

    writeln!(w)?;
    writeln!(w, "Agents ({}):", def.agents.len())?;
    for (key, agent) in &def.agents {
        writeln!(w, "  {} - {}", key, agent.role)?;
        if !agent.tools.is_empty() {
            writeln!(w, "      tools: {}", agent.tools.join(", "))?;
        }
    }

    writeln!(w)?;
    writeln!(w, "Workflow ({} task(s)):", def.workflow_order().len())?;
    for task_key in def.workflow_order() {
        if let Some(task) = def.tasks.get(task_key) {
            writeln!(w, "  {} -> {}", task_key, task.agent)?;
            let placeholders = template::placeholders(&task.description);
            if !placeholders.is_empty() {
                writeln!(w, "      placeholders: {}", placeholders.join(", "))?;
            }
        }
    }

    if !def.tools.enabled.is_empty() {
        writeln!(w)?;
        writeln!(w, "Enabled tools: {}", def.tools.enabled.join(", "))?;
    }
    if !def.tools.disabled.is_empty() {
        writeln!(w, "Disabled tools: {}", def.tools.disabled.join(", "))?;
    }

    if !def.inputs.required.is_empty() {
        writeln!(w)?;
        writeln!(w, "Required inputs:")?;
        for decl in &def.inputs.required {
            write_input_decl(w, decl)?;
        }
    }
    if !def.inputs.optional.is_empty() {
        writeln!(w)?;
        writeln!(w, "Optional inputs:")?;
        for decl in &def.inputs.optional {
            write_input_decl(w, decl)?;
            if let Some(default) = &decl.default {
                writeln!(w, "      default: {}", default)?;
            }
        }
    }
    Ok(())
}

fn write_input_decl(w: &mut impl Write, decl: &crate::pod::InputDecl) -> std::io::Result<()> {
    if decl.description.is_empty() {
        writeln!(w, "  {}", decl.name)?;
    } else {
        writeln!(w, "  {} - {}", decl.name, decl.description)?;
    }
    if let Some(example) = &decl.example {
        writeln!(w, "      example: {}", example)?;
    }
    Ok(())
}

fn io_error(err: std::io::Error) -> OrcaError {
    OrcaError::UserError(format!("terminal i/o error: {}", err))
}

fn cmd_run(pods_dir: &Path, tools_config: &Path, args: RunArgs) -> Result<()> {
    let inputs = collect_inputs(&args);

    println!("Deploying pod: {}", args.pod);
    for (key, value) in &inputs {
        println!("  input {} = {}", key, value);
    }

    let outcome = run_pod(
        pods_dir,
        tools_config,
        &args.pod,
        &inputs,
        args.runner_cmd.as_deref(),
        args.json,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome).map_err(|e| {
            OrcaError::UserError(format!("failed to serialize outcome: {}", e))
        })?);
    } else {
        let stdout = std::io::stdout();
        write_outcome(&mut stdout.lock(), &outcome).map_err(io_error)?;
    }

    if outcome.success {
        Ok(())
    } else {
        Err(OrcaError::Execution(outcome.result))
    }
}

fn cmd_interactive(pods_dir: &Path, tools_config: &Path, args: InteractiveArgs) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    interactive::interactive_loop(
        &mut stdin.lock(),
        &mut stdout.lock(),
        pods_dir,
        tools_config,
        args.runner_cmd.as_deref(),
    )
}

/// Gather runtime inputs from the `--topic`/`--project` shorthands and the
/// repeated `--input KEY VALUE` pairs. Explicit pairs win over shorthands.
fn collect_inputs(args: &RunArgs) -> RuntimeInputs {
    let mut inputs = RuntimeInputs::new();
    if let Some(topic) = &args.topic {
        inputs.insert("topic".to_string(), topic.clone());
    }
    if let Some(project) = &args.project {
        inputs.insert("project".to_string(), project.clone());
    }
    for pair in args.inputs.chunks_exact(2) {
        inputs.insert(pair[0].clone(), pair[1].clone());
    }
    inputs
}

/// The shared run pipeline: lookup, bind, load tools, assemble, execute.
///
/// Input binding runs before the tool registry is touched, so missing
/// required inputs fail without any assembly work.
fn run_pod(
    pods_dir: &Path,
    tools_config: &Path,
    pod_key: &str,
    inputs: &RuntimeInputs,
    runner_cmd: Option<&str>,
    quiet: bool,
) -> Result<ExecutionOutcome> {
    let def = pod::get(pods_dir, pod_key)?;
    let bound = pod::bind(&def, inputs)?;

    let runner_cmd = runner_cmd.ok_or_else(|| {
        OrcaError::UserError(
            "no runner command configured.\n\
             Pass --runner-cmd with a command template, e.g.:\n  \
             --runner-cmd 'my-agent --model {model} --prompt {description}'"
                .to_string(),
        )
    })?;

    let registry = ToolRegistry::load(tools_config)?;
    let mut graph = assemble::assemble(&def, &bound, &registry)?;

    let mut process = ProcessRuntime::new(runner_cmd);
    if !quiet {
        process = process.with_reporter(Box::new(ConsoleProgress::new()));
    }

    Ok(runtime::execute(&mut graph, &process))
}

fn write_outcome(w: &mut impl Write, outcome: &ExecutionOutcome) -> std::io::Result<()> {
    writeln!(w)?;
    if outcome.success {
        writeln!(w, "Mission results:")?;
        writeln!(w, "{}", "=".repeat(60))?;
        writeln!(w, "{}", outcome.result)?;
    } else {
        writeln!(w, "Pod run failed.")?;
    }

    writeln!(w)?;
    writeln!(w, "Task trace:")?;
    for entry in &outcome.trace {
        writeln!(w, "  {}: {}", entry.task_key, entry.status)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes;
    use crate::pod::definition::fixtures;
    use tempfile::TempDir;

    fn workspace() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let pods_dir = dir.path().join("pods");
        std::fs::create_dir(&pods_dir).unwrap();
        std::fs::write(
            pods_dir.join("content_creation.yaml"),
            fixtures::content_creation_yaml(),
        )
        .unwrap();
        let tools_config = dir.path().join("tools.yaml");
        std::fs::write(
            &tools_config,
            "tools:\n  code_analysis:\n    module: builtin\n    class: CodeAnalysisTool\n",
        )
        .unwrap();
        (dir, pods_dir, tools_config)
    }

    fn run_args(pod: &str) -> RunArgs {
        RunArgs {
            pod: pod.to_string(),
            topic: None,
            project: None,
            inputs: Vec::new(),
            runner_cmd: None,
            json: false,
        }
    }

    #[test]
    fn collect_inputs_merges_shorthands_and_pairs() {
        let mut args = run_args("content_creation");
        args.topic = Some("AI in Healthcare".to_string());
        args.inputs = vec![
            "industry".to_string(),
            "Software".to_string(),
            "topic".to_string(),
            "Override".to_string(),
        ];

        let inputs = collect_inputs(&args);
        assert_eq!(inputs.get("industry").map(String::as_str), Some("Software"));
        // Explicit --input wins over the shorthand.
        assert_eq!(inputs.get("topic").map(String::as_str), Some("Override"));
    }

    #[test]
    fn run_pod_succeeds_end_to_end_with_echo_runner() {
        let (_dir, pods_dir, tools_config) = workspace();
        let mut inputs = RuntimeInputs::new();
        inputs.insert("topic".to_string(), "ocean conservation".to_string());

        let outcome = run_pod(
            &pods_dir,
            &tools_config,
            "content_creation",
            &inputs,
            Some("echo {description}"),
            true,
        )
        .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.result, "Write about ocean conservation");
        assert_eq!(outcome.trace.len(), 1);
        assert_eq!(outcome.trace[0].task_key, "write_post");
        assert_eq!(outcome.trace[0].status.to_string(), "completed");
    }

    #[test]
    fn run_pod_without_required_input_fails_before_assembly() {
        let (_dir, pods_dir, _) = workspace();
        // Tools config path is bogus on purpose: binding must fail before
        // the registry is ever loaded.
        let err = run_pod(
            &pods_dir,
            Path::new("/nonexistent/tools.yaml"),
            "content_creation",
            &RuntimeInputs::new(),
            Some("echo {description}"),
            true,
        )
        .unwrap_err();

        match err {
            OrcaError::MissingInputs(names) => assert_eq!(names, vec!["topic".to_string()]),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn run_pod_unknown_key_is_pod_not_found() {
        let (_dir, pods_dir, tools_config) = workspace();
        let err = run_pod(
            &pods_dir,
            &tools_config,
            "ghost_pod",
            &RuntimeInputs::new(),
            Some("echo hi"),
            true,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::POD_NOT_FOUND);
    }

    #[test]
    fn run_pod_without_runner_cmd_is_a_user_error() {
        let (_dir, pods_dir, tools_config) = workspace();
        let mut inputs = RuntimeInputs::new();
        inputs.insert("topic".to_string(), "tides".to_string());

        let err = run_pod(&pods_dir, &tools_config, "content_creation", &inputs, None, true)
            .unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        assert!(err.to_string().contains("--runner-cmd"));
    }

    #[test]
    fn run_pod_with_failing_runner_reports_failed_trace() {
        let (_dir, pods_dir, tools_config) = workspace();
        let mut inputs = RuntimeInputs::new();
        inputs.insert("topic".to_string(), "tides".to_string());

        let outcome = run_pod(
            &pods_dir,
            &tools_config,
            "content_creation",
            &inputs,
            Some("false"),
            true,
        )
        .unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.trace[0].status.to_string(), "failed");
    }

    #[test]
    fn cmd_run_maps_runtime_failure_to_execution_error() {
        let (_dir, pods_dir, tools_config) = workspace();
        let mut args = run_args("content_creation");
        args.topic = Some("tides".to_string());
        args.runner_cmd = Some("false".to_string());
        args.json = true;

        let err = cmd_run(&pods_dir, &tools_config, args).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::EXECUTION_FAILURE);
    }

    #[test]
    fn cmd_list_tolerates_a_broken_pod_file() {
        let (_dir, pods_dir, _) = workspace();
        std::fs::write(pods_dir.join("broken.yaml"), "tasks: [nope").unwrap();
        // One good pod, one broken file; listing must still succeed.
        cmd_list(&pods_dir).unwrap();
    }

    #[test]
    fn cmd_info_unknown_pod_is_pod_not_found() {
        let (_dir, pods_dir, _) = workspace();
        let args = InfoArgs {
            pod: "ghost".to_string(),
        };
        let err = cmd_info(&pods_dir, &args).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::POD_NOT_FOUND);
    }
}
