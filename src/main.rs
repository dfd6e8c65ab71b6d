//! relock - Yarn lockfile re-resolver CLI tool
//!
//! Re-resolves a project's yarn.lock after dependency updates by driving
//! the Node.js resolver helper, classifying resolver failures into typed
//! errors along the way.

use anyhow::Context;
use clap::Parser;
use relock::cli::{CliArgs, UpdateSpec};
use relock::domain::{Credential, Dependency, DependencyFile, Requirement};
use relock::helper::NodeHelper;
use relock::manifest::RequirementEntry;
use relock::output::{
    create_formatter, OutputConfig, OutputFormat, UpdateOutcome, UpdateReport, Verbosity,
};
use relock::progress::Progress;
use relock::updater::LockfileUpdater;
use relock::{lockfile, manifest};
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.verbose {
        eprintln!("relock v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Project: {}", args.path.display());
    }

    let manifest_path = args.path.join("package.json");
    let lockfile_path = args.path.join("yarn.lock");

    let manifest_content = fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    let lockfile_content = fs::read_to_string(&lockfile_path)
        .with_context(|| format!("failed to read {}", lockfile_path.display()))?;

    let manifest = DependencyFile::new("package.json", manifest_content);
    let lockfile = DependencyFile::new("yarn.lock", lockfile_content);

    let dependencies = requested_dependencies(&args, &manifest, &lockfile)?;
    let credentials: Vec<Credential> = args
        .registry_tokens
        .iter()
        .map(|token| Credential::npm_registry(token.host.clone(), Some(token.token.clone())))
        .collect();

    let config = OutputConfig::from_cli(args.json, args.verbose, args.quiet);
    let helper = NodeHelper::new(&args.helper);
    let files = vec![manifest, lockfile.clone()];
    let mut updater = LockfileUpdater::new(files, dependencies, credentials, Box::new(helper));

    let mut progress = if args.json || config.verbosity == Verbosity::Quiet {
        Progress::disabled()
    } else {
        Progress::default()
    };
    progress.spinner(&format!("resolving {}", lockfile.name));
    let result = updater.updated_lockfile_content(&lockfile);
    progress.finish_and_clear();

    let outcome = match result {
        Ok(Some(content)) if content == lockfile.content => UpdateOutcome::AlreadyCurrent,
        Ok(Some(content)) => UpdateOutcome::Updated { content },
        Ok(None) => UpdateOutcome::Skipped,
        Err(error) if error.is_classified() => UpdateOutcome::Failed {
            category: error.category().to_string(),
            message: error.to_string(),
        },
        Err(error) => return Err(error.into()),
    };

    let applied = match &outcome {
        UpdateOutcome::Updated { content } if args.write => {
            fs::write(&lockfile_path, content)
                .with_context(|| format!("failed to write {}", lockfile_path.display()))?;
            true
        }
        _ => false,
    };

    let report = UpdateReport {
        lockfile: lockfile.name.clone(),
        requested: args.target_labels(),
        outcome,
        applied,
    };

    let formatter = create_formatter(config.clone());
    match config.format {
        OutputFormat::Json => {
            let mut stdout = io::stdout().lock();
            formatter.format(&report, &mut stdout)?;
            stdout.flush()?;
        }
        OutputFormat::Text => {
            if let UpdateOutcome::Updated { content } = &report.outcome {
                if !report.applied {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(content.as_bytes())?;
                    stdout.flush()?;
                }
            }
            let mut stderr = io::stderr().lock();
            formatter.format(&report, &mut stderr)?;
        }
    }

    if matches!(report.outcome, UpdateOutcome::Failed { .. }) {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

/// Build the dependency records for the requested targets
fn requested_dependencies(
    args: &CliArgs,
    manifest: &DependencyFile,
    lockfile: &DependencyFile,
) -> anyhow::Result<Vec<Dependency>> {
    let entries = manifest::requirement_entries(&manifest.content);
    let locked = lockfile::parse(&lockfile.content);

    let mut dependencies = Vec::new();
    for spec in &args.updates {
        dependencies.push(top_level_dependency(spec, &entries, &locked)?);
    }
    for name in &args.subdependencies {
        dependencies.push(Dependency::transitive(name.clone()));
    }
    Ok(dependencies)
}

/// Build a top-level dependency record from an update target, reading the
/// declared constraint from the manifest and the locked version from the
/// lockfile
fn top_level_dependency(
    spec: &UpdateSpec,
    entries: &[RequirementEntry],
    locked: &[lockfile::LockfileEntry],
) -> anyhow::Result<Dependency> {
    let declared: Vec<&RequirementEntry> =
        entries.iter().filter(|e| e.name == spec.name).collect();
    if declared.is_empty() {
        anyhow::bail!("{} is not declared in package.json", spec.name);
    }

    let mut dependency = Dependency::top_level(spec.name.clone(), spec.version.clone());

    if let Some(version) = locked
        .iter()
        .find(|e| e.name == spec.name)
        .and_then(|e| e.version.clone())
    {
        dependency = dependency.with_previous_version(version);
    }

    for entry in declared {
        let updated = bumped_requirement(&entry.requirement, &spec.version);
        dependency = dependency
            .with_requirement(Requirement::new(
                "package.json",
                Some(updated),
                vec![entry.section.to_string()],
            ))
            .with_previous_requirement(Requirement::new(
                "package.json",
                Some(entry.requirement.clone()),
                vec![entry.section.to_string()],
            ));
    }

    Ok(dependency)
}

/// Derive the post-update constraint from the declared one, preserving its
/// range operator. Compound and wildcard constraints are kept as declared
/// and only the lockfile moves.
fn bumped_requirement(declared: &str, version: &str) -> String {
    let declared = declared.trim();

    match declared.chars().next() {
        Some('^') => format!("^{}", version),
        Some('~') => format!("~{}", version),
        Some(c) if c.is_ascii_digit() && exact_pin(declared) => version.to_string(),
        _ => declared.to_string(),
    }
}

/// An exact pin has no range syntax in it
fn exact_pin(requirement: &str) -> bool {
    !requirement.contains(['x', 'X', '*', ' ', '<', '>', '|'])
}
