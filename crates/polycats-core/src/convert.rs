//! Conversion orchestrator: unpack → parse → copy → build → write.

use crate::config::ConvertConfig;
use crate::copier::Copier;
use crate::error::{ConvertError, Result};
use crate::runner::{hash_bytes, ConversionReport, PipelineRunner};
use crate::unpack;
use cats::{builder, writer, CatsBuilder, CatsDocument, SampleMode};
use polygon::derive;
use polygon::{
    Checker, Diagnostics, Executable, Interactor, Problem, Resource, Solution, Statement,
    StatementProperties, TestSet,
};
use std::collections::HashSet;
use std::path::Path;

/// Statements and problem description of a parsed package
struct Parsed {
    problem: Problem,
    statements: Vec<Statement>,
}

/// Asset records after relocation into the output directory
struct Relocated {
    checker: Option<Checker>,
    interactor: Option<Interactor>,
    solutions: Vec<Solution>,
    generators: Vec<Executable>,
    resources: Vec<Resource>,
    modules: Vec<Resource>,
    sample_count: usize,
}

/// Convert the package at `input` into a CATS package under `output`
pub fn convert(input: &Path, output: &Path, config: &ConvertConfig) -> Result<ConversionReport> {
    let mut runner = PipelineRunner::new();
    let mut diagnostics = Diagnostics::new();

    let package = runner.stage("unpack", || unpack::open(input))?;
    let parsed = runner.stage("parse", || parse(package.root(), config, &mut diagnostics))?;
    let relocated = runner.stage("copy", || copy(package.root(), output, &parsed, config, &mut diagnostics))?;
    let document = runner.stage("build", || build(&parsed, &relocated, config, &mut diagnostics))?;

    let destination = output.join(&config.output_name);
    let bytes = runner.stage("write", || Ok(writer::write_to(&document, &destination)?))?;

    let report = ConversionReport {
        pipeline_id: runner.pipeline_id(),
        stages: runner.into_stages(),
        artifact_hash: hash_bytes(&bytes),
        output: destination,
        warnings: diagnostics.into_warnings(),
    };
    tracing::info!(
        output = %report.output.display(),
        warnings = report.warnings.len(),
        hash = %report.artifact_hash,
        "conversion finished"
    );
    Ok(report)
}

fn parse(root: &Path, config: &ConvertConfig, diagnostics: &mut Diagnostics) -> Result<Parsed> {
    let problem = polygon::read_problem(&root.join(unpack::PROBLEM_FILE), diagnostics)?;
    check_test_sets(&problem, config, diagnostics)?;

    let statements = problem
        .statements
        .iter()
        .map(|document| Statement::load(root, document))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    tracing::debug!(statements = statements.len(), "loaded statement properties");

    Ok(Parsed { problem, statements })
}

/// Exactly one testset, or the first of several when configured so
fn check_test_sets(problem: &Problem, config: &ConvertConfig, diagnostics: &mut Diagnostics) -> Result<()> {
    match problem.judging.test_sets.len() {
        1 => Ok(()),
        count if count > 1 && config.allow_extra_testsets => {
            diagnostics.warn(format!("package declares {} testsets, only the first is converted", count));
            Ok(())
        }
        count => Err(ConvertError::WrongTestsetCount(count)),
    }
}

fn test_set(problem: &Problem) -> Result<&TestSet> {
    problem
        .judging
        .test_sets
        .first()
        .ok_or(ConvertError::WrongTestsetCount(0))
}

fn copy(
    root: &Path,
    output: &Path,
    parsed: &Parsed,
    config: &ConvertConfig,
    diagnostics: &mut Diagnostics,
) -> Result<Relocated> {
    let problem = &parsed.problem;
    let test_set = test_set(problem)?;
    let mut copier = Copier::new(root, output, &config.folders)?;

    let checker = problem.assets.checker.as_ref().map(|c| copier.checker(c)).transpose()?;
    let interactor = problem.assets.interactor.as_ref().map(|i| copier.interactor(i)).transpose()?;
    let solutions = copier.solutions(&problem.assets.solutions)?;

    let generators = derive::generators(&problem.files.executables, &test_set.tests, diagnostics);
    let generators = copier.generators(&generators)?;

    let tests = copier.tests()?;
    tracing::debug!(files = tests, "copied tests");

    let sample_count = match (config.samples, parsed.statements.first()) {
        (SampleMode::Files, Some(statement)) => copier.samples(statement)?,
        _ => 0,
    };

    let resources = copier.resources(&statement_resources(root, &parsed.statements)?)?;
    let modules = copier.resources(&builder::modules(&problem.files.resources, &config.service_files))?;

    Ok(Relocated { checker, interactor, solutions, generators, resources, modules, sample_count })
}

/// Resources of every statement language, first file name wins
fn statement_resources(root: &Path, statements: &[Statement]) -> Result<Vec<Resource>> {
    let mut seen = HashSet::new();
    let mut resources = Vec::new();
    for statement in statements {
        for resource in statement.resources(root)? {
            if seen.insert(resource.source.file_name()) {
                resources.push(resource);
            }
        }
    }
    Ok(resources)
}

fn build(
    parsed: &Parsed,
    relocated: &Relocated,
    config: &ConvertConfig,
    diagnostics: &mut Diagnostics,
) -> Result<CatsDocument> {
    let problem = &parsed.problem;
    let test_set = test_set(problem)?;
    let default_properties = StatementProperties::default();
    let primary = parsed
        .statements
        .first()
        .map_or(&default_properties, |statement| &statement.properties);

    let mut builder = CatsBuilder::new(&config.cats_version);
    builder.set_title(problem, test_set, primary, &config.save_prefix);
    builder.add_resources(&relocated.resources)?;

    for statement in &parsed.statements {
        let lang = derive::language_code(&statement.language);
        builder.add_statement(&statement.properties, &lang, diagnostics);
        if config.samples == SampleMode::Inline {
            builder.add_samples_inline(&statement.properties, &lang);
        }
    }
    if config.samples == SampleMode::Files {
        builder.add_samples_files(relocated.sample_count, &config.folders.samples);
    }

    if config.import_testlib {
        builder.import_testlib()?;
    }
    if let Some(checker) = &relocated.checker {
        builder.set_checker(checker)?;
    }
    builder.add_solutions(&relocated.solutions)?;
    if let Some(interactor) = &relocated.interactor {
        builder.use_interactor(interactor)?;
    }
    builder.add_modules(&relocated.modules)?;
    for generator in &relocated.generators {
        builder.add_generator(generator)?;
    }

    builder.add_tests(test_set, &config.folders.tests)?;
    builder.add_all_test_out(test_set.tests.len(), diagnostics);
    let ranges = derive::group_ranges(test_set)?;
    builder.add_groups(&test_set.groups, &ranges, diagnostics);

    builder.add_label(crate::VERSION, problem);
    Ok(builder.finish()?)
}
