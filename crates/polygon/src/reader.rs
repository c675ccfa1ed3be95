//! Reader for Polygon `problem.xml`.
//!
//! The XML tree is parsed with `roxmltree` and walked node by node into the
//! typed [`Problem`] model. Shape errors are fatal; missing optional
//! sections are reported through [`Diagnostics`].

use crate::compiler;
use crate::diagnostics::Diagnostics;
use crate::error::PolygonError;
use crate::model::*;
use roxmltree::Node;
use std::path::{Path, PathBuf};

const TEX_TYPE: &str = "application/x-tex";

/// Read and parse `problem.xml` from disk
pub fn read_problem(path: &Path, diagnostics: &mut Diagnostics) -> Result<Problem, PolygonError> {
    if path.extension().map_or(true, |ext| ext != "xml") {
        return Err(PolygonError::NotXml(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| PolygonError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_problem(&content, path, diagnostics)
}

/// Parse `problem.xml` content; `origin` only labels errors
pub fn parse_problem(
    xml: &str,
    origin: &Path,
    diagnostics: &mut Diagnostics,
) -> Result<Problem, PolygonError> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| PolygonError::Xml {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })?;
    let root = doc.root_element();
    if root.tag_name().name() != "problem" {
        return Err(PolygonError::WrongRoot {
            expected: "problem",
            found: root.tag_name().name().to_string(),
        });
    }

    let names = match child(root, "names") {
        Some(node) => parse_names(node)?,
        None => Vec::new(),
    };

    let statements = match child(root, "statements") {
        Some(node) => parse_tex_documents(node, "statement")?,
        None => {
            diagnostics.warn("package has no <statements> section");
            Vec::new()
        }
    };

    let tutorials = match child(root, "tutorials") {
        Some(node) => parse_tex_documents(node, "tutorial")?,
        None => {
            diagnostics.warn("package has no <tutorials> section");
            Vec::new()
        }
    };

    let judging = child(root, "judging")
        .ok_or_else(|| PolygonError::MissingNode("judging".to_string()))
        .and_then(|node| parse_judging(node, diagnostics))?;

    let files = match child(root, "files") {
        Some(node) => parse_files(node, diagnostics)?,
        None => Files::default(),
    };

    let assets = match child(root, "assets") {
        Some(node) => parse_assets(node, diagnostics)?,
        None => Assets::default(),
    };

    let tags = match child(root, "tags") {
        Some(node) => elements(node, "tag")
            .map(|tag| required_attr(tag, "value"))
            .collect::<Result<Vec<_>, _>>()?,
        None => {
            diagnostics.warn("package has no <tags> section");
            Vec::new()
        }
    };

    tracing::debug!(
        names = names.len(),
        statements = statements.len(),
        test_sets = judging.test_sets.len(),
        solutions = assets.solutions.len(),
        "parsed problem.xml"
    );

    Ok(Problem {
        short_name: attr(root, "short-name"),
        revision: attr(root, "revision"),
        names,
        statements,
        tutorials,
        judging,
        files,
        assets,
        tags,
    })
}

// ============================================================================
// Sections
// ============================================================================

fn parse_names(node: Node<'_, '_>) -> Result<Vec<ProblemName>, PolygonError> {
    elements(node, "name")
        .map(|name| {
            Ok(ProblemName {
                language: required_attr(name, "language")?,
                value: required_attr(name, "value")?,
            })
        })
        .collect()
}

fn parse_tex_documents(node: Node<'_, '_>, tag: &str) -> Result<Vec<TexDocument>, PolygonError> {
    elements(node, tag)
        .filter(|el| el.attribute("type") == Some(TEX_TYPE))
        .map(|el| {
            Ok(TexDocument {
                language: required_attr(el, "language")?,
                path: PathBuf::from(required_attr(el, "path")?),
                charset: attr(el, "charset"),
                mathjax: attr(el, "mathjax"),
            })
        })
        .collect()
}

fn parse_judging(node: Node<'_, '_>, diagnostics: &mut Diagnostics) -> Result<Judging, PolygonError> {
    let test_sets = elements(node, "testset")
        .map(|el| parse_test_set(el, diagnostics))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Judging {
        cpu_name: attr(node, "cpu-name"),
        cpu_speed: parse_opt(node, "cpu-speed")?,
        input_file: attr(node, "input-file").unwrap_or_default(),
        output_file: attr(node, "output-file").unwrap_or_default(),
        run_count: parse_opt(node, "run-count")?,
        test_sets,
    })
}

fn parse_test_set(node: Node<'_, '_>, diagnostics: &mut Diagnostics) -> Result<TestSet, PolygonError> {
    let name = attr(node, "name").unwrap_or_else(|| "tests".to_string());

    let time_limit = required_text(node, "time-limit")?;
    let time_limit = time_limit.parse::<u64>().map_err(|_| PolygonError::InvalidValue {
        field: "time-limit".to_string(),
        value: time_limit.clone(),
    })?;
    let memory_limit = required_text(node, "memory-limit")?.parse::<MemoryLimit>()?;

    let tests = match child(node, "tests") {
        Some(tests) => elements(tests, "test")
            .enumerate()
            .map(|(i, test)| parse_test(test, i + 1))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let test_count = match text(node, "test-count") {
        Some(count) => count.parse::<usize>().map_err(|_| PolygonError::InvalidValue {
            field: "test-count".to_string(),
            value: count.clone(),
        })?,
        None => tests.len(),
    };
    if test_count != tests.len() {
        diagnostics.warn(format!(
            "testset '{}' declares {} tests but lists {}",
            name,
            test_count,
            tests.len()
        ));
    }

    let groups = match child(node, "groups") {
        Some(groups) => parse_groups(groups, diagnostics)?,
        None => Vec::new(),
    };

    Ok(TestSet {
        name,
        time_limit,
        memory_limit,
        test_count,
        input_path_pattern: text(node, "input-path-pattern").unwrap_or_else(|| "tests/%02d".to_string()),
        output_path_pattern: text(node, "output-path-pattern"),
        answer_path_pattern: text(node, "answer-path-pattern")
            .unwrap_or_else(|| "tests/%02d.a".to_string()),
        tests,
        groups,
    })
}

fn parse_test(node: Node<'_, '_>, rank: usize) -> Result<Test, PolygonError> {
    let method = required_attr(node, "method")?.parse::<TestMethod>()?;
    let cmd = attr(node, "cmd").filter(|cmd| !cmd.trim().is_empty());
    if method == TestMethod::Generated && cmd.is_none() {
        return Err(PolygonError::GeneratedWithoutCmd { rank });
    }

    Ok(Test {
        method,
        sample: node.attribute("sample") == Some("true"),
        cmd,
        points: attr(node, "points").map(|p| parse_points("test points", &p)).transpose()?,
        group: attr(node, "group"),
        description: attr(node, "description"),
        from_file: attr(node, "from-file"),
    })
}

fn parse_groups(node: Node<'_, '_>, diagnostics: &mut Diagnostics) -> Result<Vec<Group>, PolygonError> {
    let mut groups: Vec<Group> = Vec::new();
    for el in elements(node, "group") {
        let name = required_attr(el, "name")?;
        if groups.iter().any(|g| g.name == name) {
            return Err(PolygonError::DuplicateGroup(name));
        }
        let dependencies = match child(el, "dependencies") {
            Some(deps) => elements(deps, "dependency")
                .map(|dep| required_attr(dep, "group"))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        groups.push(Group {
            feedback_policy: attr(el, "feedback-policy").unwrap_or_default(),
            points_policy: attr(el, "points-policy").unwrap_or_default(),
            points: attr(el, "points").map(|p| parse_points("group points", &p)).transpose()?,
            dependencies,
            name,
        });
    }

    for group in &groups {
        for dependency in &group.dependencies {
            if dependency == &group.name {
                diagnostics.warn(format!("group '{}' depends on itself", group.name));
            } else if !groups.iter().any(|g| &g.name == dependency) {
                return Err(PolygonError::UnknownDependency {
                    group: group.name.clone(),
                    dependency: dependency.clone(),
                });
            }
        }
    }

    Ok(groups)
}

fn parse_files(node: Node<'_, '_>, diagnostics: &mut Diagnostics) -> Result<Files, PolygonError> {
    let resources = match child(node, "resources") {
        Some(res) => elements(res, "file")
            .map(|file| parse_source(file, diagnostics).map(|source| Resource { source }))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let executables = match child(node, "executables") {
        Some(execs) => elements(execs, "executable")
            .map(|exec| source_of(exec, diagnostics).map(|source| Executable { source }))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(Files { resources, executables })
}

fn parse_assets(node: Node<'_, '_>, diagnostics: &mut Diagnostics) -> Result<Assets, PolygonError> {
    let checker = match child(node, "checker") {
        Some(el) => Some(Checker {
            name: attr(el, "name"),
            checker_type: attr(el, "type").unwrap_or_default(),
            source: source_of(el, diagnostics)?,
        }),
        None => None,
    };

    let interactor = match child(node, "interactor") {
        Some(el) => Some(Interactor { source: source_of(el, diagnostics)? }),
        None => None,
    };

    let validators = match child(node, "validators") {
        Some(vals) => elements(vals, "validator")
            .map(|val| source_of(val, diagnostics).map(|source| Validator { source }))
            .collect::<Result<Vec<_>, _>>()?,
        None => {
            diagnostics.warn("package has no <validators> section");
            Vec::new()
        }
    };

    let solutions = match child(node, "solutions") {
        Some(sols) => elements(sols, "solution")
            .map(|sol| {
                Ok(Solution {
                    tag: required_attr(sol, "tag")?,
                    source: source_of(sol, diagnostics)?,
                })
            })
            .collect::<Result<Vec<_>, PolygonError>>()?,
        None => Vec::new(),
    };

    Ok(Assets { checker, interactor, validators, solutions })
}

/// The `<source>` child of an asset node
fn source_of(node: Node<'_, '_>, diagnostics: &mut Diagnostics) -> Result<SourceAsset, PolygonError> {
    let source = child(node, "source")
        .ok_or_else(|| PolygonError::MissingNode(format!("{}/source", node.tag_name().name())))?;
    parse_source(source, diagnostics)
}

fn parse_source(node: Node<'_, '_>, diagnostics: &mut Diagnostics) -> Result<SourceAsset, PolygonError> {
    let path = required_attr(node, "path")?;
    let compiler = node
        .attribute("type")
        .and_then(|identifier| compiler::try_resolve(identifier, diagnostics));
    Ok(SourceAsset::new(path, compiler))
}

// ============================================================================
// Node helpers
// ============================================================================

fn elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == tag)
}

fn child<'a, 'input: 'a>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == tag)
}

fn attr(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name).map(str::to_string)
}

fn required_attr(node: Node<'_, '_>, name: &str) -> Result<String, PolygonError> {
    attr(node, name).ok_or_else(|| PolygonError::MissingAttribute {
        tag: node.tag_name().name().to_string(),
        attribute: name.to_string(),
    })
}

fn text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child(node, tag)
        .and_then(|el| el.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn required_text(node: Node<'_, '_>, tag: &str) -> Result<String, PolygonError> {
    text(node, tag).ok_or_else(|| PolygonError::MissingNode(tag.to_string()))
}

fn parse_opt<T: std::str::FromStr>(node: Node<'_, '_>, name: &str) -> Result<Option<T>, PolygonError> {
    match node.attribute(name) {
        Some(value) if !value.is_empty() => value.parse::<T>().map(Some).map_err(|_| {
            PolygonError::InvalidValue { field: name.to_string(), value: value.to_string() }
        }),
        _ => Ok(None),
    }
}

/// Points are integers, though Polygon sometimes writes them as `10.0`
fn parse_points(field: &str, value: &str) -> Result<i64, PolygonError> {
    if let Ok(points) = value.parse::<i64>() {
        return Ok(points);
    }
    match value.parse::<f64>() {
        Ok(points) if points.fract() == 0.0 => Ok(points as i64),
        _ => Err(PolygonError::InvalidValue { field: field.to_string(), value: value.to_string() }),
    }
}
