//! Target model builder.
//!
//! [`CatsBuilder`] turns relocated Polygon records into typed `<Problem>`
//! children. Calls may come in any order; [`CatsBuilder::finish`] puts the
//! children into schema order. Every declared name is checked for
//! uniqueness as it is added.

use crate::error::CatsError;
use crate::model::{
    CatsDocument, FileDecl, Import, ProblemAttrs, ProblemChild, Sample, SampleBody, SectionKind,
    TestInput, TestNode, TextBlock, TextSection, Testset,
};
use crate::text::{self, HeadingKind};
use indexmap::IndexMap;
use polygon::derive;
use polygon::{
    Checker, Diagnostics, Executable, Group, Interactor, Problem, Resource, Solution, SourceAsset,
    StatementProperties, Test, TestMethod, TestSet,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const GENERATOR_TESTLIB: &str = "std.generator.testlib.h.last";
pub const CHECKER_TESTLIB: &str = "std.testlib.h.last";
pub const CHECKER_NAME: &str = "check";
pub const INTERACTOR_NAME: &str = "interactor";
pub const MAIN_SOLUTION: &str = "main";

/// How samples are written into the document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleMode {
    /// One `<Sample>` per example with literal text
    Inline,
    /// One ranged `<Sample>` pointing at copied sample files
    #[default]
    Files,
}

#[derive(Debug)]
pub struct CatsBuilder {
    version: String,
    problem: ProblemAttrs,
    children: Vec<ProblemChild>,
    comments: Vec<String>,
    names: HashSet<String>,
    warned_locales: HashSet<String>,
}

impl CatsBuilder {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            problem: ProblemAttrs::default(),
            children: Vec::new(),
            comments: Vec::new(),
            names: HashSet::new(),
            warned_locales: HashSet::new(),
        }
    }

    pub fn set_problem(&mut self, attrs: ProblemAttrs) {
        self.problem.merge(attrs);
    }

    /// Problem attributes derived from the package and its primary statement
    pub fn set_title(
        &mut self,
        problem: &Problem,
        test_set: &TestSet,
        properties: &StatementProperties,
        save_prefix: &str,
    ) {
        let prefix = Some(save_prefix.to_string());
        self.set_problem(ProblemAttrs {
            title: problem.title().map(|name| name.value.clone()),
            lang: Some(derive::languages(&problem.names)),
            tlimit: Some(derive::time_limit_seconds(test_set.time_limit)),
            mlimit: Some(test_set.memory_limit.to_string()),
            author: properties.author_name.clone(),
            input_file: io_file(&problem.judging.input_file, properties.input_file.as_deref()),
            output_file: io_file(&problem.judging.output_file, properties.output_file.as_deref()),
            save_input_prefix: prefix.clone(),
            save_output_prefix: prefix.clone(),
            save_answer_prefix: prefix,
            ..Default::default()
        });
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    fn declare(&mut self, name: &str) -> Result<(), CatsError> {
        if !self.names.insert(name.to_string()) {
            return Err(CatsError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn file_decl(&mut self, name: impl Into<String>, asset: &SourceAsset) -> Result<FileDecl, CatsError> {
        let name = name.into();
        self.declare(&name)?;
        let de_code = asset.compiler.map(|compiler| compiler.code());
        Ok(FileDecl::new(name, asset.posix_path(), de_code))
    }

    // ========================================================================
    // Statement
    // ========================================================================

    /// Pictures and attachments, named by file name
    pub fn add_resources(&mut self, resources: &[Resource]) -> Result<(), CatsError> {
        for resource in resources {
            let decl = self.file_decl(resource.source.file_name(), &resource.source)?;
            self.children.push(if resource.is_picture() {
                ProblemChild::Picture(decl)
            } else {
                ProblemChild::Attachment(decl)
            });
        }
        Ok(())
    }

    /// Text sections of one statement language
    pub fn add_statement(&mut self, properties: &StatementProperties, lang: &str, diagnostics: &mut Diagnostics) {
        let paragraphs = |text: &Option<String>| -> Vec<TextBlock> {
            text::paragraphs(text.as_deref())
                .into_iter()
                .map(TextBlock::Paragraph)
                .collect()
        };

        self.push_section(SectionKind::ProblemStatement, lang, paragraphs(&properties.legend));
        self.push_section(SectionKind::InputFormat, lang, paragraphs(&properties.input));

        let mut output = paragraphs(&properties.output);
        let interaction = paragraphs(&properties.interaction);
        let notes = paragraphs(&properties.notes);
        if (!interaction.is_empty() || !notes.is_empty())
            && !text::has_headings(lang)
            && self.warned_locales.insert(lang.to_string())
        {
            diagnostics.warn(format!("no headings for language <{}>, using English", lang));
        }
        for (kind, blocks) in [(HeadingKind::Interaction, interaction), (HeadingKind::Notes, notes)] {
            if blocks.is_empty() {
                continue;
            }
            output.push(TextBlock::Heading(text::heading(kind, lang).to_string()));
            output.extend(blocks);
        }
        self.push_section(SectionKind::OutputFormat, lang, output);

        self.push_section(SectionKind::Explanation, lang, paragraphs(&properties.tutorial));
    }

    fn push_section(&mut self, kind: SectionKind, lang: &str, blocks: Vec<TextBlock>) {
        if blocks.is_empty() {
            return;
        }
        self.children.push(ProblemChild::Section(TextSection {
            kind,
            lang: lang_condition(lang),
            blocks,
        }));
    }

    /// One `<Sample>` per example, text inline, limited to `lang`
    pub fn add_samples_inline(&mut self, properties: &StatementProperties, lang: &str) {
        for (index, sample) in properties.sample_tests.iter().enumerate() {
            self.children.push(ProblemChild::Sample(Sample {
                rank: (index + 1).to_string(),
                lang: lang_condition(lang),
                body: SampleBody::Inline {
                    input: sample.input.clone(),
                    output: sample.output.clone(),
                },
            }));
        }
    }

    /// One ranged `<Sample>` over `count` copied sample files in `samples_dir`
    pub fn add_samples_files(&mut self, count: usize, samples_dir: &str) {
        if count == 0 {
            return;
        }
        self.children.push(ProblemChild::Sample(Sample {
            rank: derive::cats_rank(count),
            lang: None,
            body: SampleBody::Files {
                input_src: format!("{}/example.%0n", samples_dir),
                output_src: format!("{}/example.%0n.a", samples_dir),
            },
        }));
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    pub fn add_import(&mut self, guid: &str, import_type: Option<&str>, name: Option<&str>) -> Result<(), CatsError> {
        if let Some(name) = name {
            self.declare(name)?;
        }
        self.children.push(ProblemChild::Import(Import {
            guid: guid.to_string(),
            import_type: import_type.map(str::to_string),
            name: name.map(str::to_string),
        }));
        Ok(())
    }

    /// Generator and checker testlib imports
    pub fn import_testlib(&mut self) -> Result<(), CatsError> {
        self.add_import(GENERATOR_TESTLIB, Some("generator"), None)?;
        self.add_import(CHECKER_TESTLIB, Some("checker"), None)
    }

    pub fn set_checker(&mut self, checker: &Checker) -> Result<(), CatsError> {
        let mut decl = self.file_decl(CHECKER_NAME, &checker.source)?;
        if checker.is_testlib() {
            decl = decl.with_attr("style", "testlib");
        }
        self.children.push(ProblemChild::Checker(decl));
        Ok(())
    }

    /// Solutions grouped by tag: a lone tag keeps its name, repeated tags
    /// are numbered `tag-1`, `tag-2`, ...
    pub fn add_solutions(&mut self, solutions: &[Solution]) -> Result<(), CatsError> {
        let mut by_tag: IndexMap<&str, Vec<&Solution>> = IndexMap::new();
        for solution in solutions {
            by_tag.entry(solution.tag.as_str()).or_default().push(solution);
        }

        for (tag, group) in by_tag {
            let numbered = group.len() > 1;
            for (index, solution) in group.into_iter().enumerate() {
                let name = if numbered { format!("{}-{}", tag, index + 1) } else { tag.to_string() };
                let decl = self.file_decl(name, &solution.source)?;
                self.children.push(ProblemChild::Solution(decl));
            }
        }
        Ok(())
    }

    /// `<Run method="interactive">` followed by the interactor declaration
    pub fn use_interactor(&mut self, interactor: &Interactor) -> Result<(), CatsError> {
        let decl = self.file_decl(INTERACTOR_NAME, &interactor.source)?;
        self.children.push(ProblemChild::Run { method: "interactive".to_string() });
        self.children.push(ProblemChild::Interactor(decl));
        Ok(())
    }

    pub fn add_modules(&mut self, modules: &[Resource]) -> Result<(), CatsError> {
        for module in modules {
            let decl = self.file_decl(module.source.file_name(), &module.source)?;
            self.children.push(ProblemChild::Module(decl));
        }
        Ok(())
    }

    pub fn add_generator(&mut self, generator: &Executable) -> Result<(), CatsError> {
        let decl = self.file_decl(generator.stem(), &generator.source)?;
        self.children.push(ProblemChild::Generator(decl));
        Ok(())
    }

    // ========================================================================
    // Tests
    // ========================================================================

    pub fn add_test(&mut self, rank: usize, test: &Test, tests_dir: &str) -> Result<(), CatsError> {
        let input = match test.method {
            TestMethod::Manual => TestInput::File { src: format!("{}/{:02}", tests_dir, rank) },
            TestMethod::Generated => {
                let generator = test.generator().ok_or_else(|| CatsError::InvalidTest {
                    rank,
                    reason: "generated test has no generator command".to_string(),
                })?;
                TestInput::Generated { generator: generator.to_string(), params: test.params() }
            }
        };
        self.children.push(ProblemChild::Test(TestNode {
            rank: rank.to_string(),
            points: test.points,
            input: Some(input),
            output_use: None,
        }));
        Ok(())
    }

    pub fn add_tests(&mut self, test_set: &TestSet, tests_dir: &str) -> Result<(), CatsError> {
        for (rank, test) in test_set.ranked_tests() {
            self.add_test(rank, test, tests_dir)?;
        }
        Ok(())
    }

    /// Umbrella test routing the expected output of every test to `main`
    pub fn add_all_test_out(&mut self, count: usize, diagnostics: &mut Diagnostics) {
        if count == 0 {
            return;
        }
        if !self.has_name(MAIN_SOLUTION) {
            diagnostics.warn(format!("no declaration named '{}' produces the expected output", MAIN_SOLUTION));
        }
        self.children.push(ProblemChild::Test(TestNode {
            rank: derive::cats_rank(count),
            points: None,
            input: None,
            output_use: Some(MAIN_SOLUTION.to_string()),
        }));
    }

    pub fn add_group(&mut self, group: &Group, tests: &str) {
        self.children.push(ProblemChild::Testset(Testset {
            name: group.name.clone(),
            tests: tests.to_string(),
            points: group.points,
            dependencies: group.dependencies.clone(),
        }));
    }

    /// A `<Testset>` per group with tests; empty groups are skipped
    pub fn add_groups(&mut self, groups: &[Group], ranges: &IndexMap<String, String>, diagnostics: &mut Diagnostics) {
        for group in groups {
            match ranges.get(&group.name).filter(|range| !range.is_empty()) {
                Some(range) => self.add_group(group, range),
                None => diagnostics.warn(format!("group '{}' has no tests and is skipped", group.name)),
            }
        }
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    pub fn add_comment(&mut self, comment: impl Into<String>) {
        self.comments.push(comment.into());
    }

    /// Trailing comments naming the generator and the source package
    pub fn add_label(&mut self, tool_version: &str, problem: &Problem) {
        self.add_comment(format!("This package was generated by polycats v{}", tool_version));
        if let Some(short_name) = &problem.short_name {
            let revision = problem.revision.as_deref().unwrap_or("unknown");
            self.add_comment(format!("Polygon package {} revision {}", short_name, revision));
        }
        if !problem.tags.is_empty() {
            self.add_comment(format!("Polygon tags: {}", problem.tags.join(", ")));
        }
    }

    pub fn finish(mut self) -> Result<CatsDocument, CatsError> {
        if self.problem.title.as_deref().map_or(true, str::is_empty) {
            return Err(CatsError::MissingTitle);
        }
        self.children.sort_by_key(ProblemChild::section);
        Ok(CatsDocument {
            version: self.version,
            problem: self.problem,
            children: self.children,
            comments: self.comments,
        })
    }
}

/// Package resources that are not Polygon service files
pub fn modules(resources: &[Resource], service_files: &[String]) -> Vec<Resource> {
    resources
        .iter()
        .filter(|resource| !service_files.contains(&resource.source.posix_path()))
        .cloned()
        .collect()
}

/// Judging I/O file, or the statement's stream name as `*STDIN` / `*STDOUT`
fn io_file(judging: &str, statement: Option<&str>) -> Option<String> {
    if !judging.is_empty() {
        return Some(judging.to_string());
    }
    statement
        .filter(|value| !value.is_empty())
        .map(|value| format!("*{}", value.to_uppercase()))
}

fn lang_condition(lang: &str) -> Option<String> {
    (!lang.is_empty()).then(|| lang.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use polygon::Compiler;

    fn solution(tag: &str, path: &str) -> Solution {
        Solution { tag: tag.to_string(), source: SourceAsset::new(path, Some(Compiler::GnuCpp11)) }
    }

    fn titled() -> CatsBuilder {
        let mut builder = CatsBuilder::new("1.11");
        builder.set_problem(ProblemAttrs { title: Some("A+B".to_string()), ..Default::default() });
        builder
    }

    fn tags(document: &CatsDocument) -> Vec<&'static str> {
        document.children.iter().map(|c| c.to_element().tag).collect()
    }

    #[test]
    fn test_solution_tag_grouping() {
        let mut builder = titled();
        builder
            .add_solutions(&[
                solution("main", "solutions/a.cpp"),
                solution("wrong-answer", "solutions/wa1.cpp"),
                solution("wrong-answer", "solutions/wa2.cpp"),
            ])
            .unwrap();
        let document = builder.finish().unwrap();
        let names: Vec<_> = document.children.iter().filter_map(ProblemChild::declared_name).collect();
        assert_eq!(names, vec!["main", "wrong-answer-1", "wrong-answer-2"]);
    }

    #[test]
    fn test_de_code_for_mapped_none_compiler() {
        let mut builder = titled();
        builder
            .add_solutions(&[
                Solution { tag: "main".to_string(), source: SourceAsset::new("solutions/a.d", Some(Compiler::None)) },
                Solution { tag: "slow".to_string(), source: SourceAsset::new("solutions/b.cob", None) },
            ])
            .unwrap();
        let document = builder.finish().unwrap();
        let codes: Vec<_> = document
            .children
            .iter()
            .map(|c| c.to_element().attrs.get("de_code").map(str::to_string))
            .collect();
        assert_eq!(codes, vec![Some("1".to_string()), None]);
    }

    #[test]
    fn test_duplicate_names_fail() {
        let mut builder = titled();
        builder.add_solutions(&[solution("check", "solutions/a.cpp")]).unwrap();
        let checker = Checker {
            name: None,
            checker_type: "testlib".to_string(),
            source: SourceAsset::new("check.cpp", None),
        };
        let err = builder.set_checker(&checker).unwrap_err();
        assert!(matches!(err, CatsError::DuplicateName(ref name) if name == "check"));
    }

    #[test]
    fn test_duplicate_module_and_resource() {
        let mut builder = titled();
        let resource = Resource { source: SourceAsset::new("files/data.txt", None) };
        builder.add_resources(std::slice::from_ref(&resource)).unwrap();
        assert!(builder.add_modules(&[resource]).is_err());
    }

    #[test]
    fn test_finish_orders_children() {
        let mut builder = titled();
        let mut diagnostics = Diagnostics::new();
        builder.add_all_test_out(2, &mut diagnostics);
        builder.add_generator(&Executable { source: SourceAsset::new("generators/gen.cpp", None) }).unwrap();
        builder.import_testlib().unwrap();
        builder.add_solutions(&[solution("main", "solutions/a.cpp")]).unwrap();
        builder.use_interactor(&Interactor { source: SourceAsset::new("interactor.cpp", None) }).unwrap();
        builder.add_resources(&[Resource { source: SourceAsset::new("files/pic.png", None) }]).unwrap();

        let document = builder.finish().unwrap();
        assert_eq!(
            tags(&document),
            vec!["Picture", "Import", "Import", "Solution", "Run", "Interactor", "Generator", "Test"]
        );
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_missing_title() {
        let builder = CatsBuilder::new("1.11");
        assert!(matches!(builder.finish(), Err(CatsError::MissingTitle)));
    }

    #[test]
    fn test_statement_sections_with_headings() {
        let mut builder = titled();
        let mut diagnostics = Diagnostics::new();
        let properties = StatementProperties {
            legend: Some("Legend one.\n\nLegend two.".to_string()),
            notes: Some("A note.".to_string()),
            interaction: Some("Talk.".to_string()),
            ..Default::default()
        };
        builder.add_statement(&properties, "ru", &mut diagnostics);
        let document = builder.finish().unwrap();

        assert_eq!(tags(&document), vec!["ProblemStatement", "OutputFormat"]);
        let output = document.children[1].to_element();
        assert_eq!(output.attrs.get("cats_if"), Some("lang=ru"));
        let texts: Vec<String> = output
            .children
            .iter()
            .filter_map(|node| match node {
                Node::Element(e) => Some(format!("{}:{:?}", e.tag, e.children.first())),
                _ => None,
            })
            .collect();
        assert_eq!(texts.len(), 4);
        assert!(texts[0].starts_with("h3") && texts[0].contains("Протокол взаимодействия"));
        assert!(texts[2].starts_with("h3") && texts[2].contains("Примечание"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unknown_heading_locale_warns_once() {
        let mut builder = titled();
        let mut diagnostics = Diagnostics::new();
        let properties = StatementProperties {
            notes: Some("x".to_string()),
            ..Default::default()
        };
        builder.add_statement(&properties, "uk", &mut diagnostics);
        builder.add_statement(&properties, "uk", &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_tests_and_groups() {
        let mut builder = titled();
        let mut diagnostics = Diagnostics::new();
        let tests = [Test::manual().with_points(5), Test::generated("gen 7 8")];
        for (index, test) in tests.iter().enumerate() {
            builder.add_test(index + 1, test, "tests").unwrap();
        }
        let mut ranges = IndexMap::new();
        ranges.insert("0".to_string(), "1-2".to_string());
        ranges.insert("1".to_string(), String::new());
        builder.add_groups(&[Group::new("0"), Group::new("1")], &ranges, &mut diagnostics);

        let document = builder.finish().unwrap();
        assert_eq!(tags(&document), vec!["Test", "Test", "Testset"]);
        let ProblemChild::Test(manual) = &document.children[0] else { panic!("expected a test") };
        assert_eq!(manual.input, Some(TestInput::File { src: "tests/01".to_string() }));
        assert_eq!(manual.points, Some(5));
        let ProblemChild::Test(generated) = &document.children[1] else { panic!("expected a test") };
        assert_eq!(
            generated.input,
            Some(TestInput::Generated { generator: "gen".to_string(), params: Some("7 8".to_string()) })
        );
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_generated_test_without_cmd() {
        let mut builder = titled();
        let mut test = Test::generated("x");
        test.cmd = None;
        let err = builder.add_test(4, &test, "tests").unwrap_err();
        assert!(matches!(err, CatsError::InvalidTest { rank: 4, .. }));
    }

    #[test]
    fn test_io_files() {
        assert_eq!(io_file("input.txt", Some("stdin")).as_deref(), Some("input.txt"));
        assert_eq!(io_file("", Some("stdin")).as_deref(), Some("*STDIN"));
        assert_eq!(io_file("", None), None);
    }

    #[test]
    fn test_modules_skip_service_files() {
        let resources = vec![
            Resource { source: SourceAsset::new("files/testlib.h", None) },
            Resource { source: SourceAsset::new("files/common.h", None) },
        ];
        let kept = modules(&resources, &["files/testlib.h".to_string()]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].source.file_name(), "common.h");
    }
}
