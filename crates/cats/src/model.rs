//! Typed CATS target model.
//!
//! One record per node kind; each knows how to lower itself into the
//! generic [`Element`] tree that the writer renders.

use crate::node::{Attrs, Element, Node};

/// Attributes of the `<Problem>` node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemAttrs {
    pub title: Option<String>,
    pub lang: Option<String>,
    pub tlimit: Option<String>,
    pub mlimit: Option<String>,
    pub wlimit: Option<String>,
    pub author: Option<String>,
    pub input_file: Option<String>,
    pub output_file: Option<String>,
    pub difficulty: Option<u32>,
    pub std_checker: Option<String>,
    pub max_points: Option<u32>,
    pub save_input_prefix: Option<String>,
    pub save_output_prefix: Option<String>,
    pub save_answer_prefix: Option<String>,
}

impl ProblemAttrs {
    /// Overwrite fields that are set in `other`, keep the rest
    pub fn merge(&mut self, other: ProblemAttrs) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }
        take(&mut self.title, other.title);
        take(&mut self.lang, other.lang);
        take(&mut self.tlimit, other.tlimit);
        take(&mut self.mlimit, other.mlimit);
        take(&mut self.wlimit, other.wlimit);
        take(&mut self.author, other.author);
        take(&mut self.input_file, other.input_file);
        take(&mut self.output_file, other.output_file);
        take(&mut self.difficulty, other.difficulty);
        take(&mut self.std_checker, other.std_checker);
        take(&mut self.max_points, other.max_points);
        take(&mut self.save_input_prefix, other.save_input_prefix);
        take(&mut self.save_output_prefix, other.save_output_prefix);
        take(&mut self.save_answer_prefix, other.save_answer_prefix);
    }

    pub fn to_attrs(&self) -> Attrs {
        Attrs::new()
            .with_opt("title", self.title.as_ref())
            .with_opt("lang", self.lang.as_ref())
            .with_opt("tlimit", self.tlimit.as_ref())
            .with_opt("mlimit", self.mlimit.as_ref())
            .with_opt("wlimit", self.wlimit.as_ref())
            .with_opt("author", self.author.as_ref())
            .with_opt("inputFile", self.input_file.as_ref())
            .with_opt("outputFile", self.output_file.as_ref())
            .with_opt("difficulty", self.difficulty)
            .with_opt("stdChecker", self.std_checker.as_ref())
            .with_opt("maxPoints", self.max_points)
            .with_opt("saveInputPrefix", self.save_input_prefix.as_ref())
            .with_opt("saveOutputPrefix", self.save_output_prefix.as_ref())
            .with_opt("saveAnswerPrefix", self.save_answer_prefix.as_ref())
    }
}

/// A named source file declaration (checker, solution, generator, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDecl {
    pub name: String,
    pub src: String,
    pub de_code: Option<u32>,
    pub extra: Attrs,
}

impl FileDecl {
    pub fn new(name: impl Into<String>, src: impl Into<String>, de_code: Option<u32>) -> Self {
        Self { name: name.into(), src: src.into(), de_code, extra: Attrs::new() }
    }

    pub fn with_attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.extra.set(key, value);
        self
    }

    fn element(&self, tag: &'static str) -> Element {
        let mut attrs = Attrs::new()
            .with("name", self.name.as_str())
            .with("src", self.src.as_str())
            .with_opt("de_code", self.de_code);
        attrs.merge(&self.extra);
        Element::new(tag, attrs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    ProblemStatement,
    InputFormat,
    OutputFormat,
    Explanation,
}

impl SectionKind {
    pub fn tag(self) -> &'static str {
        match self {
            SectionKind::ProblemStatement => "ProblemStatement",
            SectionKind::InputFormat => "InputFormat",
            SectionKind::OutputFormat => "OutputFormat",
            SectionKind::Explanation => "Explanation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextBlock {
    Paragraph(String),
    Heading(String),
}

/// Statement text for one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSection {
    pub kind: SectionKind,
    pub lang: Option<String>,
    pub blocks: Vec<TextBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleBody {
    Inline { input: String, output: String },
    Files { input_src: String, output_src: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub rank: String,
    pub lang: Option<String>,
    pub body: SampleBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub guid: String,
    pub import_type: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestInput {
    File { src: String },
    Generated { generator: String, params: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestNode {
    pub rank: String,
    pub points: Option<i64>,
    pub input: Option<TestInput>,
    /// Name of the solution producing expected output
    pub output_use: Option<String>,
}

/// A CATS `<Testset>`: a named, compacted rank range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Testset {
    pub name: String,
    pub tests: String,
    pub points: Option<i64>,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemChild {
    Picture(FileDecl),
    Attachment(FileDecl),
    Section(TextSection),
    Sample(Sample),
    Import(Import),
    Checker(FileDecl),
    Solution(FileDecl),
    Run { method: String },
    Interactor(FileDecl),
    Module(FileDecl),
    Generator(FileDecl),
    Test(TestNode),
    Testset(Testset),
}

impl ProblemChild {
    /// Position of this node kind among the children of `<Problem>`
    pub fn section(&self) -> u8 {
        match self {
            ProblemChild::Picture(_) | ProblemChild::Attachment(_) => 0,
            ProblemChild::Section(_) => 1,
            ProblemChild::Sample(_) => 2,
            ProblemChild::Import(_) => 3,
            ProblemChild::Checker(_) => 4,
            ProblemChild::Solution(_) => 5,
            ProblemChild::Run { .. } | ProblemChild::Interactor(_) => 6,
            ProblemChild::Module(_) => 7,
            ProblemChild::Generator(_) => 8,
            ProblemChild::Test(_) => 9,
            ProblemChild::Testset(_) => 10,
        }
    }

    pub fn to_element(&self) -> Element {
        match self {
            ProblemChild::Picture(decl) => decl.element("Picture"),
            ProblemChild::Attachment(decl) => decl.element("Attachment"),
            ProblemChild::Checker(decl) => decl.element("Checker"),
            ProblemChild::Solution(decl) => decl.element("Solution"),
            ProblemChild::Interactor(decl) => decl.element("Interactor"),
            ProblemChild::Module(decl) => decl.element("Module"),
            ProblemChild::Generator(decl) => decl.element("Generator"),
            ProblemChild::Section(section) => {
                let attrs = Attrs::new().with_opt("cats_if", section.lang.as_ref().map(|l| format!("lang={}", l)));
                let mut element = Element::new(section.kind.tag(), attrs);
                for block in &section.blocks {
                    let child = match block {
                        TextBlock::Paragraph(text) => Element::text("p", Attrs::new(), text),
                        TextBlock::Heading(text) => Element::text("h3", Attrs::new(), text),
                    };
                    element = element.child(child);
                }
                element
            }
            ProblemChild::Sample(sample) => {
                let attrs = Attrs::new()
                    .with("rank", sample.rank.as_str())
                    .with_opt("cats_if", sample.lang.as_ref().map(|l| format!("lang={}", l)));
                let element = Element::new("Sample", attrs);
                match &sample.body {
                    SampleBody::Inline { input, output } => element
                        .child(Element::text("SampleIn", Attrs::new(), input))
                        .child(Element::text("SampleOut", Attrs::new(), output)),
                    SampleBody::Files { input_src, output_src } => element
                        .child(Element::new("SampleIn", Attrs::new().with("src", input_src.as_str())))
                        .child(Element::new("SampleOut", Attrs::new().with("src", output_src.as_str()))),
                }
            }
            ProblemChild::Import(import) => Element::new(
                "Import",
                Attrs::new()
                    .with("guid", import.guid.as_str())
                    .with_opt("type", import.import_type.as_ref())
                    .with_opt("name", import.name.as_ref()),
            ),
            ProblemChild::Run { method } => {
                Element::new("Run", Attrs::new().with("method", method.as_str()))
            }
            ProblemChild::Test(test) => {
                let attrs = Attrs::new()
                    .with("rank", test.rank.as_str())
                    .with_opt("points", test.points);
                let mut element = Element::new("Test", attrs);
                match &test.input {
                    Some(TestInput::File { src }) => {
                        element = element.child(Element::new("In", Attrs::new().with("src", src.as_str())));
                    }
                    Some(TestInput::Generated { generator, params }) => {
                        let attrs = Attrs::new()
                            .with("use", generator.as_str())
                            .with_opt("param", params.as_ref());
                        element = element.child(Element::new("In", attrs));
                    }
                    None => {}
                }
                if let Some(solution) = &test.output_use {
                    element = element.child(Element::new("Out", Attrs::new().with("use", solution.as_str())));
                }
                element
            }
            ProblemChild::Testset(set) => Element::new(
                "Testset",
                Attrs::new()
                    .with("name", set.name.as_str())
                    .with("tests", set.tests.as_str())
                    .with_opt("points", set.points)
                    .with("dependencies", set.dependencies.join(",")),
            ),
        }
    }

    /// Declared name, for node kinds that carry one
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            ProblemChild::Picture(decl)
            | ProblemChild::Attachment(decl)
            | ProblemChild::Checker(decl)
            | ProblemChild::Solution(decl)
            | ProblemChild::Interactor(decl)
            | ProblemChild::Module(decl)
            | ProblemChild::Generator(decl) => Some(&decl.name),
            ProblemChild::Import(import) => import.name.as_deref(),
            _ => None,
        }
    }
}

/// The whole `<CATS>` document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatsDocument {
    pub version: String,
    pub problem: ProblemAttrs,
    pub children: Vec<ProblemChild>,
    /// Trailing comments after `<Problem>`
    pub comments: Vec<String>,
}

impl CatsDocument {
    pub fn to_element(&self) -> Element {
        let mut problem = Element::new("Problem", self.problem.to_attrs());
        for child in &self.children {
            problem = problem.child(child.to_element());
        }
        let mut root = Element::new("CATS", Attrs::new().with("version", self.version.as_str()))
            .child(problem);
        root.children
            .extend(self.comments.iter().cloned().map(Node::Comment));
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_decl_omits_missing_code() {
        let element = ProblemChild::Solution(FileDecl::new("main", "solutions/a.rs", None)).to_element();
        assert_eq!(element.tag, "Solution");
        assert_eq!(element.attrs.get("de_code"), None);
        assert_eq!(element.attrs.get("src"), Some("solutions/a.rs"));
    }

    #[test]
    fn test_checker_extra_attributes() {
        let decl = FileDecl::new("check", "check.cpp", Some(102)).with_attr("style", "testlib");
        let element = ProblemChild::Checker(decl).to_element();
        let attrs: Vec<_> = element.attrs.iter().collect();
        assert_eq!(
            attrs,
            vec![("name", "check"), ("src", "check.cpp"), ("de_code", "102"), ("style", "testlib")]
        );
    }

    #[test]
    fn test_generated_test_without_params() {
        let node = TestNode {
            rank: "3".to_string(),
            points: Some(0),
            input: Some(TestInput::Generated { generator: "gen".to_string(), params: Some(String::new()) }),
            output_use: None,
        };
        let element = ProblemChild::Test(node).to_element();
        assert_eq!(element.attrs.get("points"), Some("0"));
        let Node::Element(input) = &element.children[0] else { panic!("expected <In>") };
        assert_eq!(input.attrs.get("use"), Some("gen"));
        assert_eq!(input.attrs.get("param"), None);
    }

    #[test]
    fn test_testset_dependencies_are_optional() {
        let set = Testset { name: "1".to_string(), tests: "2-4".to_string(), points: None, dependencies: vec![] };
        let element = ProblemChild::Testset(set).to_element();
        assert_eq!(element.attrs.get("dependencies"), None);

        let set = Testset {
            name: "2".to_string(),
            tests: "5-9-2".to_string(),
            points: Some(30),
            dependencies: vec!["0".to_string(), "1".to_string()],
        };
        let element = ProblemChild::Testset(set).to_element();
        assert_eq!(element.attrs.get("dependencies"), Some("0,1"));
        assert_eq!(element.attrs.get("points"), Some("30"));
    }

    #[test]
    fn test_problem_attrs_merge() {
        let mut attrs = ProblemAttrs { title: Some("A".to_string()), lang: Some("en".to_string()), ..Default::default() };
        attrs.merge(ProblemAttrs { title: Some("B".to_string()), ..Default::default() });
        assert_eq!(attrs.title.as_deref(), Some("B"));
        assert_eq!(attrs.lang.as_deref(), Some("en"));
    }
}
