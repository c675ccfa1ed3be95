use polygon::*;
use std::fs;
use std::path::Path;

const PROBLEM_XML: &str = r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>
<problem revision="12" short-name="sum-groups" url="https://polygon.example/p/sum-groups">
    <names>
        <name language="english" value="Sum of Groups"/>
        <name language="russian" value="Сумма групп"/>
    </names>
    <statements>
        <statement charset="UTF-8" language="english" mathjax="true" path="statements/english/problem.tex" type="application/x-tex"/>
        <statement charset="UTF-8" language="english" path="statements/.html/english/problem.html" type="text/html"/>
        <statement charset="UTF-8" language="russian" mathjax="true" path="statements/russian/problem.tex" type="application/x-tex"/>
    </statements>
    <tutorials>
        <tutorial charset="UTF-8" language="english" mathjax="true" path="statements/english/tutorial.tex" type="application/x-tex"/>
    </tutorials>
    <judging cpu-name="Intel(R) Core(TM) i3-8100 CPU @ 3.60GHz" cpu-speed="3600" input-file="" output-file="" run-count="1">
        <testset name="tests">
            <time-limit>2000</time-limit>
            <memory-limit>268435456</memory-limit>
            <test-count>5</test-count>
            <input-path-pattern>tests/%02d</input-path-pattern>
            <answer-path-pattern>tests/%02d.a</answer-path-pattern>
            <tests>
                <test group="G2" method="manual" points="5.0" sample="true"/>
                <test cmd="gen 1 2" group="G1" method="generated" points="10.0"/>
                <test group="G2" method="manual" points="5.0"/>
                <test cmd="gen   3 4 --seed 9" group="G1" method="generated" points="10.0"/>
                <test group="G2" method="manual" points="5.0"/>
            </tests>
            <groups>
                <group feedback-policy="complete" name="G1" points-policy="complete-group">
                    <dependencies>
                        <dependency group="G2"/>
                    </dependencies>
                </group>
                <group feedback-policy="icpc" name="G2" points="15" points-policy="each-test"/>
            </groups>
        </testset>
    </judging>
    <files>
        <resources>
            <file path="files/olymp.sty"/>
            <file path="files/testlib.h" type="h.g++"/>
            <file path="files/common.h" type="h.g++"/>
        </resources>
        <executables>
            <executable>
                <source path="files/gen.cpp" type="cpp.g++17"/>
            </executable>
            <executable>
                <source path="files/val.cpp" type="cpp.g++17"/>
            </executable>
        </executables>
    </files>
    <assets>
        <checker name="std::ncmp.cpp" type="testlib">
            <source path="files/check.cpp" type="cpp.g++17"/>
        </checker>
        <validators>
            <validator>
                <source path="files/val.cpp" type="cpp.g++17"/>
            </validator>
        </validators>
        <solutions>
            <solution tag="main">
                <source path="solutions/main.cpp" type="cpp.g++17"/>
            </solution>
            <solution tag="wrong-answer">
                <source path="solutions/wa.py" type="python.3"/>
            </solution>
            <solution tag="wrong-answer">
                <source path="solutions/wa.cobol" type="cobol.ibm"/>
            </solution>
        </solutions>
    </assets>
    <tags>
        <tag value="math"/>
        <tag value="implementation"/>
    </tags>
</problem>
"#;

const PROPERTIES_JSON: &str = r#"{
    "name": "Sum of Groups",
    "legend": "Sum the numbers.",
    "input": "A line with two integers.",
    "output": "Their sum.",
    "notes": "",
    "authorName": "Jury",
    "inputFile": "stdin",
    "outputFile": "stdout",
    "language": "english",
    "sampleTests": [
        {"input": "1 2\n", "output": "3\n", "inputFile": "example.01", "outputFile": "example.01.a"}
    ]
}"#;

fn write_package(root: &Path) {
    fs::write(root.join("problem.xml"), PROBLEM_XML).unwrap();
    let english = root.join("statements/english");
    fs::create_dir_all(&english).unwrap();
    fs::write(english.join("problem-properties.json"), PROPERTIES_JSON).unwrap();
    fs::write(english.join("problem.tex"), "\\begin{problem}").unwrap();
    fs::write(english.join("example.01"), "1 2\n").unwrap();
    fs::write(english.join("example.01.a"), "3\n").unwrap();
    fs::write(english.join("diagram.png"), [0u8; 4]).unwrap();
}

// ============================================================================
// problem.xml
// ============================================================================

#[test]
fn test_read_full_package() {
    let dir = tempfile::tempdir().unwrap();
    write_package(dir.path());

    let mut diagnostics = Diagnostics::new();
    let problem = read_problem(&dir.path().join("problem.xml"), &mut diagnostics).unwrap();

    assert_eq!(problem.short_name.as_deref(), Some("sum-groups"));
    assert_eq!(problem.revision.as_deref(), Some("12"));
    assert_eq!(problem.title().unwrap().value, "Sum of Groups");
    assert_eq!(derive::languages(&problem.names), "en,ru");
    assert_eq!(problem.statements.len(), 2);
    assert_eq!(problem.tutorials.len(), 1);
    assert_eq!(problem.tags, vec!["math", "implementation"]);

    let judging = &problem.judging;
    assert_eq!(judging.cpu_speed, Some(3600));
    assert!(judging.input_file.is_empty());
    let test_set = &judging.test_sets[0];
    assert_eq!(test_set.time_limit, 2000);
    assert_eq!(test_set.memory_limit.bytes(), 268435456);
    assert_eq!(test_set.tests.len(), 5);
    assert!(test_set.tests[0].sample);
    assert_eq!(test_set.tests[1].points, Some(10));
    assert_eq!(test_set.tests[3].params().as_deref(), Some("3 4 --seed 9"));
    assert_eq!(test_set.group("G2").unwrap().points, Some(15));
    assert_eq!(test_set.group("G1").unwrap().dependencies, vec!["G2"]);

    let checker = problem.assets.checker.as_ref().unwrap();
    assert!(checker.is_testlib());
    assert_eq!(checker.source.compiler, Some(Compiler::GnuCpp11));

    let solutions = &problem.assets.solutions;
    assert_eq!(solutions.len(), 3);
    assert_eq!(solutions[1].source.compiler, Some(Compiler::Python3));
    assert_eq!(solutions[2].source.compiler, None);
    assert_eq!(problem.files.resources[0].source.compiler, None);

    // The only warning is the unknown COBOL compiler
    assert_eq!(diagnostics.len(), 1, "{:?}", diagnostics.warnings());
    assert!(diagnostics.warnings()[0].contains("cobol.ibm"));
}

#[test]
fn test_derived_views() {
    let mut diagnostics = Diagnostics::new();
    let problem = parse_problem(PROBLEM_XML, Path::new("problem.xml"), &mut diagnostics).unwrap();
    let test_set = &problem.judging.test_sets[0];

    let ranges = derive::group_ranges(test_set).unwrap();
    assert_eq!(ranges["G1"], "2-4-2");
    assert_eq!(ranges["G2"], "1-5-2");

    let generators = derive::generators(&problem.files.executables, &test_set.tests, &mut diagnostics);
    assert_eq!(generators.len(), 1);
    assert_eq!(generators[0].stem(), "gen");
    assert_eq!(derive::time_limit_seconds(test_set.time_limit), "2");
}

#[test]
fn test_inconsistent_group_is_reported() {
    let xml = PROBLEM_XML
        .replace(r#"<test cmd="gen   3 4 --seed 9" group="G1""#, r#"<test cmd="gen   3 4 --seed 9" group="G2""#);
    let mut diagnostics = Diagnostics::new();
    let problem = parse_problem(&xml, Path::new("problem.xml"), &mut diagnostics).unwrap();
    let err = derive::group_ranges(&problem.judging.test_sets[0]).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("G2"));
    assert!(message.contains("{1,3,4,5}"));
}

#[test]
fn test_not_an_xml_file() {
    let mut diagnostics = Diagnostics::new();
    let err = read_problem(Path::new("package/problem.json"), &mut diagnostics).unwrap_err();
    assert!(matches!(err, PolygonError::NotXml(_)));
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_statement_and_resources() {
    let dir = tempfile::tempdir().unwrap();
    write_package(dir.path());
    let mut diagnostics = Diagnostics::new();
    let problem = read_problem(&dir.path().join("problem.xml"), &mut diagnostics).unwrap();

    let statement = Statement::load(dir.path(), &problem.statements[0]).unwrap();
    assert_eq!(statement.language, "english");
    assert_eq!(statement.properties.author_name.as_deref(), Some("Jury"));
    assert_eq!(statement.properties.sample_tests.len(), 1);

    let resources = statement.resources(dir.path()).unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].source.posix_path(), "statements/english/diagram.png");
    assert!(resources[0].is_picture());
}

#[test]
fn test_missing_statement_properties() {
    let dir = tempfile::tempdir().unwrap();
    write_package(dir.path());
    let mut diagnostics = Diagnostics::new();
    let problem = read_problem(&dir.path().join("problem.xml"), &mut diagnostics).unwrap();

    let err = Statement::load(dir.path(), &problem.statements[1]).unwrap_err();
    assert!(matches!(err, PolygonError::Io { .. }));
}
