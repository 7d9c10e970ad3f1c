//! Pattern expansion against real directory trees.

use bonsai_project::ProjectFile;
use bonsai_test_utils::TestProject;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn resolved(project: &TestProject, patterns: &[&str]) -> Vec<String> {
    project.write_manifest(patterns);
    let pf = ProjectFile::load(project.manifest_path()).unwrap();
    pf.list_paths().unwrap().into_iter().collect()
}

#[test]
fn test_glob_matches_top_level_files() {
    let project = TestProject::new();
    project.write_file("cartpole.ink", "");
    project.write_file("sim.py", "");
    project.write_file("README.md", "");

    assert_eq!(resolved(&project, &["*.ink", "*.py"]), vec!["cartpole.ink", "sim.py"]);
}

#[test]
fn test_directory_pattern_walks_recursively() {
    let project = TestProject::new();
    project.write_file("sim/__init__.py", "");
    project.write_file("sim/env/physics.py", "");
    project.write_file("sim/env/data/table.csv", "");

    assert_eq!(
        resolved(&project, &["sim"]),
        vec!["sim/__init__.py", "sim/env/data/table.csv", "sim/env/physics.py"]
    );
}

#[test]
fn test_directory_walk_applies_exclusions() {
    let project = TestProject::new();
    project.write_file("sim/main.py", "");
    project.write_file("sim/main.pyc", "");
    project.write_file("sim/.hidden", "");
    project.write_file("sim/.git/index", "");
    project.write_file("sim/.git/objects/ab/cdef", "");
    project.write_file("sim/pkg/.env", "");

    assert_eq!(resolved(&project, &["sim"]), vec!["sim/main.py"]);
}

#[test]
fn test_dot_pattern_includes_project_but_not_manifest() {
    let project = TestProject::new();
    project.write_file("model.ink", "");
    project.write_file(".brains", "{}");
    project.write_file(".git/HEAD", "ref");

    assert_eq!(resolved(&project, &["."]), vec!["model.ink"]);
}

#[test]
fn test_manifest_is_never_resolved() {
    let project = TestProject::new();
    project.write_file("model.ink", "");

    assert_eq!(resolved(&project, &["*"]), vec!["model.ink"]);
    assert_eq!(resolved(&project, &["bonsai_brain.bproj"]), Vec::<String>::new());
}

#[rstest]
#[case("../*")]
#[case("../outside.ink")]
#[case("sub/../../outside.ink")]
fn test_patterns_outside_project_are_ignored(#[case] pattern: &str) {
    let outer = TestProject::new();
    outer.write_file("outside.ink", "");
    outer.write_file("inner/inside.ink", "");

    let inner_manifest = outer.root().join("inner/bonsai_brain.bproj");
    std::fs::write(
        &inner_manifest,
        serde_json::json!({ "files": [pattern, "*.ink"] }).to_string(),
    )
    .unwrap();

    let pf = ProjectFile::load(&inner_manifest).unwrap();
    let paths: Vec<String> = pf.list_paths().unwrap().into_iter().collect();
    assert_eq!(paths, vec!["inside.ink"]);
}

#[test]
fn test_pattern_without_matches_contributes_nothing() {
    let project = TestProject::new();
    project.write_file("a.py", "");
    assert_eq!(resolved(&project, &["*.ink", "a.py"]), vec!["a.py"]);
}

#[test]
fn test_question_mark_and_brackets() {
    let project = TestProject::new();
    project.write_file("sim1.py", "");
    project.write_file("sim2.py", "");
    project.write_file("sim10.py", "");

    assert_eq!(resolved(&project, &["sim?.py"]), vec!["sim1.py", "sim2.py"]);
    assert_eq!(resolved(&project, &["sim[2].py"]), vec!["sim2.py"]);
}

#[test]
fn test_double_star_is_not_recursive() {
    let project = TestProject::new();
    project.write_file("a/one.py", "");
    project.write_file("a/b/two.py", "");

    assert_eq!(resolved(&project, &["**/*.py"]), vec!["a/one.py"]);
}

#[test]
fn test_overlapping_patterns_are_deduplicated() {
    let project = TestProject::new();
    project.write_file("sim/main.py", "");

    assert_eq!(resolved(&project, &["sim", "sim/*.py", "sim/main.py"]), vec!["sim/main.py"]);
}

#[test]
fn test_unclosed_bracket_matches_literally() {
    let project = TestProject::new();
    project.write_file("model.ink", "");
    project.write_file("data[v2.py", "");
    project.write_file("datav.py", "");

    assert_eq!(
        resolved(&project, &["*.ink", "data[v2.py"]),
        vec!["data[v2.py", "model.ink"]
    );
}
