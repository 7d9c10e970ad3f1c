//! Save / reload behaviour of the manifest store.

use bonsai_project::ProjectFile;
use bonsai_test_utils::TestProject;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_save_then_reload_preserves_file_set() {
    let project = TestProject::new();
    project.write_manifest(&["z.py", "a.ink", "m/"]);

    let mut pf = ProjectFile::load(project.manifest_path()).unwrap();
    pf.add_file("b.py");
    pf.add_file("a.ink");
    let before = pf.files().clone();
    pf.save().unwrap();

    let reloaded = ProjectFile::load(project.manifest_path()).unwrap();
    assert_eq!(reloaded.files(), &before);
}

#[test]
fn test_saved_form_is_sorted_and_deterministic() {
    let project = TestProject::new();
    project.write_manifest_json(&json!({
        "training": {"simulator": "custom"},
        "files": ["sim.py", "cartpole.ink", "sim.py"],
        "description": "demo",
    }));

    let mut pf = ProjectFile::load(project.manifest_path()).unwrap();
    pf.save().unwrap();
    let first = std::fs::read_to_string(project.manifest_path()).unwrap();

    let expected = r#"{
    "description": "demo",
    "files": [
        "cartpole.ink",
        "sim.py"
    ],
    "training": {
        "simulator": "custom"
    }
}"#;
    assert_eq!(first, expected);

    let mut again = ProjectFile::load(project.manifest_path()).unwrap();
    again.save().unwrap();
    let second = std::fs::read_to_string(project.manifest_path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_new_project_defaults_round_trip() {
    let project = TestProject::new();
    let mut pf = ProjectFile::load(project.manifest_path()).unwrap();
    pf.apply_defaults();
    pf.save().unwrap();

    assert_eq!(
        project.read_manifest(),
        json!({
            "files": ["*.ink", "*.py"],
            "training": {"simulator": "custom"}
        })
    );
}

#[test]
fn test_remove_file_is_persisted() {
    let project = TestProject::new();
    project.write_manifest(&["*.ink", "*.py"]);

    let mut pf = ProjectFile::load(project.manifest_path()).unwrap();
    assert!(pf.remove_file("*.py"));
    assert!(!pf.remove_file("*.py"));
    pf.save().unwrap();

    assert_eq!(project.read_manifest()["files"], json!(["*.ink"]));
}

#[test]
fn test_training_section_created_on_access_is_saved() {
    let project = TestProject::new();
    project.write_manifest_json(&json!({"files": []}));

    let mut pf = ProjectFile::load(project.manifest_path()).unwrap();
    pf.training();
    pf.save().unwrap();

    assert_eq!(project.read_manifest()["training"], json!({}));
}
