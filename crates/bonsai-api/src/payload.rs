//! `multipart/mixed` project upload
//!
//! The first part is a JSON document named `project_data` describing the
//! project; every resolved project file follows as an attachment:
//!
//! ```text
//! --<boundary>
//! Content-Disposition: form-data; name="project_data"
//! Content-Type: application/json
//!
//! {"name": ..., "description": "", "project_file": {...}, "project_accompanying_files": [...]}
//! --<boundary>
//! Content-Disposition: attachment; name="sim.py"; filename="sim.py"
//! Content-Type: application/octet-stream
//! Content-Length: 12
//!
//! <file bytes>
//! --<boundary>--
//! ```

use bonsai_fs::io;
use bonsai_project::ProjectFile;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::Result;

const CRLF: &[u8] = b"\r\n";

/// An encoded request body with its `Content-Type` header value.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Project data and file contents ready for upload.
#[derive(Debug, Clone)]
pub struct ProjectPayload {
    data: Map<String, Value>,
    files: Vec<(String, Vec<u8>)>,
}

impl ProjectPayload {
    /// Payload for creating brain `name` from `project`.
    pub fn for_create(name: &str, project: &ProjectFile) -> Result<Self> {
        let mut payload = Self::from_project(project)?;
        payload.data.insert("name".to_string(), Value::String(name.to_string()));
        Ok(payload)
    }

    /// Payload for replacing the files of an existing brain. Carries no
    /// `name`.
    pub fn for_edit(project: &ProjectFile) -> Result<Self> {
        Self::from_project(project)
    }

    fn from_project(project: &ProjectFile) -> Result<Self> {
        let project_dir = project.directory();
        let rel_paths = project.list_paths()?;

        let mut files = Vec::with_capacity(rel_paths.len());
        for rel in &rel_paths {
            let content = io::read_bytes(&project_dir.join(rel))?;
            files.push((rel.clone(), content));
        }

        let mut data = Map::new();
        data.insert("description".to_string(), Value::String(String::new()));
        data.insert(
            "project_file".to_string(),
            json!({
                "name": project.file_name(),
                "content": project.document(),
            }),
        );
        data.insert(
            "project_accompanying_files".to_string(),
            Value::Array(rel_paths.into_iter().map(Value::String).collect()),
        );

        tracing::debug!(files = files.len(), "built project payload");
        Ok(Self { data, files })
    }

    /// The `project_data` JSON document.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Project-relative names of the attached files.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|(name, _)| name.as_str())
    }

    /// Encode with a random boundary.
    pub fn encode(&self) -> Result<MultipartBody> {
        let boundary = Uuid::new_v4().simple().to_string();
        self.encode_with_boundary(&boundary)
    }

    /// Encode using `boundary`, which must not occur in any part.
    pub fn encode_with_boundary(&self, boundary: &str) -> Result<MultipartBody> {
        let mut body = Vec::new();
        let data = serde_json::to_vec(&self.data)?;

        write_part(
            &mut body,
            boundary,
            &[
                "Content-Disposition: form-data; name=\"project_data\"".to_string(),
                "Content-Type: application/json".to_string(),
            ],
            &data,
        );

        for (name, content) in &self.files {
            let quoted = quote(name);
            write_part(
                &mut body,
                boundary,
                &[
                    format!("Content-Disposition: attachment; name=\"{quoted}\"; filename=\"{quoted}\""),
                    "Content-Type: application/octet-stream".to_string(),
                    format!("Content-Length: {}", content.len()),
                ],
                content,
            );
        }

        body.extend_from_slice(format!("--{boundary}--").as_bytes());
        body.extend_from_slice(CRLF);

        Ok(MultipartBody {
            content_type: format!("multipart/mixed; boundary={boundary}"),
            body,
        })
    }
}

fn write_part(out: &mut Vec<u8>, boundary: &str, headers: &[String], content: &[u8]) {
    out.extend_from_slice(format!("--{boundary}").as_bytes());
    out.extend_from_slice(CRLF);
    for header in headers {
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(CRLF);
    }
    out.extend_from_slice(CRLF);
    out.extend_from_slice(content);
    out.extend_from_slice(CRLF);
}

/// Escape a header parameter value for use inside double quotes.
fn quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonsai_test_utils::TestProject;
    use pretty_assertions::assert_eq;

    fn project() -> (TestProject, ProjectFile) {
        let project = TestProject::new();
        project.write_file("cartpole.ink", "inkling \"2.0\"");
        project.write_file("sim/main.py", "print(1)");
        project.write_manifest(&["*.ink", "sim"]);
        let pf = ProjectFile::load(project.manifest_path()).unwrap();
        (project, pf)
    }

    #[test]
    fn create_payload_names_the_brain() {
        let (_project, pf) = project();
        let payload = ProjectPayload::for_create("cartpole", &pf).unwrap();

        assert_eq!(payload.data()["name"], json!("cartpole"));
        assert_eq!(payload.data()["description"], json!(""));
        assert_eq!(payload.data()["project_file"]["name"], json!("bonsai_brain.bproj"));
        assert_eq!(
            payload.data()["project_file"]["content"]["files"],
            json!(["*.ink", "sim"])
        );
        assert_eq!(
            payload.data()["project_accompanying_files"],
            json!(["cartpole.ink", "sim/main.py"])
        );
    }

    #[test]
    fn edit_payload_has_no_name() {
        let (_project, pf) = project();
        let payload = ProjectPayload::for_edit(&pf).unwrap();
        assert!(!payload.data().contains_key("name"));
        assert_eq!(payload.file_names().collect::<Vec<_>>(), vec!["cartpole.ink", "sim/main.py"]);
    }

    #[test]
    fn encoded_body_layout() {
        let (_project, pf) = project();
        let encoded = ProjectPayload::for_edit(&pf)
            .unwrap()
            .encode_with_boundary("XYZ")
            .unwrap();
        let text = String::from_utf8(encoded.body).unwrap();

        assert_eq!(encoded.content_type, "multipart/mixed; boundary=XYZ");
        assert!(text.starts_with("--XYZ\r\nContent-Disposition: form-data; name=\"project_data\"\r\nContent-Type: application/json\r\n\r\n{"));
        assert!(text.contains(
            "--XYZ\r\nContent-Disposition: attachment; name=\"sim/main.py\"; filename=\"sim/main.py\"\r\nContent-Type: application/octet-stream\r\nContent-Length: 8\r\n\r\nprint(1)\r\n"
        ));
        assert!(text.ends_with("--XYZ--\r\n"));
        assert_eq!(text.matches("--XYZ\r\n").count(), 3);
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(quote(r#"a"b\c"#), r#"a\"b\\c"#);
    }
}
