// End-to-end tests for the command-line interface, run against the compiled binary.

#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use std::fs;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn sample_spec_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("samples")
            .join("sample_openapi.json")
    }

    fn template_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates")
    }

    fn copilot() -> Command {
        let mut cmd = Command::cargo_bin("testops-copilot").unwrap();
        cmd.env("TEMPLATE_DIR", template_dir());
        cmd
    }

    #[test]
    fn test_generate_prints_scenarios_and_code() {
        copilot()
            .args(["generate", "-i"])
            .arg(sample_spec_path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Parsed 5 endpoint(s)"))
            .stdout(predicate::str::contains(
                "Test fetching the list of item. Verify status code 200",
            ))
            .stdout(predicate::str::contains("Generated test code:"))
            .stdout(predicate::str::contains("class TestGET_Api_V1_Items:"));
    }

    #[test]
    fn test_generate_detailed_prints_steps() {
        copilot()
            .args(["generate", "--detailed", "-i"])
            .arg(sample_spec_path())
            .assert()
            .success()
            .stdout(predicate::str::contains("POST /api/v1/items"))
            .stdout(predicate::str::contains("1. Prepare test data"))
            .stdout(predicate::str::contains("Status code: 201"));
    }

    #[test]
    fn test_generate_writes_output_files() {
        let out_dir = std::env::temp_dir().join(format!("testops-cli-{}", Uuid::new_v4()));
        fs::create_dir_all(&out_dir).unwrap();
        let tests_path = out_dir.join("test_api.py");
        let endpoints_path = out_dir.join("endpoints.json");

        copilot()
            .args(["generate", "-i"])
            .arg(sample_spec_path())
            .arg("-o")
            .arg(&tests_path)
            .arg("--parsed-output")
            .arg(&endpoints_path)
            .assert()
            .success()
            .stdout(predicate::str::contains("Tests written to"));

        let tests = fs::read_to_string(&tests_path).unwrap();
        assert!(tests.contains("class TestGET_Api_V1_Items:"));

        let endpoints: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&endpoints_path).unwrap()).unwrap();
        assert_eq!(endpoints.as_array().unwrap().len(), 5);
        assert_eq!(endpoints[0]["method"], "GET");
        assert_eq!(endpoints[0]["path"], "/api/v1/items");

        fs::remove_dir_all(&out_dir).unwrap();
    }

    #[test]
    fn test_generate_fails_on_missing_input() {
        copilot()
            .args(["generate", "-i", "does-not-exist.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn test_generate_fails_on_empty_spec() {
        let spec_path = std::env::temp_dir().join(format!("empty-spec-{}.json", Uuid::new_v4()));
        fs::write(&spec_path, r#"{"openapi": "3.0.0", "paths": {}}"#).unwrap();

        copilot()
            .args(["generate", "-i"])
            .arg(&spec_path)
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "the specification contains no endpoints",
            ));

        fs::remove_file(&spec_path).unwrap();
    }

    #[test]
    fn test_help_lists_subcommands() {
        Command::cargo_bin("testops-copilot")
            .unwrap()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("serve"))
            .stdout(predicate::str::contains("generate"));
    }
}
