use std::path::PathBuf;
use std::process::Command;

const DOC: &str = r#"{
  "tree_edges": [{"source": "A", "target": "B"}, {"source": "A", "target": "C"}],
  "clonal_prev": [
    {"timepoint": "Dx", "clone_id": "A", "clonal_prev": 0.9},
    {"timepoint": "Dx", "clone_id": "B", "clonal_prev": 0.1},
    {"timepoint": "Rx", "clone_id": "B", "clonal_prev": 0.5},
    {"timepoint": "Rx", "clone_id": "C", "clonal_prev": 0.5}
  ],
  "perturbations": [{"prev_tp": "Dx", "frac": 0.2}]
}"#;

fn workdir(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    std::fs::create_dir_all(&dir).expect("create test dir");
    dir
}

fn timesweep() -> Command {
    Command::new(env!("CARGO_BIN_EXE_timesweep"))
}

#[test]
fn layout_writes_json() {
    let dir = workdir("cli_layout");
    let input = dir.join("doc.json");
    let out = dir.join("layout.json");
    std::fs::write(&input, DOC).expect("write input");
    let _ = std::fs::remove_file(&out);

    let status = timesweep()
        .arg("layout")
        .arg("--in")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .status()
        .expect("spawn timesweep");
    assert!(status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&out).expect("read layout")).expect("valid json");
    assert_eq!(json["timepoints"], serde_json::json!(["T0", "Dx", "Rx"]));
    assert_eq!(json["layout"]["columns"][2]["A"]["state"], "replaced");
    assert!(json["traditional_curves"][0]["d"].as_str().is_some_and(|d| d.starts_with('M')));
}

#[test]
fn render_writes_svg_with_overrides() {
    let dir = workdir("cli_render");
    let input = dir.join("doc.json");
    let out = dir.join("sweep.svg");
    std::fs::write(&input, DOC).expect("write input");
    let _ = std::fs::remove_file(&out);

    let status = timesweep()
        .args(["render", "--view", "tracks", "--position", "centre", "--threshold", "0.02"])
        .arg("--in")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .status()
        .expect("spawn timesweep");
    assert!(status.success());

    let svg = std::fs::read_to_string(&out).expect("read svg");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"data-genotype="C""#));
}

#[test]
fn malformed_tree_fails() {
    let dir = workdir("cli_malformed");
    let input = dir.join("doc.json");
    std::fs::write(
        &input,
        r#"{"tree_edges": [{"source": "A", "target": "A"}], "clonal_prev": []}"#,
    )
    .expect("write input");

    let output = timesweep()
        .arg("layout")
        .arg("--in")
        .arg(&input)
        .output()
        .expect("spawn timesweep");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("malformed tree"));
}
