use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

fn ini(problem: u32) -> String {
    format!(
        "[pso]
function_points = 5
max_t = 20
max_evaluations = 10000
algorithm = 1
gbest = 0
problem = {problem}
Xmax = 5.12
Vmax = 1
chi = 1
omega = 0.729844
c = 1.494
crit = 0

[topology]
type = staticring1d
nparticles = 6
radius = 1
"
    )
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("runpso-cli-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn records(path: &Path) -> Vec<Vec<f64>> {
    let text = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    text.lines()
        .filter(|line| !line.starts_with("action") && !line.starts_with("iteration"))
        .map(|line| {
            line.split(';')
                .map(|field| {
                    field
                        .parse::<f64>()
                        .unwrap_or_else(|e| panic!("{}: bad field {field:?}: {e}", path.display()))
                })
                .collect()
        })
        .collect()
}

#[test]
fn valid_configuration_writes_renderer_files() {
    let dir = scratch_dir("ok");
    let config = dir.join("current.ini");
    fs::write(&config, ini(4)).unwrap();
    let status = Command::new(env!("CARGO_BIN_EXE_runpso"))
        .arg(&config)
        .status()
        .unwrap();
    assert!(status.success());

    let function = records(&dir.join("current.ini_function.txt"));
    assert_eq!(function.len(), 25);
    assert!(function.iter().all(|r| r.len() == 3));

    let run = records(&dir.join("current.ini_run0.txt"));
    assert_eq!(run.len(), 20 * 6);
    assert!(run.iter().all(|r| r.len() == 6 && r[1] < 20.0 && r[2] < 6.0));

    let topology = records(&dir.join("current.ini_run0_topology.txt"));
    assert_eq!(topology.len(), 6);
    assert!(topology.iter().all(|r| r.len() >= 2));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn output_dir_and_seed_are_honoured() {
    let dir = scratch_dir("flags");
    let out = dir.join("out");
    fs::create_dir_all(&out).unwrap();
    let config = dir.join("current.ini");
    fs::write(&config, ini(1)).unwrap();
    let run = |seed: &str| {
        let status = Command::new(env!("CARGO_BIN_EXE_runpso"))
            .arg(&config)
            .args(["--seed", seed, "--pickle", "--output-dir"])
            .arg(&out)
            .status()
            .unwrap();
        assert!(status.success());
        fs::read_to_string(out.join("current.ini_run0.txt")).unwrap()
    };
    let first = run("7");
    assert_eq!(first, run("7"));
    assert_ne!(first, run("8"));
    assert!(out.join("current.ini.pkl").exists());
    assert!(!dir.join("current.ini_run0.txt").exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn invalid_configuration_fails() {
    let dir = scratch_dir("bad");
    let config = dir.join("current.ini");
    fs::write(&config, ini(11)).unwrap();
    let status = Command::new(env!("CARGO_BIN_EXE_runpso"))
        .arg(&config)
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!dir.join("current.ini_run0.txt").exists());

    let status = Command::new(env!("CARGO_BIN_EXE_runpso"))
        .arg(dir.join("missing.ini"))
        .status()
        .unwrap();
    assert!(!status.success());
    fs::remove_dir_all(&dir).unwrap();
}
