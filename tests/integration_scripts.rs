use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use throf::runtime::config::InterpreterConfig;
use throf::runtime::data_structures::value::Value;
use throf::runtime::error::ErrorKind;
use throf::runtime::interpreter::throf_interpreter::ThrofInterpreter;
use throf::runtime::interpreter::{CodeManagement, Interpreter, InterpreterStack, WordManagement};

// Helper to get absolute path from manifest dir
fn manifest_path(rel: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir).join(rel)
}

fn script(name: &str) -> String {
    manifest_path("tests/scripts")
        .join(name)
        .to_string_lossy()
        .to_string()
}

#[test]
fn nested_includes_and_deferred_words() {
    let mut interp = ThrofInterpreter::new();

    interp.process_source_file(&script("main.th4")).unwrap();
    assert_eq!(
        interp.stack(),
        &vec![Value::Number(25), Value::Boolean(true)]
    );

    // Words from every included file stay defined.
    interp.process_source("<test>", "cls 3 cube 7 odd?").unwrap();
    assert_eq!(
        interp.stack(),
        &vec![Value::Number(27), Value::Boolean(true)]
    );
}

#[test]
fn search_paths_are_restored() {
    let mut interp = ThrofInterpreter::new();

    interp.process_source_file(&script("main.th4")).unwrap();
    assert!(interp.search_paths().is_empty());

    assert!(interp
        .process_source_file(&script("missing_include.th4"))
        .is_err());
    assert!(interp.search_paths().is_empty());
}

#[test]
fn missing_include() {
    let mut interp = ThrofInterpreter::new();

    let error = interp
        .process_source_file(&script("missing_include.th4"))
        .unwrap_err();

    assert!(matches!(error.kind(), ErrorKind::FileAccessFailure(_)));
    assert_eq!(interp.stack(), &vec![Value::Number(1)]);
    assert!(interp.call_stack().is_empty());
}

#[test]
fn missing_file() {
    let mut interp = ThrofInterpreter::new();

    let error = interp
        .process_source_file("no/such/file.th4")
        .unwrap_err();

    assert!(matches!(error.kind(), ErrorKind::FileAccessFailure(_)));
}

#[test]
fn includes_use_configured_search_paths() {
    let lib = manifest_path("tests/scripts/lib");
    let config = InterpreterConfig::default().with_search_path(&lib.to_string_lossy());
    let mut interp = ThrofInterpreter::with_config(config);

    interp
        .process_source("<test>", ":include \"math.th4\" 4 square 2 cube")
        .unwrap();

    assert_eq!(interp.stack(), &vec![Value::Number(16), Value::Number(8)]);
}

#[test]
fn errors_name_the_included_file() {
    let lib = manifest_path("tests/scripts/lib");
    let config = InterpreterConfig::default().with_search_path(&lib.to_string_lossy());
    let mut interp = ThrofInterpreter::with_config(config);

    let error = interp
        .process_source("<test>", ":include \"broken.th4\"")
        .unwrap_err();

    assert_eq!(error.kind(), &ErrorKind::UnresolvedToken("bogus".to_string()));
    assert!(error.source_name().unwrap().ends_with("broken.th4"));
    assert_eq!(error.location().as_ref().map(|l| l.line()), Some(2));
}

#[test]
fn self_inclusion_hits_the_depth_limit() {
    let config = InterpreterConfig::default().with_max_call_depth(16);
    let mut interp = ThrofInterpreter::with_config(config);

    let error = interp
        .process_source_file(&script("self_include.th4"))
        .unwrap_err();

    assert_eq!(error.kind(), &ErrorKind::CallDepthExceeded(16));
    assert!(interp.search_paths().is_empty());
    assert!(interp.call_stack().is_empty());
}

#[test]
fn self_inclusion_hits_the_include_limit() {
    let mut interp = ThrofInterpreter::new();

    let error = interp
        .process_source_file(&script("self_include.th4"))
        .unwrap_err();

    assert_eq!(error.kind(), &ErrorKind::IncludeDepthExceeded(64));
    assert!(interp.search_paths().is_empty());
    assert!(interp.call_stack().is_empty());

    interp.process_source("<test>", "1 2 +").unwrap();
    assert_eq!(interp.stack(), &vec![Value::Number(3)]);
}

#[test]
fn init_file_is_loaded_when_present() {
    let config = InterpreterConfig::default().with_init_file(&script("init.th4"));
    let mut interp = ThrofInterpreter::with_config(config);

    assert!(interp.load_init_file().unwrap());
    assert!(interp.dictionary().contains("greet"));
    assert!(interp.variables().contains("greeting"));
}

#[test]
fn missing_init_file_is_skipped() {
    let config = InterpreterConfig::default().with_init_file("no-such-init.th4");
    let mut interp = ThrofInterpreter::with_config(config);

    assert!(!interp.load_init_file().unwrap());
    assert_eq!(interp.dictionary().compiled_word_count(), 0);
}

// The command line tool, driven the way a user would.

fn throf_command() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_throf"));

    command.arg("--no-init").env_remove("RUST_LOG");
    command
}

#[test]
fn binary_runs_a_file() {
    let output = throf_command()
        .arg(script("output.th4"))
        .output()
        .expect("Failed to run interpreter");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "\"count is\" 3 ");
}

#[test]
fn binary_dumps_state() {
    let output = throf_command()
        .arg("--dump-state")
        .arg(script("main.th4"))
        .output()
        .expect("Failed to run interpreter");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("\tsquare : dup * "), "{}", stdout);
    assert!(stdout.contains("Stack (size: 2):"), "{}", stdout);
}

#[test]
fn binary_dumps_tokens() {
    let output = throf_command()
        .arg("--dump-tokens")
        .arg(script("lib/helpers.th4"))
        .output()
        .expect("Failed to run interpreter");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.starts_with("word definition: cube\n"), "{}", stdout);
    assert!(stdout.contains("definition terminator: ;"), "{}", stdout);
}

#[test]
fn binary_reports_file_errors() {
    let output = throf_command()
        .arg(script("lib/broken.th4"))
        .output()
        .expect("Failed to run interpreter");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(
        stderr.contains("Error encountered while processing file"),
        "{}",
        stderr
    );
    assert!(stderr.contains("\tcomponent: Compiler"), "{}", stderr);
    assert!(
        stderr.contains("\texplanation: 'bogus' is not a defined word or valid data type"),
        "{}",
        stderr
    );
}

#[test]
fn repl_keeps_going_after_errors() {
    let mut child = throf_command()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to run interpreter");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"1 2 + .\nbogus\n: twice 2 * ;\n21 twice .\n")
        .unwrap();

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success());
    assert!(stdout.contains("throf> "), "{}", stdout);
    assert!(stdout.contains("3 "), "{}", stdout);
    assert!(stdout.contains("42 "), "{}", stdout);
    assert!(!stdout.contains("ERROR: "), "{}", stdout);
    assert!(stderr.contains("ERROR: "), "{}", stderr);
    assert!(stderr.contains("'bogus' is not a defined word"), "{}", stderr);
}
