use std::process::Command;

fn play(args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_lane-cascade"))
        .args(args)
        .output()
        .expect("failed to run the lane-cascade binary");
    assert!(
        output.status.success(),
        "lane-cascade exited with {}",
        output.status
    );
    String::from_utf8(output.stdout).expect("stdout is utf-8")
}

#[test]
fn down_moves_are_refused_and_play_continues() {
    let stdout = play(&["--seed", "1", "L0", "D0"]);

    assert!(stdout.contains("> L0"), "{stdout}");
    assert!(stdout.contains("from left"), "{stdout}");
    assert!(
        stdout.contains("cannot insert down 0: insertion from Down is not supported"),
        "{stdout}"
    );
    let last = stdout.lines().last().unwrap_or_default();
    assert!(last.starts_with("Two: "), "{stdout}");
}

#[test]
fn malformed_moves_are_skipped() {
    let stdout = play(&["--seed", "1", "X9"]);

    assert!(!stdout.contains("> X9"), "{stdout}");
    assert!(stdout.contains("One: 0"), "{stdout}");
}
