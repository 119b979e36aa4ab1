use std::process::Command;

fn main() {
    println!(
        "cargo:rustc-env=DAO_CONSOLE_BUILD_DATE={}",
        chrono::Utc::now().format("%Y-%m-%d")
    );

    // Short SHA for `dao-console --version`; builds outside a checkout report "unknown".
    let git_sha = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=DAO_CONSOLE_GIT_SHA={git_sha}");
    println!("cargo:rerun-if-changed=.git/HEAD");
}
