//! Embeds the release version for `dot --version`.
use std::process::Command;

fn main() {
    // Prefer DOT_VERSION if set (release builds), otherwise git describe.
    if let Ok(version) = std::env::var("DOT_VERSION") {
        println!("cargo:rustc-env=DOT_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !version.is_empty() {
            println!("cargo:rustc-env=DOT_VERSION={version}");
        }
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=DOT_VERSION");
}
