// build.rs

use std::env;
use std::process::Command;

fn main() {
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    if !version.is_empty() {
        println!("cargo:rustc-env=RUSTC_VERSION={version}");
    }
    if let Ok(target) = env::var("TARGET") {
        println!("cargo:rustc-env=TARGET={target}");
    }
    println!("cargo:rerun-if-changed=build.rs");
}
