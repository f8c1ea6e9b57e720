fn main() {
    println!("cargo:rerun-if-env-changed=ATMOS_BUILD");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");

    let build = std::env::var("ATMOS_BUILD")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| {
            let target = std::env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
            let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
            format!("{target} ({profile})")
        });
    println!("cargo:rustc-env=ATMOS_BUILD={build}");

    let sha = git_head()
        .or_else(|| std::env::var("GITHUB_SHA").ok())
        .and_then(|s| short_sha(&s))
        .unwrap_or_default();
    println!("cargo:rustc-env=ATMOS_GIT_SHA={sha}");
}

fn git_head() -> Option<String> {
    let out = std::process::Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    String::from_utf8(out.stdout).ok()
}

fn short_sha(raw: &str) -> Option<String> {
    let s: String = raw.trim().chars().take(7).collect();
    (!s.is_empty() && s.chars().all(|c| c.is_ascii_hexdigit())).then(|| s.to_ascii_lowercase())
}
