use std::env;

fn main() {
    // Version string embedded in the user agent and `--version` output
    let version = env::var("INDEX_CRAWLER_VERSION")
        .unwrap_or_else(|_| env::var("CARGO_PKG_VERSION").unwrap_or_default());
    println!("cargo:rustc-env=INDEX_CRAWLER_VERSION={}", version);

    println!("cargo:rerun-if-env-changed=INDEX_CRAWLER_VERSION");
    println!("cargo:rerun-if-changed=src/");
    println!("cargo:rerun-if-changed=Cargo.toml");
}
