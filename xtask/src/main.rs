// locale-gate - Build Task Runner
// Unified build system using cargo xtask pattern

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use xshell::{cmd, Shell};

const BINARY: &str = "locale-gate";
const PLURAL_FORMS: &[&str] = &["zero", "one", "two", "few", "many", "other"];

fn main() -> Result<()> {
    let sh = Shell::new()?;
    let args: Vec<_> = std::env::args().skip(1).collect();

    match args.first().map(|s| s.as_str()) {
        Some("build") => {
            let release = args.contains(&"--release".to_string());
            build(&sh, release)
        }
        Some("test") => test(&sh),
        Some("format") => {
            let check = args.contains(&"--check".to_string());
            format(&sh, check)
        }
        Some("clippy") => clippy(&sh),
        Some("run") => run(&sh, &args[1..]),
        Some("clean") => clean(&sh),
        Some("ci") => ci(&sh),
        Some("dist") => dist(&sh),
        Some("check-translations") => check_translations(),
        Some("install") => {
            if args.len() < 2 {
                eprintln!("Error: install requires a destination path");
                eprintln!("Usage: cargo xtask install <destination>");
                std::process::exit(1);
            }
            install(&sh, &args[1])
        }
        _ => {
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("locale-gate - Build Commands:");
    println!();
    println!("Usage: cargo xtask <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  build [--release]     Build the server");
    println!("  test                  Run all tests");
    println!("  format [--check]      Format code (check mode doesn't modify)");
    println!("  clippy                Run clippy checks");
    println!("  run [ARGS...]         Build and run the server");
    println!("  clean                 Clean build artifacts");
    println!("  ci                    Run all CI checks (format + translations + clippy + build + test)");
    println!("  dist                  Create distribution package (tar.gz)");
    println!("  check-translations    Verify every message file covers the default language");
    println!("  install <path>        Build and install to specified path");
    println!();
    println!("Examples:");
    println!("  cargo xtask build --release");
    println!("  cargo xtask run -- --config conf/config.toml");
    println!("  cargo xtask check-translations");
}

/// Build the server
fn build(sh: &Shell, release: bool) -> Result<()> {
    println!("🔨 Building locale-gate{}...", if release { " (release)" } else { "" });

    let _dir = sh.push_dir(project_root().join("backend"));
    if release {
        cmd!(sh, "cargo build --release")
            .run()
            .context("Failed to build in release mode")?;
        create_distribution(sh)?;
    } else {
        cmd!(sh, "cargo build").run().context("Failed to build")?;
    }

    println!("✅ Build complete!");
    if release {
        println!();
        println!("📦 Distribution layout: build/dist/");
    }

    Ok(())
}

/// Lay out bin/, conf/, translations/ and logs/ under build/dist
fn create_distribution(sh: &Shell) -> Result<()> {
    let project = project_root();
    let dist_dir = project.join("build/dist");

    cmd!(sh, "mkdir -p {dist_dir}/bin").run()?;
    cmd!(sh, "mkdir -p {dist_dir}/conf").run()?;
    cmd!(sh, "mkdir -p {dist_dir}/translations").run()?;
    cmd!(sh, "mkdir -p {dist_dir}/logs").run()?;

    let binary_src = release_binary();
    let binary_dst = dist_dir.join("bin").join(BINARY);
    cmd!(sh, "cp {binary_src} {binary_dst}").run()?;

    let config_src = project.join("backend/conf/config.toml");
    let config_dst = dist_dir.join("conf/config.toml");
    cmd!(sh, "cp {config_src} {config_dst}").run()?;

    for file in message_files(&project.join("backend/translations"))? {
        let dst = dist_dir.join("translations");
        cmd!(sh, "cp {file} {dst}/").run()?;
    }

    Ok(())
}

/// Run all tests
fn test(sh: &Shell) -> Result<()> {
    println!("🧪 Running tests...");
    println!();

    let _dir = sh.push_dir(project_root());
    cmd!(sh, "cargo test --workspace").run().context("Tests failed")?;

    println!();
    println!("✅ All tests passed!");

    Ok(())
}

/// Format code
fn format(sh: &Shell, check: bool) -> Result<()> {
    println!("🎨 Formatting Rust code...");

    let _dir = sh.push_dir(project_root());
    if check {
        cmd!(sh, "cargo fmt --all -- --check")
            .run()
            .context("Rust code is not formatted")?;
        println!("✅ Rust code is properly formatted");
    } else {
        cmd!(sh, "cargo fmt --all")
            .run()
            .context("Failed to format Rust code")?;
        println!("✅ Rust code formatted");
    }

    Ok(())
}

/// Run clippy checks
fn clippy(sh: &Shell) -> Result<()> {
    let _dir = sh.push_dir(project_root());

    cmd!(sh, "cargo clippy --workspace --all-targets -- --deny warnings --allow clippy::uninlined-format-args")
        .run()
        .context("Clippy checks failed")?;

    Ok(())
}

/// Build and run the server
fn run(sh: &Shell, args: &[String]) -> Result<()> {
    build(sh, false)?;

    println!();
    println!("▶️  Starting locale-gate...");
    println!();

    let _dir = sh.push_dir(project_root().join("backend"));
    let mut cmd = cmd!(sh, "cargo run --bin {BINARY} --");
    for arg in args {
        cmd = cmd.arg(arg);
    }
    cmd.run().context("Failed to run application")?;

    Ok(())
}

/// Clean build artifacts
fn clean(sh: &Shell) -> Result<()> {
    println!("🧹 Cleaning build artifacts...");

    let project = project_root();
    let _dir = sh.push_dir(&project);
    cmd!(sh, "cargo clean").run()?;

    let build_dir = project.join("build");
    if build_dir.exists() {
        cmd!(sh, "rm -rf {build_dir}").run()?;
    }

    println!("✅ Clean complete!");

    Ok(())
}

/// Run all CI checks
fn ci(sh: &Shell) -> Result<()> {
    println!("🔄 Running CI pipeline...");
    println!();

    println!("📝 [1/5] Checking code format...");
    format(sh, true)?;
    println!();

    println!("🌐 [2/5] Checking translations...");
    check_translations()?;
    println!();

    println!("🔍 [3/5] Running clippy checks...");
    clippy(sh)?;
    println!();

    println!("🔨 [4/5] Building project...");
    build(sh, true)?;
    println!();

    println!("🧪 [5/5] Running tests...");
    test(sh)?;
    println!();

    println!("🎉 CI pipeline completed successfully!");

    Ok(())
}

/// Create distribution package (tar.gz)
fn dist(sh: &Shell) -> Result<()> {
    println!("📦 Creating distribution package...");
    println!();

    build(sh, true)?;
    println!();

    let dist_dir = project_root().join("build/dist");

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let package_name = format!("{}-{}.tar.gz", BINARY, timestamp);
    let package_path = dist_dir.join(&package_name);

    println!("📋 Creating tarball: {}...", package_name);

    let _dir = sh.push_dir(&dist_dir);
    cmd!(sh, "tar czf {package_name} bin conf translations logs")
        .run()
        .context("Failed to create tarball")?;

    println!();
    println!("✅ Distribution package created!");
    println!("   Location: {}", package_path.display());
    println!("   Size: {} KB", std::fs::metadata(&package_path)?.len() / 1024);
    println!();
    println!("📝 To extract:");
    println!("   tar xzf {}", package_name);

    Ok(())
}

/// Install built binary to specified path
fn install(sh: &Shell, destination: &str) -> Result<()> {
    println!("📦 Installing locale-gate to {}...", destination);
    println!();

    build(sh, true)?;
    println!();

    let dest_path = Path::new(destination);
    if let Some(parent) = dest_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create destination directory")?;
    }

    println!("📋 Copying binary to {}...", destination);
    std::fs::copy(release_binary(), dest_path).context("Failed to copy binary")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(dest_path)?.permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(dest_path, perms)?;
    }

    println!();
    println!("✅ Installation complete!");
    println!("   Binary: {}", destination);
    println!("   Remember to ship conf/ and translations/ next to it");

    Ok(())
}

/// Every message file must parse, every message must have an `other` form,
/// and every message id of the default language must exist in the others.
fn check_translations() -> Result<()> {
    let project = project_root();
    let config_path = project.join("backend/conf/config.toml");
    let config: toml::Table = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?
        .parse()
        .context("Failed to parse config.toml")?;

    let i18n = config.get("i18n").and_then(|v| v.as_table());
    let default_language = i18n
        .and_then(|t| t.get("default_language"))
        .and_then(|v| v.as_str())
        .unwrap_or("en-US");
    let languages: Vec<&str> = i18n
        .and_then(|t| t.get("languages"))
        .and_then(|v| v.as_array())
        .map(|a| a.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_else(|| vec!["en-US", "zh-CN"]);

    let dir = project.join("backend/translations");
    let reference = message_ids(&dir, default_language)?;
    let mut problems = 0;

    for language in &languages {
        let ids = message_ids(&dir, language)?;
        for missing in reference.difference(&ids) {
            println!("⚠️  {}: missing translation for {}", language, missing);
            problems += 1;
        }
        for extra in ids.difference(&reference) {
            println!("⚠️  {}: {} is not in {}", language, extra, default_language);
            problems += 1;
        }
        println!("📝 {}: {} messages", language, ids.len());
    }

    if problems > 0 {
        bail!("{} translation problem(s) found", problems);
    }

    println!("✅ Translations are complete");
    Ok(())
}

fn message_ids(dir: &Path, language: &str) -> Result<BTreeSet<String>> {
    let path = dir.join(format!("active.{}.toml", language));
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Missing message file {}", path.display()))?;
    let table: toml::Table = content
        .parse()
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let mut ids = BTreeSet::new();
    for (id, value) in table {
        match value {
            toml::Value::String(_) => {}
            toml::Value::Table(forms) => {
                if !forms.contains_key("other") {
                    bail!("{}: message {} has no `other` form", language, id);
                }
                for key in forms.keys() {
                    let known = PLURAL_FORMS.contains(&key.as_str())
                        || matches!(key.as_str(), "description" | "leftDelim" | "rightDelim");
                    if !known {
                        bail!("{}: message {} has unknown key {}", language, id, key);
                    }
                }
            }
            _ => bail!("{}: message {} must be a string or a table", language, id),
        }
        ids.insert(id);
    }

    Ok(ids)
}

fn message_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().is_some_and(|e| e == "toml") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn release_binary() -> PathBuf {
    project_root().join("target/release").join(BINARY)
}

/// Get project root directory
fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(1)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
