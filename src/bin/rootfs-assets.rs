use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rootfs_assets::{
    check_rootfs, prepare_asset, report, write_report, AssetManifest, PlaceholderMapping,
    PreparedAsset,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";

fn usage() -> &'static str {
    "Usage:\n  rootfs-assets prepare <rootfs> <asset-spec>... [--placeholder TOKEN=VALUE]... [--report <path>]\n  rootfs-assets manifest <rootfs> <manifest.toml> [--report <path>]"
}

/// Flags accepted after the subcommand, plus whatever was left positional.
#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    positional: Vec<String>,
    placeholders: PlaceholderMapping,
    report: Option<PathBuf>,
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!(usage());
    };
    let options = parse_options(rest)?;

    match (command.as_str(), options.positional.as_slice()) {
        ("prepare", [rootfs, specs @ ..]) if !specs.is_empty() => run_assets(
            Path::new(rootfs),
            specs,
            &options.placeholders,
            options.report.as_deref(),
        ),
        ("manifest", [rootfs, manifest]) if options.placeholders.is_empty() => {
            let manifest_path = Path::new(manifest);
            let manifest = AssetManifest::load(manifest_path)?;
            println!(
                "[assets] manifest '{}': {} asset(s), {} placeholder(s)",
                manifest_path.display(),
                manifest.assets.len(),
                manifest.placeholders.len()
            );
            run_assets(
                Path::new(rootfs),
                &manifest.assets,
                &manifest.placeholders,
                options.report.as_deref(),
            )
        }
        _ => bail!(usage()),
    }
}

fn parse_options(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--placeholder" => {
                let value = iter
                    .next()
                    .with_context(|| format!("--placeholder needs TOKEN=VALUE\n{}", usage()))?;
                let Some((token, replacement)) = value.split_once('=') else {
                    bail!("invalid --placeholder '{value}': expected TOKEN=VALUE");
                };
                if token.is_empty() {
                    bail!("invalid --placeholder '{value}': token must not be empty");
                }
                options.placeholders.insert(token, replacement);
            }
            "--report" => {
                let path = iter
                    .next()
                    .with_context(|| format!("--report needs a path\n{}", usage()))?;
                options.report = Some(PathBuf::from(path));
            }
            other if other.starts_with("--") => bail!("unknown option '{other}'\n{}", usage()),
            _ => options.positional.push(arg.clone()),
        }
    }
    Ok(options)
}

fn run_assets(
    rootfs: &Path,
    specs: &[String],
    mapping: &PlaceholderMapping,
    report_path: Option<&Path>,
) -> Result<()> {
    check_rootfs(rootfs)?;

    let mut prepared: Vec<PreparedAsset> = Vec::with_capacity(specs.len());
    for (index, spec) in specs.iter().enumerate() {
        let asset = prepare_asset(spec, rootfs, mapping).with_context(|| {
            format!(
                "preparing asset {}/{} into '{}'",
                index + 1,
                specs.len(),
                rootfs.display()
            )
        })?;
        println!(
            "[assets] {} -> {} ({} node(s), {} byte(s))",
            asset.source.display(),
            asset.dest.display(),
            asset.stats.nodes(),
            asset.stats.bytes
        );
        prepared.push(asset);
    }

    let totals = report::totals(&prepared);
    println!(
        "[assets] done: {} asset(s), {} director(ies), {} file(s), {} symlink(s), {} byte(s)",
        prepared.len(),
        totals.directories,
        totals.files,
        totals.symlinks,
        totals.bytes
    );

    if let Some(path) = report_path {
        write_report(path, &prepared)?;
        println!("[assets] report written to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_options_mixed() {
        let options = parse_options(&args(&[
            "/rootfs",
            "--placeholder",
            "@A@=/x",
            "/opt:@A@",
            "--report",
            "out.json",
            "--placeholder",
            "@B@=y=z",
        ]))
        .unwrap();

        assert_eq!(options.positional, ["/rootfs", "/opt:@A@"]);
        let pairs: Vec<(&str, &str)> = options.placeholders.iter().collect();
        assert_eq!(pairs, [("@A@", "/x"), ("@B@", "y=z")]);
        assert_eq!(options.report, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_parse_options_rejects_bad_placeholder() {
        assert!(parse_options(&args(&["--placeholder", "novalue"])).is_err());
        assert!(parse_options(&args(&["--placeholder", "=v"])).is_err());
        assert!(parse_options(&args(&["--placeholder"])).is_err());
    }

    #[test]
    fn test_parse_options_rejects_unknown_flag() {
        let err = parse_options(&args(&["--force"])).unwrap_err();
        assert!(err.to_string().contains("unknown option '--force'"));
    }
}
