//! TOML asset manifests.
//!
//! ```toml
//! [[placeholder]]
//! token = "${VERSION}"
//! value = "1.2.3"
//!
//! [[asset]]
//! dest = "/opt/app"
//! source = "/home/user/build/${VERSION}/app"
//!
//! [[asset]]
//! spec = "/etc/motd:/home/user/motd"
//! ```
//!
//! Placeholders are an array of tables so their order survives parsing;
//! substitution runs in that order.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::asset::{join_spec, PlaceholderMapping, LIST_SEPARATOR};

/// Asset specs plus the placeholder mapping to resolve them with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetManifest {
    /// Raw `<dest>:<source>` specs, in file order.
    pub assets: Vec<String>,
    pub placeholders: PlaceholderMapping,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestToml {
    #[serde(default)]
    placeholder: Vec<PlaceholderToml>,
    #[serde(default)]
    asset: Vec<AssetToml>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlaceholderToml {
    token: String,
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AssetToml {
    spec: Option<String>,
    dest: Option<String>,
    source: Option<String>,
}

impl AssetManifest {
    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading asset manifest '{}'", path.display()))?;
        Self::parse(&text, path)
    }

    /// Parse manifest text; `origin` only appears in error messages.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let parsed: ManifestToml = toml::from_str(text)
            .with_context(|| format!("parsing asset manifest '{}'", origin.display()))?;

        let mut seen = HashSet::new();
        let mut placeholders = PlaceholderMapping::new();
        for entry in parsed.placeholder {
            if entry.token.is_empty() {
                bail!(
                    "invalid asset manifest '{}': placeholder token must not be empty",
                    origin.display()
                );
            }
            if !seen.insert(entry.token.clone()) {
                bail!(
                    "invalid asset manifest '{}': duplicate placeholder token '{}'",
                    origin.display(),
                    entry.token
                );
            }
            placeholders.insert(entry.token, entry.value);
        }

        let assets = parsed
            .asset
            .into_iter()
            .enumerate()
            .map(|(index, entry)| asset_spec(entry, index, origin))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            assets,
            placeholders,
        })
    }
}

fn asset_spec(entry: AssetToml, index: usize, origin: &Path) -> Result<String> {
    match (entry.spec, entry.dest, entry.source) {
        (Some(spec), None, None) => Ok(spec),
        (None, Some(dest), Some(source)) => {
            for (field, value) in [("dest", &dest), ("source", &source)] {
                if value.contains(LIST_SEPARATOR) {
                    bail!(
                        "invalid asset manifest '{}': asset #{} {} '{}' contains the path-list separator '{}'",
                        origin.display(),
                        index + 1,
                        field,
                        value,
                        LIST_SEPARATOR
                    );
                }
            }
            Ok(join_spec(&dest, &source))
        }
        (Some(_), _, _) => bail!(
            "invalid asset manifest '{}': asset #{} sets 'spec' together with 'dest'/'source'",
            origin.display(),
            index + 1
        ),
        _ => bail!(
            "invalid asset manifest '{}': asset #{} needs either 'spec' or both 'dest' and 'source'",
            origin.display(),
            index + 1
        ),
    }
}
