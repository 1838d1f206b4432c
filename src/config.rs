use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use log::info;

use crate::catalog::CatalogSource;
use crate::models::Site;

pub const DEFAULT_API: &str = "https://damp-wind-8900.darshgb.workers.dev";

/// Where ratings and comments come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    Remote,
    Local,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remote" => Ok(Mode::Remote),
            "local" => Ok(Mode::Local),
            unknown => Err(anyhow::anyhow!("unknown mode {:?}", unknown)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mode: Mode,
    pub api: String,
    pub catalog: CatalogSource,
    pub data_dir: PathBuf,
    pub site: Site,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let site = Site::default();

        Ok(Self {
            mode: try_load(&lookup, "SHOWCASE_MODE", "remote")?,
            api: try_load(&lookup, "SHOWCASE_API", DEFAULT_API)?,
            catalog: CatalogSource::parse(&try_load::<String>(
                &lookup,
                "SHOWCASE_CATALOG",
                "./books.json",
            )?),
            data_dir: try_load(&lookup, "SHOWCASE_DATA_DIR", ".showcase")?,
            site: Site {
                title: try_load(&lookup, "SHOWCASE_TITLE", &site.title)?,
                subtitle: try_load(&lookup, "SHOWCASE_SUBTITLE", &site.subtitle)?,
                author: try_load(&lookup, "SHOWCASE_AUTHOR", &site.author)?,
            },
        })
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("store.json")
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> anyhow::Result<T>
where
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("invalid {key}"))
}
