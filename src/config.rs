use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Deserialize, Debug, Clone)]
pub struct Paths {
    pub content_dir: PathBuf,
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,
    #[serde(default = "default_posts_dir")]
    pub posts_dir: String,
    pub template_dir: Option<PathBuf>,
}

fn default_manifest_file() -> String {
    "posts.json".to_string()
}

fn default_posts_dir() -> String {
    "posts".to_string()
}

#[derive(Deserialize, Debug, Clone)]
pub struct Defaults {
    #[serde(default = "default_site_title")]
    pub site_title: String,
    #[serde(default)]
    pub rendering_cache_enabled: bool,
    pub cache_ttl_secs: Option<i64>,
}

fn default_site_title() -> String {
    "Archive".to_string()
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            site_title: default_site_title(),
            rendering_cache_enabled: false,
            cache_ttl_secs: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub paths: Paths,
    #[serde(default)]
    pub defaults: Defaults,
    pub server: Server,
    pub log: Option<Log>,
}

fn parse_path(path: PathBuf) -> PathBuf {
    if !path.starts_with("${exe_dir}") {
        return path;
    }

    let exe_dir = match env::current_exe() {
        Ok(exe) => exe.parent().map(Path::to_path_buf),
        Err(_) => None,
    };
    match exe_dir {
        Some(exe_dir) => {
            let str_path = path.to_string_lossy();
            PathBuf::from(str_path.replace("${exe_dir}", &exe_dir.to_string_lossy()))
        }
        None => path,
    }
}

pub fn parse_config(cfg_content: &str) -> Result<Config, ConfigError> {
    let mut cfg: Config = toml::from_str::<Config>(cfg_content)?;

    cfg.paths.content_dir = parse_path(cfg.paths.content_dir);
    cfg.paths.template_dir = cfg.paths.template_dir.map(parse_path);

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> Result<Config, ConfigError> {
    let cfg_content = fs::read_to_string(cfg_path)
        .map_err(|e| ConfigError::Io(cfg_path.to_path_buf(), e))?;
    parse_config(&cfg_content)
}
