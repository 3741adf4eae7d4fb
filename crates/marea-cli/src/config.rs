// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use log::LevelFilter;
use marea_print::{
    APP_NAME, DEFAULT_COMPANY_NAME, DEFAULT_PHONE, DEFAULT_TAGLINE, DEFAULT_TAX_RATE_PERCENT,
    DEFAULT_VALIDITY_DAYS, OpenerCommand, ShopProfile,
};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: i64 = 1;
const DEFAULT_SPOOL_TTL_DAYS: i64 = 7;
const DEFAULT_LOG_LEVEL: &str = "info";

pub const CONFIG_PATH_ENV: &str = "MAREA_CONFIG_PATH";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub company: Company,
    #[serde(default)]
    pub quote: QuoteTerms,
    #[serde(default)]
    pub print: Print,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            company: Company::default(),
            quote: QuoteTerms::default(),
            print: Print::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Company {
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteTerms {
    pub tax_rate_percent: Option<i64>,
    pub validity_days: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Print {
    pub spool_dir: Option<String>,
    pub opener: Option<String>,
    pub spool_ttl_days: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version -- add `version = 1` at the top",
                    path.display()
                )
            })?;
        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {} -- expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(rate) = self.quote.tax_rate_percent
            && !(0..=100).contains(&rate)
        {
            bail!(
                "quote.tax_rate_percent in {} must be between 0 and 100, got {}",
                path.display(),
                rate
            );
        }

        if let Some(days) = self.quote.validity_days
            && (days <= 0 || u32::try_from(days).is_err())
        {
            bail!(
                "quote.validity_days in {} must be positive, got {}",
                path.display(),
                days
            );
        }

        if let Some(ttl_days) = self.print.spool_ttl_days
            && ttl_days < 0
        {
            bail!(
                "print.spool_ttl_days in {} must be non-negative, got {}",
                path.display(),
                ttl_days
            );
        }

        if let Some(opener) = &self.print.opener {
            OpenerCommand::parse(opener)
                .with_context(|| format!("invalid print.opener in {}", path.display()))?;
        }

        if let Some(level) = &self.log.level {
            parse_level(level)
                .with_context(|| format!("invalid log.level in {}", path.display()))?;
        }

        Ok(())
    }

    pub fn shop_profile(&self) -> ShopProfile {
        ShopProfile {
            name: self
                .company
                .name
                .clone()
                .unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_owned()),
            tagline: self
                .company
                .tagline
                .clone()
                .unwrap_or_else(|| DEFAULT_TAGLINE.to_owned()),
            phone: self
                .company
                .phone
                .clone()
                .unwrap_or_else(|| DEFAULT_PHONE.to_owned()),
            tax_rate_percent: self
                .quote
                .tax_rate_percent
                .and_then(|rate| u32::try_from(rate).ok())
                .unwrap_or(DEFAULT_TAX_RATE_PERCENT),
            validity_days: self
                .quote
                .validity_days
                .and_then(|days| u32::try_from(days).ok())
                .unwrap_or(DEFAULT_VALIDITY_DAYS),
        }
    }

    pub fn spool_dir(&self) -> Result<PathBuf> {
        match &self.print.spool_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => marea_print::default_spool_dir(),
        }
    }

    pub fn spool_ttl_days(&self) -> i64 {
        self.print.spool_ttl_days.unwrap_or(DEFAULT_SPOOL_TTL_DAYS)
    }

    pub fn opener(&self) -> Result<OpenerCommand> {
        match &self.print.opener {
            Some(raw) => OpenerCommand::parse(raw),
            None => Ok(OpenerCommand::platform_default()),
        }
    }

    pub fn log_level(&self) -> Result<LevelFilter> {
        parse_level(self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL))
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        if let Some(file) = &self.log.file {
            return Ok(PathBuf::from(file));
        }
        let data_root = dirs::data_local_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [log].file in the config file")
        })?;
        Ok(data_root.join(APP_NAME).join(format!("{APP_NAME}.log")))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# marea config\n# Place this file at: {}\n\nversion = 1\n\n[company]\nname = \"{}\"\ntagline = \"{}\"\nphone = \"{}\"\n\n[quote]\ntax_rate_percent = {}\nvalidity_days = {}\n\n[print]\n# Optional. Default is the platform cache dir (for example ~/.cache/marea/print)\n# spool_dir = \"/absolute/path/to/spool\"\n# Optional. Default is xdg-open, open, or cmd /C start depending on platform\n# opener = \"firefox --new-window\"\nspool_ttl_days = {}\n\n[log]\n# off, error, warn, info, debug or trace; RUST_LOG overrides\nlevel = \"{}\"\n# file = \"/absolute/path/to/marea.log\"\n",
            path.display(),
            DEFAULT_COMPANY_NAME,
            DEFAULT_TAGLINE,
            DEFAULT_PHONE,
            DEFAULT_TAX_RATE_PERCENT,
            DEFAULT_VALIDITY_DAYS,
            DEFAULT_SPOOL_TTL_DAYS,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn parse_level(raw: &str) -> Result<LevelFilter> {
    raw.trim().parse::<LevelFilter>().map_err(|_| {
        anyhow!("unknown log level {raw:?} -- use off, error, warn, info, debug, or trace")
    })
}

#[cfg(test)]
mod tests {
    use super::{CONFIG_PATH_ENV, Config, parse_level};
    use anyhow::Result;
    use log::LevelFilter;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.shop_profile(), marea_print::ShopProfile::default());
        assert_eq!(config.spool_ttl_days(), 7);
        assert_eq!(config.log_level()?, LevelFilter::Info);
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[company]\nname = \"Olas\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        assert!(error.to_string().contains("add `version = 1`"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn full_config_overrides_shop_profile_and_print() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[company]\nname = \"Olas del Norte\"\nphone = \"555-0101\"\n[quote]\ntax_rate_percent = 8\nvalidity_days = 30\n[print]\nspool_dir = \"/srv/marea/spool\"\nopener = \"firefox --new-window\"\nspool_ttl_days = 0\n[log]\nlevel = \"debug\"\nfile = \"/var/log/marea.log\"\n",
        )?;
        let config = Config::load(&path)?;

        let shop = config.shop_profile();
        assert_eq!(shop.name, "Olas del Norte");
        assert_eq!(shop.phone, "555-0101");
        assert_eq!(shop.tagline, marea_print::DEFAULT_TAGLINE);
        assert_eq!(shop.tax_rate_percent, 8);
        assert_eq!(shop.validity_days, 30);

        assert_eq!(config.spool_dir()?, PathBuf::from("/srv/marea/spool"));
        assert_eq!(config.spool_ttl_days(), 0);
        let opener = config.opener()?;
        assert_eq!(opener.program, "firefox");
        assert_eq!(opener.args, vec!["--new-window".to_owned()]);
        assert_eq!(config.log_level()?, LevelFilter::Debug);
        assert_eq!(config.log_file()?, PathBuf::from("/var/log/marea.log"));
        Ok(())
    }

    #[test]
    fn out_of_range_terms_are_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[quote]\ntax_rate_percent = 120\n")?;
        let error = Config::load(&path).expect_err("tax over 100 should fail");
        assert!(error.to_string().contains("between 0 and 100"));

        let (_temp, path) = write_config("version = 1\n[quote]\nvalidity_days = 0\n")?;
        let error = Config::load(&path).expect_err("zero validity should fail");
        assert!(error.to_string().contains("must be positive"));

        let (_temp, path) = write_config("version = 1\n[print]\nspool_ttl_days = -1\n")?;
        let error = Config::load(&path).expect_err("negative ttl should fail");
        assert!(error.to_string().contains("must be non-negative"));
        Ok(())
    }

    #[test]
    fn blank_opener_and_bad_level_are_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[print]\nopener = \"  \"\n")?;
        let error = Config::load(&path).expect_err("blank opener should fail");
        assert!(format!("{error:#}").contains("print opener is blank"));

        let (_temp, path) = write_config("version = 1\n[log]\nlevel = \"loud\"\n")?;
        let error = Config::load(&path).expect_err("unknown level should fail");
        assert!(format!("{error:#}").contains("unknown log level"));
        Ok(())
    }

    #[test]
    fn level_parsing_is_case_insensitive() -> Result<()> {
        assert_eq!(parse_level("WARN")?, LevelFilter::Warn);
        assert_eq!(parse_level("off")?, LevelFilter::Off);
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_uses_config_toml_suffix_when_no_env_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("marea/config.toml"), "got {}", path.display());
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_load() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        for section in ["[company]", "[quote]", "[print]", "[log]"] {
            assert!(example.contains(section), "missing {section}");
        }

        std::fs::write(&path, example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.shop_profile(), marea_print::ShopProfile::default());
        Ok(())
    }
}
