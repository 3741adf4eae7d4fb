// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use log::{debug, info, warn};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, SystemTime};

use crate::{APP_NAME, DocumentKind, PrintDocument};

const SPOOL_HASH_HEX_LEN: usize = 12;

/// Somewhere a rendered document can be shown to the user for printing.
pub trait PrintSurface {
    /// Presents `document` and returns where it was written. An `Err` means
    /// no surface could be opened.
    fn present(&mut self, document: &PrintDocument) -> Result<PathBuf>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl OpenerCommand {
    /// Splits a configured opener such as `"firefox --new-window"` on
    /// whitespace; the document path is appended as the last argument.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.split_whitespace().map(str::to_owned);
        let program = parts
            .next()
            .ok_or_else(|| anyhow!("print opener is blank -- set [print].opener or remove it"))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn platform_default() -> Self {
        let (program, args): (&str, &[&str]) = if cfg!(target_os = "macos") {
            ("open", &[])
        } else if cfg!(target_os = "windows") {
            ("cmd", &["/C", "start", ""])
        } else {
            ("xdg-open", &[])
        };
        Self {
            program: program.to_owned(),
            args: args.iter().map(|arg| (*arg).to_owned()).collect(),
        }
    }
}

/// Writes documents into a spool directory and hands each file to an
/// external opener (normally the desktop's browser association).
#[derive(Debug, Clone)]
pub struct SpoolSurface {
    dir: PathBuf,
    opener: OpenerCommand,
}

impl SpoolSurface {
    pub fn new(dir: PathBuf, opener: OpenerCommand) -> Self {
        Self { dir, opener }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, document: &PrintDocument) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create spool directory {}", self.dir.display()))?;
        let path = self.dir.join(spool_file_name(document));
        fs::write(&path, &document.html)
            .with_context(|| format!("write spool file {}", path.display()))?;
        debug!("spooled {} to {}", document.kind.label(), path.display());
        Ok(path)
    }
}

impl PrintSurface for SpoolSurface {
    fn present(&mut self, document: &PrintDocument) -> Result<PathBuf> {
        let path = self.write(document)?;
        let spawned = Command::new(&self.opener.program)
            .args(&self.opener.args)
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        let child = match spawned {
            Ok(child) => child,
            Err(error) => {
                warn!(
                    "print opener {} failed for {}: {error}",
                    self.opener.program,
                    path.display()
                );
                bail!(
                    "cannot open print window with {:?}: {error} -- document saved at {}; set [print].opener to a working program",
                    self.opener.program,
                    path.display()
                );
            }
        };
        reap_opener(child, self.opener.program.clone());
        info!(
            "opened {} for quote {} via {}",
            document.kind.label(),
            document.quote_id,
            self.opener.program
        );
        Ok(path)
    }
}

// Waits off the UI thread so a finished opener is not left as a zombie.
fn reap_opener(mut child: Child, program: String) {
    thread::spawn(move || match child.wait() {
        Ok(status) if !status.success() => {
            warn!("print opener {program} exited with {status}");
        }
        Ok(_) => {}
        Err(error) => warn!("cannot wait for print opener {program}: {error}"),
    });
}

/// Content-addressed name so reprinting identical output reuses one file.
pub fn spool_file_name(document: &PrintDocument) -> String {
    let digest = Sha256::digest(document.html.as_bytes());
    let hex = digest
        .iter()
        .take(SPOOL_HASH_HEX_LEN / 2)
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>();
    format!(
        "{}-{}-{hex}.html",
        document.kind.as_str(),
        document.quote_id
    )
}

/// True for names produced by [`spool_file_name`]: `{kind}-{id}-{12 hex}.html`.
pub fn is_spool_file_name(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(".html") else {
        return false;
    };
    let Some(rest) = DocumentKind::ALL
        .iter()
        .find_map(|kind| stem.strip_prefix(kind.as_str())?.strip_prefix('-'))
    else {
        return false;
    };
    let Some((id, hex)) = rest.split_once('-') else {
        return false;
    };
    !id.is_empty()
        && id.bytes().all(|byte| byte.is_ascii_digit())
        && hex.len() == SPOOL_HASH_HEX_LEN
        && hex
            .bytes()
            .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte))
}

pub fn default_spool_dir() -> Result<PathBuf> {
    let cache_root = dirs::cache_dir().ok_or_else(|| {
        anyhow!("cannot resolve cache directory; set [print].spool_dir in the config file")
    })?;
    Ok(cache_root.join(APP_NAME).join("print"))
}

pub fn evict_stale_spool(dir: &Path, ttl_days: i64) -> Result<usize> {
    if ttl_days <= 0 {
        return Ok(0);
    }
    if !dir.exists() {
        return Ok(0);
    }

    let ttl_secs = u64::try_from(ttl_days)
        .ok()
        .and_then(|days| days.checked_mul(24 * 60 * 60))
        .ok_or_else(|| anyhow!("ttl_days is too large: {ttl_days}"))?;
    let ttl = Duration::from_secs(ttl_secs);
    let now = SystemTime::now();

    let mut removed = 0usize;
    for entry in fs::read_dir(dir).with_context(|| format!("read spool dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        let owned = entry
            .file_name()
            .to_str()
            .is_some_and(is_spool_file_name);
        if !owned {
            continue;
        }
        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(_) => continue,
        };
        if metadata.is_dir() {
            continue;
        }
        let modified = match metadata.modified() {
            Ok(modified) => modified,
            Err(_) => continue,
        };
        if now.duration_since(modified).unwrap_or(Duration::ZERO) > ttl
            && fs::remove_file(&path).is_ok()
        {
            removed += 1;
        }
    }

    if removed > 0 {
        info!("evicted {removed} stale spool files from {}", dir.display());
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::{OpenerCommand, is_spool_file_name, spool_file_name};
    use crate::{DocumentKind, PrintDocument};
    use marea_app::QuoteId;

    fn document(html: &str) -> PrintDocument {
        PrintDocument {
            kind: DocumentKind::WorkOrder,
            quote_id: QuoteId::new(12),
            title: "t".to_owned(),
            html: html.to_owned(),
        }
    }

    #[test]
    fn opener_parse_splits_program_and_args() -> anyhow::Result<()> {
        let opener = OpenerCommand::parse("  firefox --new-window ")?;
        assert_eq!(opener.program, "firefox");
        assert_eq!(opener.args, vec!["--new-window".to_owned()]);
        Ok(())
    }

    #[test]
    fn opener_parse_rejects_blank() {
        let error = OpenerCommand::parse("   ").expect_err("blank opener should fail");
        assert!(error.to_string().contains("print opener is blank"));
    }

    #[test]
    fn spool_name_is_stable_per_content() {
        let first = spool_file_name(&document("<html>a</html>"));
        let again = spool_file_name(&document("<html>a</html>"));
        let other = spool_file_name(&document("<html>b</html>"));

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert!(first.starts_with("work-order-12-"));
        assert!(first.ends_with(".html"));
    }

    #[test]
    fn only_generated_names_count_as_spool_files() {
        assert!(is_spool_file_name(&spool_file_name(&document("<p>x</p>"))));
        assert!(is_spool_file_name("client-quote-3-0123456789ab.html"));

        for foreign in [
            "report.html",
            "family-recipes.html",
            "work-order-notes.html",
            "work-order-3-0123456789ab.htm",
            "work-order--0123456789ab.html",
            "work-order-3-0123456789AB.html",
            "work-order-3-0123456789abc.html",
            "client-quote-x-0123456789ab.html",
            "invoice-3-0123456789ab.html",
        ] {
            assert!(!is_spool_file_name(foreign), "{foreign} treated as spool file");
        }
    }

    #[test]
    fn platform_default_has_a_program() {
        assert!(!OpenerCommand::platform_default().program.is_empty());
    }
}
