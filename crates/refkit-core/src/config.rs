use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, pagination::types::Controls, Result};

pub const DEFAULT_PAGINATION_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_COMPONENT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_FOOTER_TEMPLATE: &str = "Page {page}/{max_pages}";

/// Typed configuration for refkit hosts.
#[derive(Clone, Debug)]
pub struct Config {
    // Pagination
    pub pagination_timeout: Duration,
    pub component_timeout: Duration,
    pub page_size: usize,
    pub footer_template: String,
    pub controls: Controls,

    // Host
    pub snapshot_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pagination_timeout: DEFAULT_PAGINATION_TIMEOUT,
            component_timeout: DEFAULT_COMPONENT_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
            footer_template: DEFAULT_FOOTER_TEMPLATE.to_string(),
            controls: Controls::default(),
            snapshot_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_with_dotenv(Path::new(".env"))
    }

    fn load_with_dotenv(dotenv: &Path) -> Result<Self> {
        load_dotenv_if_present(dotenv);

        let pagination_timeout = env_u64("REFKIT_PAGINATION_TIMEOUT_MS")
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_PAGINATION_TIMEOUT);
        let component_timeout = env_u64("REFKIT_COMPONENT_TIMEOUT_MS")
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_COMPONENT_TIMEOUT);

        let page_size = env_usize("REFKIT_PAGE_SIZE").unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(Error::Config(
                "REFKIT_PAGE_SIZE must be at least 1".to_string(),
            ));
        }

        let footer_template = env_str("REFKIT_FOOTER_TEMPLATE")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_FOOTER_TEMPLATE.to_string());

        let controls = match env_str("REFKIT_CONTROL_IDS").and_then(non_empty) {
            Some(csv) => Controls::from_ids(parse_csv(&csv).as_slice())
                .map_err(|e| Error::Config(format!("REFKIT_CONTROL_IDS: {e}")))?,
            None => Controls::default(),
        };

        let snapshot_path = env_path("REFKIT_SNAPSHOT");

        Ok(Self {
            pagination_timeout,
            component_timeout,
            page_size,
            footer_template,
            controls,
            snapshot_path,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() || env::var_os(key).is_some() {
            continue;
        }

        let mut val = v.trim().to_string();
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn parse_csv(v: &str) -> Vec<String> {
    v.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert_eq!(cfg.pagination_timeout, Duration::from_secs(120));
        assert_eq!(cfg.component_timeout, Duration::from_secs(60));
        assert_eq!(cfg.page_size, 10);
        assert_eq!(cfg.controls.previous, "previous");
        assert_eq!(cfg.controls.stop, "stop");
        assert_eq!(cfg.controls.next, "next");
    }

    #[test]
    fn csv_skips_blanks() {
        assert_eq!(parse_csv(" a, ,b ,c"), vec!["a", "b", "c"]);
    }

    // Tests below mutate process-wide env vars.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const KEYS: [&str; 6] = [
        "REFKIT_PAGINATION_TIMEOUT_MS",
        "REFKIT_COMPONENT_TIMEOUT_MS",
        "REFKIT_PAGE_SIZE",
        "REFKIT_FOOTER_TEMPLATE",
        "REFKIT_SNAPSHOT",
        "REFKIT_CONTROL_IDS",
    ];

    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for key in KEYS {
            env::remove_var(key);
        }
        for (key, val) in vars {
            env::set_var(key, val);
        }
        let out = f();
        for key in KEYS {
            env::remove_var(key);
        }
        out
    }

    fn no_dotenv() -> PathBuf {
        env::temp_dir().join("refkit-config-missing.env")
    }

    #[test]
    fn load_without_env_uses_defaults() {
        let missing = no_dotenv();
        let cfg = with_env(&[], || Config::load_with_dotenv(&missing)).unwrap();
        assert_eq!(cfg.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(cfg.footer_template, DEFAULT_FOOTER_TEMPLATE);
        assert!(cfg.snapshot_path.is_none());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let missing = no_dotenv();
        let res = with_env(&[("REFKIT_PAGE_SIZE", "0")], || {
            Config::load_with_dotenv(&missing)
        });
        assert!(matches!(res, Err(Error::Config(_))));
    }

    #[test]
    fn control_ids_need_three_distinct_values() {
        let missing = no_dotenv();
        for bad in ["back,close", "a,b,c,d", "back,back,fwd"] {
            let res = with_env(&[("REFKIT_CONTROL_IDS", bad)], || {
                Config::load_with_dotenv(&missing)
            });
            assert!(matches!(res, Err(Error::Config(_))), "accepted {bad}");
        }

        let cfg = with_env(&[("REFKIT_CONTROL_IDS", " back, close ,fwd")], || {
            Config::load_with_dotenv(&missing)
        })
        .unwrap();
        assert_eq!(cfg.controls.ids(), ["back", "close", "fwd"]);
    }

    #[test]
    fn dotenv_fills_gaps_without_overriding() {
        let path = env::temp_dir().join(format!("refkit-config-{}.env", std::process::id()));
        fs::write(
            &path,
            "# local overrides\n\
             REFKIT_PAGE_SIZE=7\n\
             REFKIT_FOOTER_TEMPLATE=\"{page} of {max_pages}\"\n\
             REFKIT_COMPONENT_TIMEOUT_MS=1500\n",
        )
        .unwrap();

        let cfg = with_env(&[("REFKIT_PAGE_SIZE", "3")], || {
            Config::load_with_dotenv(&path)
        });
        let _ = fs::remove_file(&path);
        let cfg = cfg.unwrap();

        assert_eq!(cfg.page_size, 3);
        assert_eq!(cfg.footer_template, "{page} of {max_pages}");
        assert_eq!(cfg.component_timeout, Duration::from_millis(1500));
    }
}
