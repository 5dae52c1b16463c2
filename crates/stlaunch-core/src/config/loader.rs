//! Shared environment-variable loading
//!
//! Keeps the primary → alias fallback chain in one place instead of repeating
//! `or_else` chains across the bootstrap code.

use std::env;
use std::path::Path;

/// Parse `.env` content into key/value pairs.
///
/// Blank lines and `#` comments are skipped, surrounding quotes are removed and
/// an inline `#` comment is stripped when the value is unquoted.
pub fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some(eq_pos) = line.find('=') else {
            continue;
        };
        let key = line[..eq_pos].trim();
        let mut value = line[eq_pos + 1..].trim();
        if let Some(hash_pos) = value.find('#') {
            let before_hash = value[..hash_pos].trim_end();
            if !before_hash.contains('"') && !before_hash.contains('\'') {
                value = before_hash;
            }
        }
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            value = &value[1..value.len() - 1];
        }
        if !key.is_empty() {
            pairs.push((key.to_string(), value.to_string()));
        }
    }
    pairs
}

/// Load `<dir>/.env` into the process environment without overriding
/// variables that are already set. Returns the number of variables applied.
///
/// Must run before any thread is spawned.
pub fn load_dotenv_from_dir(dir: &Path) -> usize {
    let Ok(content) = std::fs::read_to_string(dir.join(".env")) else {
        return 0;
    };
    let mut applied = 0;
    for (key, value) in parse_dotenv(&content) {
        if env::var_os(&key).is_none() {
            #[allow(unsafe_code)]
            unsafe {
                env::set_var(&key, &value);
            }
            applied += 1;
        }
    }
    applied
}

/// Load `.env` from the current directory, once per process.
pub fn load_dotenv() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let dir = env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
        let applied = load_dotenv_from_dir(&dir);
        if applied > 0 {
            tracing::debug!(applied, "loaded variables from .env");
        }
    });
}

/// Resolve `primary`, then each alias, through `get`. Blank values count as unset.
pub fn lookup_with<G>(get: &G, primary: &str, aliases: &[&str]) -> Option<String>
where
    G: Fn(&str) -> Option<String>,
{
    std::iter::once(primary)
        .chain(aliases.iter().copied())
        .find_map(|k| get(k))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a boolean flag: 0/false/no/off are false, any other value is true.
pub fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value {
        Some(s) => !matches!(
            s.trim().to_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_dotenv_quotes_and_comments() {
        let content = "# header\nPORT=8501\nSTLAUNCH_APP=\"main.py\"\nexport STLAUNCH_QUIET=1 # quiet\n\nBROKEN\n";
        let pairs = parse_dotenv(content);
        assert_eq!(
            pairs,
            vec![
                ("PORT".to_string(), "8501".to_string()),
                ("STLAUNCH_APP".to_string(), "main.py".to_string()),
                ("STLAUNCH_QUIET".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_dotenv_keeps_hash_inside_quotes() {
        let pairs = parse_dotenv("TOKEN='a#b'\n");
        assert_eq!(pairs, vec![("TOKEN".to_string(), "a#b".to_string())]);
    }

    #[test]
    fn test_lookup_with_alias_fallback() {
        let vars: HashMap<&str, &str> = [("ALIAS_B", "value"), ("BLANK", "  ")].into();
        let get = |k: &str| vars.get(k).map(|v| v.to_string());
        assert_eq!(
            lookup_with(&get, "MISSING", &["ALIAS_A", "ALIAS_B"]),
            Some("value".to_string())
        );
        assert_eq!(lookup_with(&get, "BLANK", &[]), None);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool(Some("1"), false));
        assert!(parse_bool(Some("yes"), false));
        assert!(!parse_bool(Some("off"), true));
        assert!(!parse_bool(Some(" FALSE "), true));
        assert!(parse_bool(None, true));
    }

    #[test]
    fn test_load_dotenv_from_dir_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(load_dotenv_from_dir(tmp.path()), 0);
    }
}
