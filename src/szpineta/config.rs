use crate::card::CardStyle;
use crate::error::{Result, SiteError};
use crate::markup::Indentation;
use crate::store::github::GitHubTarget;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "szpineta.json";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ADMIN_PASS: &str = "changeme";
const DEFAULT_ASSET_URL: &str =
    "https://github.com/yoobzz/lawenda/releases/download/v1.0/lawendamodel.stl";

/// Site configuration, stored in `<site root>/szpineta.json` and overridable
/// through environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default = "default_listing")]
    pub listing: DocumentConfig,

    #[serde(default = "default_summary")]
    pub summary: DocumentConfig,

    /// Font used for story cards; relative paths resolve against the site root.
    #[serde(default)]
    pub card_font: Option<PathBuf>,

    #[serde(default)]
    pub card: CardStyle,

    /// Release asset proxied by `/api/lawendamodel`.
    #[serde(default = "default_asset_url")]
    pub asset_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminConfig {
    #[serde(default = "default_admin_user")]
    pub user: String,
    #[serde(default = "default_admin_pass")]
    pub pass: String,
    /// Bearer token for the remote publishing endpoint.
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubConfig {
    #[serde(default)]
    pub token: Option<String>,
    /// `owner/repo`
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Where a document lives and how entries are laid out inside it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentConfig {
    pub path: String,
    /// Container ids tried in order.
    pub containers: Vec<String>,
    pub block_indent: usize,
    pub text_indent: usize,
    /// Whether the title comment is written above the entry.
    #[serde(default)]
    pub title_comment: bool,
}

impl DocumentConfig {
    pub fn indentation(&self) -> Indentation {
        Indentation::spaces(self.block_indent, self.text_indent)
    }

    pub fn container_list(&self) -> String {
        self.containers
            .iter()
            .map(|c| format!("#{c}"))
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_admin_user() -> String {
    "admin".to_string()
}

fn default_admin_pass() -> String {
    DEFAULT_ADMIN_PASS.to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_asset_url() -> String {
    DEFAULT_ASSET_URL.to_string()
}

fn default_listing() -> DocumentConfig {
    DocumentConfig {
        path: "poems.html".to_string(),
        containers: vec!["poemsMount".to_string(), "poemsSection".to_string()],
        block_indent: 12,
        text_indent: 16,
        title_comment: true,
    }
}

fn default_summary() -> DocumentConfig {
    DocumentConfig {
        path: "index.html".to_string(),
        containers: vec!["poemsSection".to_string()],
        block_indent: 8,
        text_indent: 12,
        title_comment: false,
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            user: default_admin_user(),
            pass: default_admin_pass(),
            token: None,
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            repo: None,
            branch: default_branch(),
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            admin: AdminConfig::default(),
            github: GitHubConfig::default(),
            listing: default_listing(),
            summary: default_summary(),
            card_font: None,
            card: CardStyle::default(),
            asset_url: default_asset_url(),
        }
    }
}

impl SiteConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(SiteError::Io)?;
        let config: SiteConfig =
            serde_json::from_str(&content).map_err(SiteError::Serialization)?;
        config.card.validate()?;
        Ok(config)
    }

    /// Applies `PORT`, `ADMIN_*`, `GITHUB_*` and `CARD_FONT` overrides.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = non_empty("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| SiteError::Configuration(format!("Invalid PORT: {port}")))?;
        }
        if let Some(user) = non_empty("ADMIN_USER") {
            self.admin.user = user;
        }
        if let Some(pass) = non_empty("ADMIN_PASS") {
            self.admin.pass = pass;
        }
        if let Some(token) = non_empty("ADMIN_TOKEN") {
            self.admin.token = Some(token);
        }
        if let Some(token) = non_empty("GITHUB_TOKEN") {
            self.github.token = Some(token);
        }
        if let Some(repo) = non_empty("GITHUB_REPO") {
            self.github.repo = Some(repo);
        }
        if let Some(branch) = non_empty("GITHUB_BRANCH") {
            self.github.branch = branch;
        }
        if let Some(font) = non_empty("CARD_FONT") {
            self.card_font = Some(PathBuf::from(font));
        }
        Ok(())
    }

    /// Loads `szpineta.json` from the site root and applies process env overrides.
    pub fn for_site<P: AsRef<Path>>(site_root: P) -> Result<Self> {
        let mut config = Self::load(site_root)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn uses_default_password(&self) -> bool {
        self.admin.pass == DEFAULT_ADMIN_PASS
    }

    /// Repository coordinates for the remote publishing endpoint.
    pub fn github_target(&self) -> Result<GitHubTarget> {
        let not_configured = || SiteError::Configuration("GitHub env not configured".to_string());

        let token = self.github.token.clone().ok_or_else(not_configured)?;
        let repo = self.github.repo.as_deref().ok_or_else(not_configured)?;
        let (owner, name) = repo.split_once('/').ok_or_else(not_configured)?;
        if owner.is_empty() || name.is_empty() {
            return Err(not_configured());
        }

        Ok(GitHubTarget {
            api_base: self.github.api_base.clone(),
            token,
            owner: owner.to_string(),
            repo: name.to_string(),
            branch: self.github.branch.clone(),
            listing_path: self.listing.path.clone(),
            summary_path: self.summary.path.clone(),
            timeout: Duration::from_secs(self.github.timeout_secs),
        })
    }

    pub fn card_font_path(&self, site_root: &Path) -> Option<PathBuf> {
        self.card_font.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                site_root.join(p)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.admin.user, "admin");
        assert!(config.uses_default_password());
        assert_eq!(config.listing.containers, vec!["poemsMount", "poemsSection"]);
        assert_eq!(config.summary.indentation(), Indentation::spaces(8, 12));
        assert!(config.listing.title_comment);
        assert!(!config.summary.title_comment);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig::load(dir.path()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn test_load_nested_sections() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{"port": 8080, "github": {"repo": "yoobzz/szpineta"}, "card": {"min_font": 30}}"#,
        )
        .unwrap();

        let loaded = SiteConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.port, 8080);
        assert_eq!(loaded.github.repo.as_deref(), Some("yoobzz/szpineta"));
        assert_eq!(loaded.github.api_base, "https://api.github.com");
        assert_eq!(loaded.card.min_font, 30.0);
        assert_eq!(loaded.card.max_font, 44.0);
    }

    #[test]
    fn test_unusable_card_geometry_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{"card": {"pad_x": 4000000000}}"#,
        )
        .unwrap();

        let err = SiteConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, SiteError::Configuration(_)));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"port": 4000}"#).unwrap();

        let loaded = SiteConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.port, 4000);
        assert_eq!(loaded.listing.path, "poems.html");
        assert_eq!(loaded.github.branch, "main");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SiteConfig::default();
        config
            .apply_env(env(&[
                ("PORT", "5000"),
                ("ADMIN_USER", "stas"),
                ("ADMIN_PASS", "tajne"),
                ("ADMIN_TOKEN", "tok"),
                ("GITHUB_BRANCH", "   "),
            ]))
            .unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.admin.user, "stas");
        assert!(!config.uses_default_password());
        assert_eq!(config.admin.token.as_deref(), Some("tok"));
        assert_eq!(config.github.branch, "main");
    }

    #[test]
    fn test_invalid_port_is_configuration_error() {
        let mut config = SiteConfig::default();
        let err = config.apply_env(env(&[("PORT", "abc")])).unwrap_err();
        assert!(matches!(err, SiteError::Configuration(_)));
    }

    #[test]
    fn test_github_target_requires_token_and_repo() {
        let mut config = SiteConfig::default();
        assert!(matches!(
            config.github_target(),
            Err(SiteError::Configuration(_))
        ));

        config
            .apply_env(env(&[("GITHUB_TOKEN", "t"), ("GITHUB_REPO", "noslash")]))
            .unwrap();
        assert!(config.github_target().is_err());

        config.github.repo = Some("yoobzz/szpineta".into());
        let target = config.github_target().unwrap();
        assert_eq!(target.owner, "yoobzz");
        assert_eq!(target.repo, "szpineta");
        assert_eq!(target.branch, "main");
        assert_eq!(target.listing_path, "poems.html");
    }

    #[test]
    fn test_relative_font_resolves_against_site() {
        let mut config = SiteConfig::default();
        config.card_font = Some(PathBuf::from("fonts/card.ttf"));
        assert_eq!(
            config.card_font_path(Path::new("/srv/site")),
            Some(PathBuf::from("/srv/site/fonts/card.ttf"))
        );
    }
}
