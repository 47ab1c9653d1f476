use crate::mirror::error::MirrorError;

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_RAW_URL: &str = "https://raw.githubusercontent.com";

#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub api_url: String,
    /// Host serving raw file contents, used to build public image URLs.
    pub raw_url: String,
}

impl GitHubConfig {
    pub fn from_env() -> Result<Self, MirrorError> {
        dotenvy::dotenv().ok();

        let token = required("GITHUB_TOKEN")?;
        let owner = required("GITHUB_OWNER")?;
        let repo = required("GITHUB_REPO")?;

        let branch = optional("GITHUB_BRANCH", DEFAULT_BRANCH);
        let api_url = optional("GITHUB_API_URL", DEFAULT_API_URL);
        let raw_url = optional("GITHUB_RAW_URL", DEFAULT_RAW_URL);

        Ok(Self {
            token,
            owner,
            repo,
            branch,
            api_url,
            raw_url,
        })
    }

    pub fn new(token: String, owner: String, repo: String) -> Self {
        Self {
            token,
            owner,
            repo,
            branch: DEFAULT_BRANCH.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            raw_url: DEFAULT_RAW_URL.to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_raw_url(mut self, raw_url: impl Into<String>) -> Self {
        self.raw_url = raw_url.into();
        self
    }
}

fn required(key: &str) -> Result<String, MirrorError> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| MirrorError::Config(format!("{key} not set")))
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .map(|value| value.trim_end_matches('/').to_string())
        .unwrap_or_else(|| default.to_string())
}
