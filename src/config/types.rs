use serde::Deserialize;

/// Default number of links per batch group
pub const DEFAULT_GROUP_SIZE: i64 = 1000;

/// Default advisory threshold for page content length, in characters
pub const DEFAULT_MIN_CONTENT_LENGTH: usize = 10;

/// Default number of in-flight fetches per batch group
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 16;

/// Default directory for the text log
pub const DEFAULT_OUTPUT_DIR: &str = "./scraper_results";

/// Main configuration structure for Gleaner
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Batching and extraction behavior
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Maximum number of links dispatched together as one group
    #[serde(rename = "group-size", default = "default_group_size")]
    pub group_size: i64,

    /// Pages shorter than this are accepted with an advisory
    #[serde(rename = "min-content-length", default = "default_min_content_length")]
    pub min_content_length: usize,

    /// Maximum number of concurrent fetches within one group
    #[serde(
        rename = "max-concurrent-fetches",
        default = "default_max_concurrent_fetches"
    )]
    pub max_concurrent_fetches: usize,

    /// Keep stored pages across runs instead of starting each run empty
    #[serde(rename = "retain-results", default)]
    pub retain_results: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            group_size: DEFAULT_GROUP_SIZE,
            min_content_length: DEFAULT_MIN_CONTENT_LENGTH,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            retain_results: false,
        }
    }
}

/// Text log configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Whether accepted pages are appended to a text log
    #[serde(rename = "log-enabled", default)]
    pub log_enabled: bool,

    /// Directory where timestamped log files are created
    #[serde(rename = "output-dir", default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_enabled: false,
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email", default)]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: String::new(),
            contact_email: String::new(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the user agent header: `Name/Version (+ContactURL; ContactEmail)`
    ///
    /// The parenthesised part is omitted when no contact details are configured.
    pub fn user_agent_string(&self) -> String {
        let contacts: Vec<&str> = [self.contact_url.as_str(), self.contact_email.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();

        if contacts.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} (+{})",
                self.crawler_name,
                self.crawler_version,
                contacts.join("; ")
            )
        }
    }
}

fn default_group_size() -> i64 {
    DEFAULT_GROUP_SIZE
}

fn default_min_content_length() -> usize {
    DEFAULT_MIN_CONTENT_LENGTH
}

fn default_max_concurrent_fetches() -> usize {
    DEFAULT_MAX_CONCURRENT_FETCHES
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

fn default_crawler_name() -> String {
    "Gleaner".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_with_contacts() {
        let ua = UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        };
        assert_eq!(
            ua.user_agent_string(),
            "TestBot/1.0 (+https://example.com/about; admin@example.com)"
        );
    }

    #[test]
    fn test_user_agent_without_contacts() {
        let ua = UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: String::new(),
            contact_email: String::new(),
        };
        assert_eq!(ua.user_agent_string(), "TestBot/1.0");
    }
}
