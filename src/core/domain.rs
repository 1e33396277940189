use serde::{Deserialize, Serialize};

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable : Sync + Send {
    fn id(&self) -> String;
    fn version(&self) -> i64;
}

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 500;
pub const MAX_COMMENT_LENGTH: usize = 2000;

// Configuration abstracts config options for the sharing service
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub stage: String,
    pub default_page_size: usize,
    pub max_page_size: usize,
    // treat offsets as multiples of the page size, as older clients expect
    pub page_rounding: bool,
    pub max_comment_length: usize,
}

impl Configuration {
    pub fn new(stage: &str) -> Self {
        Configuration {
            stage: stage.to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            page_rounding: false,
            max_comment_length: MAX_COMMENT_LENGTH,
        }
    }

    pub fn from_env() -> Self {
        let stage = std::env::var("SHAREIT_STAGE").unwrap_or_else(|_| "dev".to_string());
        let mut config = Configuration::new(stage.as_str());
        if let Ok(rounding) = std::env::var("SHAREIT_PAGE_ROUNDING") {
            config.page_rounding = matches!(rounding.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(max) = std::env::var("SHAREIT_MAX_PAGE_SIZE").ok().and_then(|s| s.parse::<usize>().ok()) {
            if max > 0 {
                config.max_page_size = max;
            }
        }
        config
    }

    pub fn with_page_rounding(mut self, page_rounding: bool) -> Self {
        self.page_rounding = page_rounding;
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::core::domain::Configuration;

    #[tokio::test]
    async fn test_should_build_config() {
        let config = Configuration::new("test");
        assert_eq!("test", config.stage.as_str());
        assert_eq!(10, config.default_page_size);
        assert_eq!(500, config.max_page_size);
        assert_eq!(2000, config.max_comment_length);
        assert!(!config.page_rounding);
        assert!(config.with_page_rounding(true).page_rounding);
    }
}
