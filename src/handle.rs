use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
    #[error("handle is required")]
    Empty,
}

/// A normalized profile handle, optionally qualified with a federated instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle {
    pub username: String,
    pub instance: Option<String>,
}

impl Handle {
    pub fn parse(raw: &str) -> Result<Self, HandleError> {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            return Err(HandleError::Empty);
        }

        let (username, instance) = match normalized.split_once('@') {
            Some((user, domain)) => {
                let domain = domain.trim().trim_end_matches('/');
                let instance = if domain.is_empty() {
                    None
                } else {
                    Some(domain.to_string())
                };
                (user.trim().to_string(), instance)
            }
            None => (normalized, None),
        };

        if username.is_empty() {
            return Err(HandleError::Empty);
        }

        Ok(Self { username, instance })
    }

    pub fn is_federated(&self) -> bool {
        self.instance.is_some()
    }

    /// Key used for the stats cache and for demo stats.
    pub fn cache_key(&self) -> String {
        self.to_string().to_lowercase()
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.instance {
            Some(instance) => write!(f, "{}@{}", self.username, instance),
            None => write!(f, "{}", self.username),
        }
    }
}

/// Trims surrounding whitespace and strips exactly one leading `@`.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('@')
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}
