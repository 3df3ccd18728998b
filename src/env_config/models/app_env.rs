use std::fmt;
use std::str::FromStr;

/// Окружение, в котором запущен пайплайн
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Env {
    Local,
    Dev,
    Prod,
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Env::Local => write!(f, "local"),
            Env::Dev => write!(f, "dev"),
            Env::Prod => write!(f, "prod"),
        }
    }
}

impl FromStr for Env {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Env::Local),
            "dev" | "development" => Ok(Env::Dev),
            "prod" | "production" => Ok(Env::Prod),
            other => Err(format!("Unknown environment: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppEnv {
    pub env: Env,
    // Каталог с файлами {env}.toml
    pub config_dir: String,
}

impl AppEnv {
    pub fn is_local(&self) -> bool {
        self.env == Env::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_from_str() {
        assert_eq!(Env::from_str("local").unwrap(), Env::Local);
        assert_eq!(Env::from_str("PROD").unwrap(), Env::Prod);
        assert_eq!(Env::from_str("development").unwrap(), Env::Dev);
        assert!(Env::from_str("staging").is_err());
    }

    #[test]
    fn test_env_display_roundtrip() {
        for env in [Env::Local, Env::Dev, Env::Prod] {
            assert_eq!(Env::from_str(&env.to_string()).unwrap(), env);
        }
    }
}
