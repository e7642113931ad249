use std::num::ParseIntError;

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("PORT must be a number between 0 and 65535: {0}")]
	Port(#[from] ParseIntError),
}

/// Process configuration, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// MongoDB connection string. Without one, the server runs with no database.
	pub database_url: Option<String>,
	pub port: u16,
}

impl Config {
	/// Reads the configuration from the process environment.
	///
	/// Call [`dotenvy::dotenv`] first to pick up a `.env` file.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_vars(|name| std::env::var(name).ok())
	}

	fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let port = var("PORT")
			.map(|port| port.trim().parse::<u16>())
			.transpose()?
			.unwrap_or(DEFAULT_PORT);

		Ok(Self {
			database_url: var("DATABASE_URL").filter(|url| !url.trim().is_empty()),
			port,
		})
	}
}

#[cfg(test)]
mod test {
	use std::collections::HashMap;

	use super::*;

	fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
		let vars = vars
			.iter()
			.map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
			.collect::<HashMap<_, _>>();

		Config::from_vars(|name| vars.get(name).cloned())
	}

	#[test]
	fn test_defaults() {
		assert_eq!(
			config(&[]).unwrap(),
			Config {
				database_url: None,
				port: DEFAULT_PORT,
			}
		);
	}

	#[test]
	fn test_values() {
		let config = config(&[
			("DATABASE_URL", "mongodb://localhost:27017/desk"),
			("PORT", "3000"),
		])
		.unwrap();

		assert_eq!(
			config.database_url.as_deref(),
			Some("mongodb://localhost:27017/desk")
		);
		assert_eq!(config.port, 3000);
	}

	#[test]
	fn test_blank_database_url_is_unset() {
		assert_eq!(config(&[("DATABASE_URL", "  ")]).unwrap().database_url, None);
	}

	#[test]
	fn test_invalid_port() {
		assert!(matches!(
			config(&[("PORT", "eighty")]),
			Err(ConfigError::Port(..))
		));
	}
}
