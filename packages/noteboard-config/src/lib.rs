mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Filter, Security, Service, Storage, Stream};

use std::{fs, net::SocketAddr, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		Error::ParseConfig { source, .. } =>
			Error::ParseConfig { path: path.to_path_buf(), source },
		other => other,
	})
}

/// Parses, normalizes and validates a TOML config that is already in memory.
pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: Default::default(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	let http_addr: SocketAddr = cfg.service.http_bind.parse().map_err(|_| Error::Validation {
		message: "service.http_bind must be a socket address such as 127.0.0.1:5000.".to_string(),
	})?;

	if cfg.security.bind_localhost_only && !http_addr.ip().is_loopback() {
		return Err(Error::Validation {
			message:
				"service.http_bind must be a loopback address when security.bind_localhost_only is true."
					.to_string(),
		});
	}
	if cfg.storage.path.as_os_str().is_empty() {
		return Err(Error::Validation { message: "storage.path must be non-empty.".to_string() });
	}
	if cfg.stream.queue_capacity == 0 {
		return Err(Error::Validation {
			message: "stream.queue_capacity must be greater than zero.".to_string(),
		});
	}
	if cfg.stream.keep_alive_secs == 0 {
		return Err(Error::Validation {
			message: "stream.keep_alive_secs must be greater than zero.".to_string(),
		});
	}
	if !matches!(cfg.filter.malformed_stored_dates.as_str(), "skip" | "reject") {
		return Err(Error::Validation {
			message: "filter.malformed_stored_dates must be one of skip or reject.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.http_bind = cfg.service.http_bind.trim().to_string();
	cfg.filter.malformed_stored_dates =
		cfg.filter.malformed_stored_dates.trim().to_ascii_lowercase();

	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
