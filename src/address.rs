use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use crate::error::{Error, Result};

pub(crate) const DEFAULT_PORT: u16 = 27017;

/// The address of a server that a connection is established to.
#[derive(Clone, Debug, Eq)]
#[non_exhaustive]
pub struct ServerAddress {
    /// The hostname or IP address where the server can be found.
    pub host: String,

    /// The TCP port that the server is listening on. Defaults to 27017.
    pub port: Option<u16>,
}

impl Default for ServerAddress {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: None,
        }
    }
}

impl PartialEq for ServerAddress {
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host
            && self.port.unwrap_or(DEFAULT_PORT) == other.port.unwrap_or(DEFAULT_PORT)
    }
}

impl Hash for ServerAddress {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.host.hash(state);
        self.port.unwrap_or(DEFAULT_PORT).hash(state);
    }
}

impl ServerAddress {
    /// Parses an address string into a `ServerAddress`.
    pub fn parse(address: impl AsRef<str>) -> Result<Self> {
        let address = address.as_ref();
        let invalid = || Error::invalid_argument(format!("invalid server address: {address}"));

        let (host, port) = match address.split_once(':') {
            Some((host, port)) => {
                let port = u16::from_str(port).map_err(|_| invalid())?;
                if port == 0 {
                    return Err(invalid());
                }
                (host, Some(port))
            }
            None => (address, None),
        };

        if host.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    pub(crate) fn port_tracing_representation(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}:{}", self.host, self.port.unwrap_or(DEFAULT_PORT))
    }
}

#[cfg(test)]
mod test {
    use super::ServerAddress;

    #[test]
    fn parse() {
        let address = ServerAddress::parse("db0.example.com:27018").unwrap();
        assert_eq!(address.host, "db0.example.com");
        assert_eq!(address.port, Some(27018));

        assert_eq!(
            ServerAddress::parse("localhost").unwrap(),
            ServerAddress::parse("localhost:27017").unwrap()
        );
        assert_eq!(ServerAddress::default().to_string(), "localhost:27017");

        assert!(ServerAddress::parse("localhost:notaport").is_err());
        assert!(ServerAddress::parse("localhost:0").is_err());
        assert!(ServerAddress::parse(":27017").is_err());
        assert!(ServerAddress::parse("a:1:2").is_err());
    }
}
