use jsonwebtoken::Algorithm;
use std::env;

/// Process-wide configuration, loaded once at startup and shared immutably
/// via `web::Data`. The signing key, algorithm and token TTL are only ever
/// read from here; no component does ambient env lookups.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            secret_key: env::var("SECRET_KEY").expect("SECRET_KEY must be set"),
            algorithm: env::var("ALGORITHM")
                .unwrap_or_else(|_| "HS256".to_string())
                .parse()
                .expect("ALGORITHM must be a supported JWT algorithm"),
            access_token_expire_minutes: env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("ACCESS_TOKEN_EXPIRE_MINUTES must be an integer"),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
