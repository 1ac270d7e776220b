use std::{env, fs, ops::Deref, path::Path, str::FromStr, sync::Arc};

use tokio::sync::Semaphore;
use tracing::warn;

use crate::{
    error::Error,
    provider::{DatabasePool, HTTP},
};

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub database: DatabasePool,
    pub http: HTTP,
    pub push_permits: Arc<Semaphore>,
}

impl State {
    pub fn new(config: Config, database: DatabasePool, http: HTTP) -> State {
        let push_permits = Arc::new(Semaphore::new(config.max_push_tasks));
        Self {
            config,
            database,
            http,
            push_permits,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub static_dir: String,
    pub timeout: u64,
    pub mail_to: String,
    pub status_code_to_delete: Vec<u16>,
    pub jwt_secret: String,
    pub auth: String,
    pub enable_reminders: bool,
    pub reminder_interval: u64,
    pub max_push_tasks: usize,
    pub push_ttl: i64,
    pub vapid_private_key: Vec<u8>,
    pub vapid_public_key: Vec<u8>,
}

impl Config {
    /// Base64url application server key handed to `PushManager.subscribe()`.
    pub fn vapid_public_key_b64(&self) -> Result<String, Error> {
        let key = String::from_utf8(self.vapid_public_key.clone())?;
        Ok(key.trim().to_owned())
    }
}

fn parse_config_vapid_keys() -> Result<(Vec<u8>, Vec<u8>), Error> {
    let directory = env!("CARGO_MANIFEST_DIR");
    let private_key_dir = format!("{}/cert/vapid_private.pem", directory);
    let public_key_dir = format!("{}/cert/vapid_public.b64", directory);

    let private_key = fs::read(private_key_dir)?;
    let public_key = fs::read(public_key_dir)?;

    Ok((private_key, public_key))
}

pub fn get_configuration() -> Result<Config, Error> {
    let database_url = env::var("DATABASE_URL")?;
    let server_host = env::var("SERVER_HOST")?;
    let port: u16 = env::var("PORT")?.parse()?;
    let allowed_origins = env::var("ALLOWED_ORIGINS")?
        .split(',')
        .map(|item| item.trim().to_owned())
        .collect::<Vec<String>>();
    let static_dir = format!(
        "{}/{}",
        env!("CARGO_MANIFEST_DIR"),
        env::var("STATIC_DIRECTORY")?
    );
    let timeout = env::var("TIMEOUT")?.parse()?;
    let mail_to = env::var("MAIL_TO")?;
    let status_code_to_delete =
        parse_list::<u16>(&env::var("STATUS_CODE_TO_DELETE")?)?;
    let jwt_secret = env::var("JWT_SECRET")?;
    let auth = env::var("AUTH")?;
    let enable_reminders = env::var("ENABLE_REMINDERS")?.parse()?;
    let reminder_interval: u64 =
        env::var("REMINDER_INTERVAL_IN_HOURS")?.parse()?;
    let max_push_tasks: usize = env::var("MAX_PUSH_TASKS")?.parse()?;
    let push_ttl = env::var("PUSH_TTL_IN_SEC")?.parse()?;

    if reminder_interval == 0 {
        return Err(Error::ConfigurationError(String::from(
            "REMINDER_INTERVAL_IN_HOURS must be greater than 0",
        )));
    }

    if max_push_tasks == 0 {
        return Err(Error::ConfigurationError(String::from(
            "MAX_PUSH_TASKS must be greater than 0",
        )));
    }

    let (vapid_private_key, vapid_public_key) = parse_config_vapid_keys()?;

    let config = Config {
        database_url,
        server_host,
        port,
        allowed_origins,
        static_dir,
        timeout,
        mail_to,
        status_code_to_delete,
        jwt_secret,
        auth,
        enable_reminders,
        reminder_interval,
        max_push_tasks,
        push_ttl,
        vapid_private_key,
        vapid_public_key,
    };

    Ok(config)
}

/// Loads `.env` from the manifest directory into the process environment.
/// A missing file is not an error; variables may come from the host.
pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);

    if !Path::new(&path).exists() {
        warn!("{} not found, using process environment", path);
        return Ok(());
    }

    let config_string = fs::read_to_string(path)?;

    for (key, value) in parse_config_string(&config_string) {
        env::set_var(key, value);
    }

    Ok(())
}

fn parse_config_string(config: &str) -> Vec<(String, String)> {
    config
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_at(line.find('=')?);
            Some((key.trim().to_owned(), value[1..].trim().to_owned()))
        })
        .collect()
}

fn parse_list<T>(value: &str) -> Result<Vec<T>, Error>
where
    T: FromStr,
    Error: From<T::Err>,
{
    let mut items = vec![];

    for item in value.split(',').map(str::trim).filter(|i| !i.is_empty()) {
        items.push(item.parse::<T>()?);
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_string_skips_comments_and_blanks() {
        let parsed = parse_config_string(
            "# push\nMAIL_TO=ops@example.com\n\nDATABASE_URL=postgres://u:p@h/db?sslmode=require\nbroken line\n",
        );
        assert_eq!(
            parsed,
            vec![
                (String::from("MAIL_TO"), String::from("ops@example.com")),
                (
                    String::from("DATABASE_URL"),
                    String::from("postgres://u:p@h/db?sslmode=require")
                ),
            ]
        );
    }

    #[test]
    fn test_parse_list_of_status_codes() {
        let codes = parse_list::<u16>("404, 410").unwrap();
        assert_eq!(codes, vec![404, 410]);
        assert!(parse_list::<u16>("404,gone").is_err());
        assert!(parse_list::<u16>("").unwrap().is_empty());
    }
}
