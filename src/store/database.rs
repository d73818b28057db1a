//! Create the target database on first start.

use crate::error::{AppError, ConfigError};
use sqlx::ConnectOptions;
use std::str::FromStr;

/// Connect to the server's `postgres` database and create the database named in
/// `database_url` if it does not exist yet. A URL without a database path has
/// nothing to create.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let target = DatabaseUrl::parse(database_url)?;
    let Some(db_name) = target.database.filter(|n| n != "postgres") else {
        tracing::debug!("no application database named in DATABASE_URL");
        return Ok(());
    };
    let opts = sqlx::postgres::PgConnectOptions::from_str(&target.admin_url).map_err(|e| {
        ConfigError::Invalid {
            var: "DATABASE_URL",
            reason: e.to_string(),
        }
    })?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// A connection URL split into the maintenance-database URL (same server,
/// credentials and query options) and the application database name.
#[derive(Debug, PartialEq)]
struct DatabaseUrl {
    admin_url: String,
    database: Option<String>,
}

impl DatabaseUrl {
    fn parse(url: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::Invalid {
            var: "DATABASE_URL",
            reason: reason.to_string(),
        };
        let (without_query, query) = match url.split_once('?') {
            Some((base, q)) => (base, Some(q)),
            None => (url, None),
        };
        let authority_start = without_query
            .find("://")
            .ok_or_else(|| invalid("expected scheme://host"))?
            + 3;
        let (server, path) = match without_query[authority_start..].find('/') {
            Some(i) => without_query.split_at(authority_start + i),
            None => (without_query, ""),
        };
        if server.len() == authority_start {
            return Err(invalid("missing host"));
        }
        let name = path.trim_start_matches('/').trim();
        let mut admin_url = format!("{}/postgres", server);
        if let Some(q) = query {
            admin_url.push('?');
            admin_url.push_str(q);
        }
        Ok(DatabaseUrl {
            admin_url,
            database: (!name.is_empty()).then(|| name.to_string()),
        })
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_admin_url_from_database_name() {
        let url =
            DatabaseUrl::parse("postgres://u:p@localhost:5432/user_directory?sslmode=disable")
                .unwrap();
        assert_eq!(url.admin_url, "postgres://u:p@localhost:5432/postgres?sslmode=disable");
        assert_eq!(url.database.as_deref(), Some("user_directory"));
    }

    #[test]
    fn url_without_a_path_names_no_database() {
        for raw in ["postgres://localhost", "postgres://localhost/", "postgres://h:5432?sslmode=require"] {
            let url = DatabaseUrl::parse(raw).unwrap();
            assert_eq!(url.database, None, "{}", raw);
            assert!(url.admin_url.contains("/postgres"), "{}", url.admin_url);
        }
    }

    #[test]
    fn url_without_scheme_or_host_is_rejected() {
        assert!(DatabaseUrl::parse("localhost/db").is_err());
        assert!(DatabaseUrl::parse("postgres:///db").is_err());
    }

    #[test]
    fn quotes_embedded_quotes() {
        assert_eq!(quote_ident(r#"we"ird"#), r#""we""ird""#);
    }
}
