//! SQL dialect selection: the supported dialects and the resolution rule
//! mapping datasource provider names onto them.

use crate::error::DialectResolutionError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SQL dialect used for parsing.
///
/// Different dialects have different syntax rules; validation semantics are
/// otherwise identical across dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Generic,
    Ansi,
    Bigquery,
    Clickhouse,
    Databricks,
    Duckdb,
    Hive,
    Mssql,
    Mysql,
    #[default]
    Postgres,
    Redshift,
    Snowflake,
    Sqlite,
}

impl Dialect {
    pub fn to_sqlparser_dialect(&self) -> Box<dyn sqlparser::dialect::Dialect> {
        use sqlparser::dialect::{
            AnsiDialect, BigQueryDialect, ClickHouseDialect, DatabricksDialect, DuckDbDialect,
            GenericDialect, HiveDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect,
            RedshiftSqlDialect, SQLiteDialect, SnowflakeDialect,
        };
        match self {
            Self::Generic => Box::new(GenericDialect {}),
            Self::Ansi => Box::new(AnsiDialect {}),
            Self::Bigquery => Box::new(BigQueryDialect {}),
            Self::Clickhouse => Box::new(ClickHouseDialect {}),
            Self::Databricks => Box::new(DatabricksDialect {}),
            Self::Duckdb => Box::new(DuckDbDialect {}),
            Self::Hive => Box::new(HiveDialect {}),
            Self::Mssql => Box::new(MsSqlDialect {}),
            Self::Mysql => Box::new(MySqlDialect {}),
            Self::Postgres => Box::new(PostgreSqlDialect {}),
            Self::Redshift => Box::new(RedshiftSqlDialect {}),
            Self::Snowflake => Box::new(SnowflakeDialect {}),
            Self::Sqlite => Box::new(SQLiteDialect {}),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Ansi => "ansi",
            Self::Bigquery => "bigquery",
            Self::Clickhouse => "clickhouse",
            Self::Databricks => "databricks",
            Self::Duckdb => "duckdb",
            Self::Hive => "hive",
            Self::Mssql => "mssql",
            Self::Mysql => "mysql",
            Self::Postgres => "postgres",
            Self::Redshift => "redshift",
            Self::Snowflake => "snowflake",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = DialectResolutionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "generic" => Ok(Self::Generic),
            "ansi" => Ok(Self::Ansi),
            "bigquery" => Ok(Self::Bigquery),
            "clickhouse" => Ok(Self::Clickhouse),
            "databricks" => Ok(Self::Databricks),
            "duckdb" => Ok(Self::Duckdb),
            "hive" => Ok(Self::Hive),
            "mssql" | "sqlserver" | "tsql" => Ok(Self::Mssql),
            "mysql" => Ok(Self::Mysql),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "redshift" => Ok(Self::Redshift),
            "snowflake" => Ok(Self::Snowflake),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(DialectResolutionError::UnknownDialect {
                name: other.to_string(),
            }),
        }
    }
}

/// Maps a datasource provider name to its validation dialect.
///
/// Providers whose SQL surface sqlparser has no dedicated dialect for fall
/// back to the closest match (CockroachDB speaks the Postgres wire dialect;
/// MongoDB raw SQL passthrough is Postgres-shaped in practice).
fn dialect_for_provider(provider: &str) -> Option<Dialect> {
    match provider.to_ascii_lowercase().as_str() {
        "postgres" | "postgresql" | "cockroachdb" | "mongodb" => Some(Dialect::Postgres),
        "mysql" => Some(Dialect::Mysql),
        "sqlite" => Some(Dialect::Sqlite),
        "sqlserver" => Some(Dialect::Mssql),
        _ => None,
    }
}

/// Resolves the dialect for a validation run.
///
/// A non-empty override always wins and must name a supported dialect. With
/// no override the datasource provider is consulted, and with neither the
/// default is [`Dialect::Postgres`].
pub fn resolve(
    provider: Option<&str>,
    override_dialect: Option<&str>,
) -> Result<Dialect, DialectResolutionError> {
    if let Some(name) = override_dialect.filter(|n| !n.trim().is_empty()) {
        return name.parse();
    }
    match provider {
        Some(name) => dialect_for_provider(name).ok_or_else(|| {
            DialectResolutionError::UnknownProvider {
                name: name.to_string(),
            }
        }),
        None => Ok(Dialect::default()),
    }
}
