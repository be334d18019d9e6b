use anyhow::{anyhow, Result};

/// Database names are interpolated into DDL, so only plain identifiers pass.
pub fn validate_database_name(value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow!("clickhouse_database is empty"));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(anyhow!(
            "clickhouse_database '{}' must only contain letters, digits and '_'",
            value
        ));
    }
    Ok(())
}
