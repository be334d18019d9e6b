use tracing::error;

use crate::{AppError, AppState};
use backend_domain::{AuditLogQuery, AuditRecord};

pub async fn list_audit_logs(
    state: &AppState,
    query: AuditLogQuery,
) -> Result<Vec<AuditRecord>, AppError> {
    let function = query
        .function
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let rows = state
        .audit_repo
        .fetch_audits(function, limit)
        .await
        .map_err(|err| {
            error!("failed to fetch audit logs: {}", err);
            AppError::Unknown(err)
        })?;
    Ok(rows)
}
