//! Command execution helpers
//!
//! Every handler runs its service call through [`execute_command`] so
//! timing and outcome logging stay uniform.

use std::future::Future;
use std::time::Instant;

use timebook_domain::Result as DomainResult;

use crate::error::ApiError;
use crate::utils::logging::log_command_execution;

/// Execute a command, logging its duration and outcome.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn list_clients(
///     State(ctx): State<Arc<AppContext>>,
///     AuthUser(_): AuthUser,
/// ) -> ApiResult<Json<Vec<Client>>> {
///     let clients = execute_command("clients::list", ctx.catalog.list_clients()).await?;
///     Ok(Json(clients))
/// }
/// ```
pub async fn execute_command<Fut, T>(command_name: &str, command: Fut) -> Result<T, ApiError>
where
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();
    let result = command.await;

    log_command_execution(command_name, start.elapsed(), result.as_ref().err());
    result.map_err(ApiError::from)
}
