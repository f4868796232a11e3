pub mod config;
pub mod configure;
pub mod delete;
pub mod export;
pub mod import;
pub mod list;
pub mod migrate;
pub mod set_option;
pub mod variant;

use std::future::Future;

use liftquote_core::config::{AppConfig, LoadOptions};
use liftquote_core::errors::{ApplicationError, InterfaceError};
use liftquote_db::{connect_with_config, migrations, MatrixRepository, SqlMatrixStore};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with_data(command, message, None::<Value>)
    }

    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: impl Into<Option<Value>>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: data.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// A failed command before it is rendered: class, message and exit code.
#[derive(Debug)]
pub struct CommandFailure {
    pub error_class: &'static str,
    pub message: String,
    pub exit_code: u8,
}

impl CommandFailure {
    pub fn new(error_class: &'static str, message: impl Into<String>, exit_code: u8) -> Self {
        Self { error_class, message: message.into(), exit_code }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new("invalid_input", message, 7)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message, 6)
    }

    fn into_result(self, command: &str) -> CommandResult {
        warn!(
            event_name = "cli.command.failed",
            command,
            error_class = self.error_class,
            exit_code = self.exit_code,
            error = %self.message,
            "command failed"
        );
        CommandResult::failure(command, self.error_class, self.message, self.exit_code)
    }
}

impl From<InterfaceError> for CommandFailure {
    fn from(value: InterfaceError) -> Self {
        let exit_code = match value {
            InterfaceError::BadRequest { .. } => 7,
            InterfaceError::NotFound { .. } => 6,
            InterfaceError::ServiceUnavailable { .. } => 5,
        };
        Self::new(value.error_class(), value.message(), exit_code)
    }
}

impl From<ApplicationError> for CommandFailure {
    fn from(value: ApplicationError) -> Self {
        value.into_interface("cli").into()
    }
}

impl From<liftquote_db::MatrixRepositoryError> for CommandFailure {
    fn from(value: liftquote_db::MatrixRepositoryError) -> Self {
        ApplicationError::from(value).into()
    }
}

impl From<liftquote_core::errors::DomainError> for CommandFailure {
    fn from(value: liftquote_core::errors::DomainError) -> Self {
        ApplicationError::from(value).into()
    }
}

/// Everything a data command needs once config, runtime, pool and schema are
/// ready.
pub struct Session {
    pub config: AppConfig,
    pub repository: MatrixRepository<SqlMatrixStore>,
}

pub(crate) fn load_config(command: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandFailure::new("config_validation", format!("configuration issue: {error}"), 2)
            .into_result(command)
    })
}

pub(crate) fn build_runtime(command: &str) -> Result<tokio::runtime::Runtime, CommandResult> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        CommandFailure::new(
            "runtime_init",
            format!("failed to initialize async runtime: {error}"),
            3,
        )
        .into_result(command)
    })
}

/// Loads config, opens the database with pending migrations applied and
/// hands a [`Session`] to `body`.
pub(crate) fn with_session<F, Fut>(command: &str, body: F) -> CommandResult
where
    F: FnOnce(Session) -> Fut,
    Fut: Future<Output = Result<CommandResult, CommandFailure>>,
{
    let config = match load_config(command) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match build_runtime(command) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let outcome = runtime.block_on(async move {
        let pool = connect_with_config(&config.database)
            .await
            .map_err(|error| CommandFailure::new("db_connectivity", error.to_string(), 4))?;
        migrations::run_pending(&pool)
            .await
            .map_err(|error| CommandFailure::new("migration", error.to_string(), 5))?;

        let repository = MatrixRepository::new(SqlMatrixStore::new(pool.clone()));
        let session = Session { config, repository };
        let result = body(session).await;
        pool.close().await;
        result
    });

    match outcome {
        Ok(result) => {
            info!(event_name = "cli.command.completed", command, "command completed");
            result
        }
        Err(failure) => failure.into_result(command),
    }
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<Value, CommandFailure> {
    serde_json::to_value(value)
        .map_err(|error| CommandFailure::new("serialization", error.to_string(), 3))
}
