use liftquote_core::domain::matrix::MatrixId;

use crate::commands::{with_session, CommandResult};

pub fn run(matrix_id: &str) -> CommandResult {
    with_session("delete", |session| async move {
        session.repository.delete(&MatrixId(matrix_id.to_string())).await?;
        Ok(CommandResult::success("delete", format!("deleted matrix `{matrix_id}`")))
    })
}
