use desk_core::entities::Student;
use desk_db::error::DatabaseError;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::StudentCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `examdesk student`.
pub async fn handle(action: &StudentCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        StudentCommands::Create { number, name, photo } => {
            let student = ctx
                .service
                .create_student(number, name, photo.as_deref())
                .await?;
            output(&student, flags.format)
        }
        StudentCommands::Get { id } => output(&find_student(ctx, id).await?, flags.format),
        StudentCommands::SetPhoto { id, photo } => {
            let student = find_student(ctx, id).await?;
            let student = ctx
                .service
                .set_enrolled_photo(&student.id, photo.as_deref())
                .await?;
            output(&student, flags.format)
        }
    }
}

/// Look a student up by ID, then by student number.
pub async fn find_student(ctx: &AppContext, id_or_number: &str) -> anyhow::Result<Student> {
    match ctx.service.get_student(id_or_number).await {
        Ok(student) => Ok(student),
        Err(DatabaseError::NoResult) => match ctx.service.get_student_by_number(id_or_number).await {
            Ok(student) => Ok(student),
            Err(DatabaseError::NoResult) => anyhow::bail!("student '{id_or_number}' not found"),
            Err(error) => Err(error.into()),
        },
        Err(error) => Err(error.into()),
    }
}
