use ownerscope_core::AppError;

/// Classifies a sqlx failure into the application error taxonomy.
///
/// Failures to obtain or keep a connection become `Unavailable`; everything
/// else is `Internal`. Nothing is logged here; the HTTP error mapping logs
/// each failed request once.
pub(crate) fn database_error(context: &str, error: sqlx::Error) -> AppError {
    if is_connection_failure(&error) {
        return AppError::Unavailable(format!("{context}: {error}"));
    }

    AppError::Internal(format!("{context}: {error}"))
}

fn is_connection_failure(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => true,
        // SQLSTATE class 08 is "connection exception"; 57P01..57P03 are
        // shutdown and startup states of the server.
        sqlx::Error::Database(database_error) => database_error.code().is_some_and(|code| {
            code.starts_with("08") || matches!(&*code, "57P01" | "57P02" | "57P03")
        }),
        _ => false,
    }
}
