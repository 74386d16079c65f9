pub type Result<T> = std::result::Result<T, String>;

pub fn handle_error_and_exit(err: String) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}

/// Prefixes an error with the file it came from.
pub fn with_path_context<T, E: std::fmt::Display>(
    result: std::result::Result<T, E>,
    path: &std::path::Path,
) -> Result<T> {
    result.map_err(|e| format!("{}: {}", path.display(), e))
}
