use colored::Colorize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const LOG_FILE_NAME: &str = "wp-menu-cart.log";

static LOG_FILE: Mutex<Option<PathBuf>> = Mutex::new(None);
static VERBOSITY: Mutex<u8> = Mutex::new(0);
static NO_STDERR: Mutex<bool> = Mutex::new(false);

/// Get the current verbosity level for use by other modules
pub fn get_verbosity() -> u8 {
    VERBOSITY.lock().ok().map(|v| *v).unwrap_or(0)
}

/// Get whether console logging is disabled
pub fn get_no_stderr() -> bool {
    NO_STDERR.lock().ok().map(|v| *v).unwrap_or(false)
}

/// Set whether console logging is disabled
pub fn set_no_stderr(disabled: bool) {
    if let Ok(mut v) = NO_STDERR.lock() {
        *v = disabled;
    }
}

/// Convert verbosity level to a tracing filter directive
/// 0 = warn only, 1 = debug (-v), 2 = trace (-vv)
pub fn verbosity_to_filter() -> String {
    match get_verbosity() {
        0 => "warn".to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Initialize the logger with a verbosity level, logging to the default location
pub fn init_with_verbosity(verbosity: u8, no_stderr: bool) -> Result<(), String> {
    let config_dir = get_config_dir()?;
    init_in(&config_dir, verbosity, no_stderr)
}

/// Initialize the logger with `wp-menu-cart.log` inside `dir`
pub fn init_in(dir: &Path, verbosity: u8, no_stderr: bool) -> Result<(), String> {
    set_verbosity(verbosity);
    set_no_stderr(no_stderr);
    init_at(&dir.join(LOG_FILE_NAME))
}

/// Initialize the logger writing to an explicit file
pub fn init_at(log_file: &Path) -> Result<(), String> {
    if let Some(parent) = log_file.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create log directory: {}", e))?;
    }

    // Truncate log file on each run (overwrite instead of append)
    if log_file.exists() {
        let _ = fs::remove_file(log_file);
    }

    let mut log_file_guard = LOG_FILE
        .lock()
        .map_err(|_| "Log file lock poisoned".to_string())?;
    *log_file_guard = Some(log_file.to_path_buf());

    Ok(())
}

fn set_verbosity(verbosity: u8) {
    if let Ok(mut v) = VERBOSITY.lock() {
        *v = verbosity;
    }
}

/// Get the config directory path
fn get_config_dir() -> Result<PathBuf, String> {
    #[cfg(not(target_os = "windows"))]
    let config_dir = dirs::home_dir()
        .ok_or("Could not determine home directory")?
        .join(".config")
        .join("wp-menu-cart");

    #[cfg(target_os = "windows")]
    let config_dir = dirs::config_dir()
        .ok_or("Could not determine config directory")?
        .join("wp-menu-cart");

    Ok(config_dir)
}

/// Write to log file
fn write_to_log(message: &str) {
    if let Ok(log_file_guard) = LOG_FILE.lock() {
        if let Some(ref log_path) = *log_file_guard {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(log_path) {
                let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
                let _ = writeln!(file, "[{}] {}", timestamp, message);
            }
        }
    }
}

fn console(line: &str) {
    if !get_no_stderr() {
        eprintln!("{}", line);
    }
}

/// Log an informational message (to console if verbose >= 1, always to file)
pub fn info(message: &str) {
    write_to_log(&format!("INFO {}", message));
    if get_verbosity() >= 1 {
        console(message);
    }
}

/// Log a debug message (to console if verbose >= 1, always to file)
pub fn debug(message: &str) {
    write_to_log(&format!("DEBUG {}", message));
    if get_verbosity() >= 1 {
        console(&format!("{} {}", "DEBUG:".blue().bold(), message));
    }
}

/// Log a warning message (to both file and console)
pub fn warn(message: &str) {
    write_to_log(&format!("WARN {}", message));
    console(&format!("{} {}", "warning:".yellow().bold(), message));
}

/// Log an error message (to both file and console)
pub fn error(message: &str) {
    write_to_log(&format!("ERROR {}", message));
    console(&format!("{} {}", "Error:".red().bold(), message));
}

/// Log a success message (to console only for user feedback)
pub fn success(message: &str) {
    write_to_log(&format!("SUCCESS {}", message));
    let check = "\u{2714}".green().bold();
    console(&format!("{} {}", check, message));
}

/// Log a step message (shown at trace verbosity)
pub fn step(message: &str) {
    if get_verbosity() >= 2 {
        console(&format!("TRACE: {}", message));
    }
    write_to_log(&format!("STEP: {}", message));
}

/// Get the log file path for display
pub fn get_log_path() -> Option<PathBuf> {
    LOG_FILE.lock().ok().and_then(|guard| guard.clone())
}

/// Print the log file path to the user
pub fn show_log_path() {
    if let Some(path) = get_log_path() {
        eprintln!("Log file: {}", path.display());
    } else if let Ok(config_dir) = get_config_dir() {
        eprintln!("Log file: {}", config_dir.join(LOG_FILE_NAME).display());
    } else {
        eprintln!("Log file location not available");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_messages_are_written_to_log_file() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let path = dir.path().join("logs").join(LOG_FILE_NAME);
        assert!(init_at(&path).is_ok());
        set_no_stderr(true);

        info("rendering menu");
        warn("no shop plugin active");

        let contents = fs::read_to_string(&path).unwrap_or_default();
        assert!(contents.contains("INFO rendering menu"));
        assert!(contents.contains("WARN no shop plugin active"));
        assert_eq!(get_log_path(), Some(path));
    }

    #[test]
    fn test_verbosity_filter_levels() {
        set_verbosity(0);
        assert_eq!(verbosity_to_filter(), "warn");
        set_verbosity(1);
        assert_eq!(verbosity_to_filter(), "debug");
        set_verbosity(3);
        assert_eq!(verbosity_to_filter(), "trace");
        set_verbosity(0);
    }
}
