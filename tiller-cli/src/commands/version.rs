//! `tiller version` command - Display version information.

use crate::error::CliResult;
use crate::output;

/// Package version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name
const NAME: &str = env!("CARGO_PKG_NAME");

/// Run the version command
pub fn run() -> CliResult<()> {
    output::title("Tiller");

    output::field("Version", VERSION);
    output::field("Binary", NAME);

    #[cfg(debug_assertions)]
    let build_mode = "debug";
    #[cfg(not(debug_assertions))]
    let build_mode = "release";

    output::field("Build", build_mode);
    output::field("SQLite", rusqlite::version());

    output::blank();
    output::group("Components");
    output::field("tiller-migrate", VERSION);

    Ok(())
}
