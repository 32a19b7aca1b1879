use std::io::{self, Write};

use crate::models::EnvConfig;

/// Print the loaded configuration, one labelled line per key.
pub fn write_report<W: Write>(out: &mut W, config: &EnvConfig) -> io::Result<()> {
    writeln!(out, "SERVER ADDRESS :  {}", config.server_address)?;
    writeln!(out, "SECRET KEY :  {}", config.secret_key)?;
    writeln!(out, "DB DRIVER :  {}", config.db_driver)?;
    writeln!(out, "DB SOURCE :  {}", config.db_source)?;
    Ok(())
}
