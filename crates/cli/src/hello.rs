//! Greeting output.

use std::io::Write;

use crate::config::HelloSection;

/// Write the configured greeting `times` times, framed by progress lines.
pub fn write_hello(out: &mut impl Write, hello: &HelloSection, times: u32) -> std::io::Result<()> {
    writeln!(out, "Producing hello message {times} times")?;
    for _ in 0..times {
        writeln!(out, "{}", hello.message)?;
    }
    writeln!(out, "Done")
}
