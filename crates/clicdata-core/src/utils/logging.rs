//! Verbose console output.
//!
//! Library diagnostics go through the `log` facade; the binary decides where they end up.

pub fn print_verbose(verbose: bool, msg: &str) {
    if verbose {
        println!("Verbose: {}", msg);
    }
}
