//! # filemap CLI
//!
//! A thin terminal client over the `filemap` library: it opens a map of JSON
//! values and lets you list, read, write, remove and inspect entries. Everything
//! about storage lives in the library; this crate only parses arguments, wires
//! configuration and logging, and renders results.
//!
//! ```text
//! filemap --map resources set apples '{"name":"apples","value":1,"quantity":1}'
//! filemap --map resources list
//! filemap --map resources doctor
//! ```

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
