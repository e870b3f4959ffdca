// SPDX-License-Identifier: MIT

//! Tiny argv-echoing fixture binary standing in for "the sample
//! downstream executable" named as an external collaborator in
//! spec.md §1. Workspace-level scenario tests point a `WatchProfile`'s
//! `executable_path` at this binary and inspect what it was actually
//! invoked with.
//!
//! Convention: `argv[1]` is an output directory; every remaining
//! argument is written, one per line, to `<argv[1]>/<pid>.txt`. Tests
//! read that directory back to assert on launch count and argv shape.

use std::io::Write;

fn main() {
    let mut args = std::env::args().skip(1);
    let Some(out_dir) = args.next() else {
        return;
    };
    let remaining: Vec<String> = args.collect();

    let path = std::path::Path::new(&out_dir).join(format!("{}.txt", std::process::id()));
    if let Ok(mut file) = std::fs::File::create(path) {
        for arg in remaining {
            let _ = writeln!(file, "{arg}");
        }
    }
}
