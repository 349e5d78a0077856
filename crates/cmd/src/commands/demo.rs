//! Canned walkthrough scripts, one per flavor. Each exercises the
//! whole operation surface, including the failure statuses, and
//! checkpoints the namespace with `dump` along the way.

use std::io::{self, Write};

use anyhow::Result;
use nametree::Flavor;

use crate::commands::script::run_script;

const BINARY_SCRIPT: &str = "\
# operations fail until the tree is initialized
insert a/y
init
insert a/y
insert a/x
dump
insert a//b
insert a/x
# a third child exceeds the arity bound
insert a/z
rm a/y
dump
insert a/z
dump
rm a/missing
count
check
destroy
dump
";

const DIRECTORY_SCRIPT: &str = "\
init
insert plants/ferns
insert plants/mosses
insert plants/conifers
dump
# siblings stay in lexicographic order
insert plants/conifers/pines
dump
# this flavor holds no files
insert-file plants/notes some text
stat plants/mosses
contains plants/ferns
contains plants/cacti
rm plants/mosses
dump
count
check
destroy
";

const FILESYSTEM_SCRIPT: &str = "\
init
insert 1root/y
insert-file 1root/x/C hello, world!
dump
get 1root/x/C
replace 1root/x/C Kernighan
get 1root/x/C
stat 1root/x/C
# a file cannot be the root
insert-file A top
# nor hold children
insert 1root/x/C/under
# removals are kind-checked
rm 1root/x/C
rm-file 1root/y
rm-file 1root/x/C
dump
count
check
destroy
";

pub fn demo_command(flavor: Flavor) -> Result<()> {
    let script = match flavor {
        Flavor::Binary => BINARY_SCRIPT,
        Flavor::Directory => DIRECTORY_SCRIPT,
        Flavor::Filesystem => FILESYSTEM_SCRIPT,
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_script(script.as_bytes(), flavor, true, &mut out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(script: &str, flavor: Flavor) -> String {
        let mut out = Vec::new();
        run_script(script.as_bytes(), flavor, true, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_binary_walkthrough() {
        let output = run(BINARY_SCRIPT, Flavor::Binary);
        // two children in insertion order, promotion after removal
        assert!(output.contains("> dump\na\na/y\na/x\n"));
        assert!(output.contains("> dump\na\na/x\na/z\n"));
        assert!(output.contains("error: conflicting path: a/z"));
        assert!(output.contains("error: no such path: a/missing"));
        assert!(output.ends_with("> dump\n(uninitialized)\n"));
    }

    #[test]
    fn test_directory_walkthrough() {
        let output = run(DIRECTORY_SCRIPT, Flavor::Directory);
        assert!(output.contains(
            "> dump\nplants\nplants/conifers\nplants/ferns\nplants/mosses\n"
        ));
        assert!(output.contains("error: conflicting path: plants/notes"));
        assert!(output.contains("> stat plants/mosses\ndirectory\n"));
        assert!(output.contains("> check\nok\n"));
    }

    #[test]
    fn test_filesystem_walkthrough() {
        let output = run(FILESYSTEM_SCRIPT, Flavor::Filesystem);
        assert!(output.contains("> get 1root/x/C\nhello, world!\n"));
        assert!(output.contains("> stat 1root/x/C\nfile, 9 bytes\n"));
        assert!(output.contains("error: conflicting path: A"));
        assert!(output.contains("error: not a directory: 1root/x/C\n"));
        assert!(output.contains("error: not a file: 1root/y\n"));
        assert!(output.contains("> count\n3\n"));
    }
}
