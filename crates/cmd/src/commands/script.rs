//! A line-oriented script interpreter over one tree.
//!
//! Each line is one operation. Blank lines and `#` comments are
//! skipped. Failed operations report their status and the script
//! keeps going; only I/O trouble aborts the run.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use diagnostics::log_debug;
use nametree::{Flavor, Tree};

pub fn script_command(file: Option<&Path>, flavor: Flavor) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match file {
        Some(path) => {
            let reader = BufReader::new(
                File::open(path).with_context(|| format!("opening script {}", path.display()))?,
            );
            run_script(reader, flavor, false, &mut out)
        }
        None => run_script(io::stdin().lock(), flavor, false, &mut out),
    }
}

/// Runs every line of `input` against a fresh tree of `flavor`. With
/// `echo`, each command is printed before it runs, so the transcript
/// reads as a session.
pub fn run_script(
    input: impl BufRead,
    flavor: Flavor,
    echo: bool,
    out: &mut impl Write,
) -> Result<()> {
    let mut tree = Tree::new(flavor);
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if echo {
            writeln!(out, "> {line}")?;
        }
        log_debug!("script line: {line}", line: line);
        run_line(&mut tree, line, out)?;
    }
    Ok(())
}

fn run_line(tree: &mut Tree, line: &str, out: &mut impl Write) -> Result<()> {
    let (cmd, rest) = split_word(line);
    let outcome = match cmd {
        "init" => tree.init(),
        "destroy" => tree.destroy(),
        "insert" => tree.insert_dir(rest),
        "insert-file" => {
            let (path, data) = split_word(rest);
            tree.insert_file(path, payload(data))
        }
        "rm" => tree.remove_dir(rest),
        "rm-file" => tree.remove_file(rest),
        "contains" => {
            writeln!(out, "{}", tree.contains(rest))?;
            Ok(())
        }
        "contains-dir" => {
            writeln!(out, "{}", tree.contains_dir(rest))?;
            Ok(())
        }
        "contains-file" => {
            writeln!(out, "{}", tree.contains_file(rest))?;
            Ok(())
        }
        "stat" => match tree.stat(rest) {
            Ok(stat) => {
                match stat.size {
                    Some(size) => writeln!(out, "file, {size} bytes")?,
                    None => writeln!(out, "directory")?,
                }
                Ok(())
            }
            Err(err) => Err(err),
        },
        "get" => {
            match tree.file_contents(rest) {
                Some(bytes) => writeln!(out, "{}", String::from_utf8_lossy(&bytes))?,
                None => writeln!(out, "(no contents)")?,
            }
            Ok(())
        }
        "replace" => {
            let (path, data) = split_word(rest);
            match tree.replace_file_contents(path, payload(data)) {
                Some(old) => writeln!(out, "{}", String::from_utf8_lossy(&old))?,
                None => writeln!(out, "(no contents)")?,
            }
            Ok(())
        }
        "dump" => {
            match tree.dump() {
                Some(text) => write!(out, "{text}")?,
                None => writeln!(out, "(uninitialized)")?,
            }
            Ok(())
        }
        "count" => {
            writeln!(out, "{}", tree.count())?;
            Ok(())
        }
        "check" => {
            writeln!(out, "{}", if tree.check() { "ok" } else { "invalid" })?;
            Ok(())
        }
        other => {
            writeln!(out, "error: unknown command {other:?}")?;
            Ok(())
        }
    };
    if let Err(err) = outcome {
        writeln!(out, "error: {err}")?;
    }
    Ok(())
}

/// Splits off the first whitespace-delimited word; the remainder keeps
/// its internal spacing, so file payloads may contain spaces.
fn split_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim_start()),
        None => (text, ""),
    }
}

fn payload(data: &str) -> Option<Vec<u8>> {
    if data.is_empty() {
        None
    } else {
        Some(data.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn run(script: &str, flavor: Flavor) -> String {
        let mut out = Vec::new();
        run_script(script.as_bytes(), flavor, false, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_insert_and_dump() {
        let output = run(
            "init\n\
             insert plants/ferns\n\
             insert plants/conifers\n\
             dump\n\
             count\n",
            Flavor::Directory,
        );
        assert_eq!(output, "plants\nplants/conifers\nplants/ferns\n3\n");
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let output = run(
            "# a comment\n\
             \n\
             init\n\
             count\n",
            Flavor::Directory,
        );
        assert_eq!(output, "0\n");
    }

    #[test]
    fn test_errors_are_reported_not_fatal() {
        let output = run(
            "insert plants\n\
             init\n\
             insert plants//ferns\n\
             insert plants\n\
             insert plants\n\
             contains plants\n",
            Flavor::Directory,
        );
        assert_eq!(
            output,
            "error: tree is in the wrong initialization state\n\
             error: malformed path: \"plants//ferns\"\n\
             error: path already in tree: plants\n\
             true\n"
        );
    }

    #[test]
    fn test_file_payloads_keep_spaces() {
        let output = run(
            "init\n\
             insert 1root\n\
             insert-file 1root/H hello, world!\n\
             get 1root/H\n\
             stat 1root/H\n\
             replace 1root/H Kernighan\n\
             get 1root/H\n",
            Flavor::Filesystem,
        );
        assert_eq!(
            output,
            "hello, world!\n\
             file, 13 bytes\n\
             hello, world!\n\
             Kernighan\n"
        );
    }

    #[test]
    fn test_unknown_command() {
        let output = run("init\nfrobnicate x\n", Flavor::Binary);
        assert_eq!(output, "error: unknown command \"frobnicate\"\n");
    }

    #[test]
    fn test_echo_prefixes_commands() {
        let mut out = Vec::new();
        run_script("init\ncount\n".as_bytes(), Flavor::Binary, true, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "> init\n> count\n0\n");
    }

    #[test]
    fn test_script_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "init").unwrap();
        writeln!(file, "insert a/y").unwrap();
        writeln!(file, "dump").unwrap();
        file.flush().unwrap();

        let reader = BufReader::new(File::open(file.path()).unwrap());
        let mut out = Vec::new();
        run_script(reader, Flavor::Binary, false, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\na/y\n");
    }
}
