pub mod demo;
pub mod script;

use anyhow::{Result, bail};
use nametree::Flavor;

pub fn parse_flavor(name: &str) -> Result<Flavor> {
    match name {
        "binary" => Ok(Flavor::Binary),
        "directory" => Ok(Flavor::Directory),
        "filesystem" => Ok(Flavor::Filesystem),
        other => bail!("unknown flavor {other:?}; expected binary, directory, or filesystem"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flavor() {
        assert_eq!(parse_flavor("binary").unwrap(), Flavor::Binary);
        assert_eq!(parse_flavor("directory").unwrap(), Flavor::Directory);
        assert_eq!(parse_flavor("filesystem").unwrap(), Flavor::Filesystem);
        assert!(parse_flavor("b-tree").is_err());
        assert!(parse_flavor("").is_err());
    }
}
