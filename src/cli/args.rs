//! Hand-rolled subcommand parsing for the three-way `write`/`read`/
//! `capacity` surface. A three-subcommand CLI doesn't need a full argument
//! parsing crate on top of a plain `argv` walk.

use anyhow::anyhow;

#[derive(Debug, PartialEq)]
pub enum Command {
    Write {
        input: String,
        output: String,
        payload: Option<String>,
    },
    Read {
        input: String,
        output: Option<String>,
    },
    Capacity {
        input: String,
    },
}

pub const USAGE: &str = "\
Usage: pdfid <subcommand> [args]

Subcommands:
    write <input.pdf> <output.pdf> [<payload_file>]
    read <input.pdf> [<output_file>]
    capacity <input.pdf>
";

/// Parses `argv` (excluding the program name). Returns a human-readable
/// usage error on malformed input; the CLI dispatch layer maps that to
/// exit code 1.
pub fn parse(argv: &[String]) -> anyhow::Result<Command> {
    let Some((subcommand, rest)) = argv.split_first() else {
        return Err(anyhow!("{USAGE}"));
    };

    match subcommand.as_str() {
        "write" => match rest {
            [input, output] => Ok(Command::Write {
                input: input.clone(),
                output: output.clone(),
                payload: None,
            }),
            [input, output, payload] => Ok(Command::Write {
                input: input.clone(),
                output: output.clone(),
                payload: Some(payload.clone()),
            }),
            _ => Err(anyhow!(
                "write: expected <input.pdf> <output.pdf> [<payload_file>]\n{USAGE}"
            )),
        },
        "read" => match rest {
            [input] => Ok(Command::Read {
                input: input.clone(),
                output: None,
            }),
            [input, output] => Ok(Command::Read {
                input: input.clone(),
                output: Some(output.clone()),
            }),
            _ => Err(anyhow!("read: expected <input.pdf> [<output_file>]\n{USAGE}")),
        },
        "capacity" => match rest {
            [input] => Ok(Command::Capacity {
                input: input.clone(),
            }),
            _ => Err(anyhow!("capacity: expected <input.pdf>\n{USAGE}")),
        },
        other => Err(anyhow!("unknown subcommand '{other}'\n{USAGE}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_write_without_payload() {
        let cmd = parse(&args(&["write", "in.pdf", "out.pdf"])).unwrap();
        assert_eq!(
            cmd,
            Command::Write {
                input: "in.pdf".into(),
                output: "out.pdf".into(),
                payload: None,
            }
        );
    }

    #[test]
    fn parses_write_with_payload() {
        let cmd = parse(&args(&["write", "in.pdf", "out.pdf", "payload.bin"])).unwrap();
        assert_eq!(
            cmd,
            Command::Write {
                input: "in.pdf".into(),
                output: "out.pdf".into(),
                payload: Some("payload.bin".into()),
            }
        );
    }

    #[test]
    fn parses_read_without_output() {
        let cmd = parse(&args(&["read", "in.pdf"])).unwrap();
        assert_eq!(
            cmd,
            Command::Read {
                input: "in.pdf".into(),
                output: None,
            }
        );
    }

    #[test]
    fn parses_capacity() {
        let cmd = parse(&args(&["capacity", "in.pdf"])).unwrap();
        assert_eq!(
            cmd,
            Command::Capacity {
                input: "in.pdf".into(),
            }
        );
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(parse(&args(&["frobnicate", "in.pdf"])).is_err());
    }

    #[test]
    fn rejects_missing_arguments() {
        assert!(parse(&args(&["write", "in.pdf"])).is_err());
        assert!(parse(&args(&["capacity"])).is_err());
        assert!(parse(&args(&[])).is_err());
    }
}
