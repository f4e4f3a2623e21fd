//! Command line parsing

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

pub const USAGE: &str = "\
Usage: splice [OPTIONS] FILE...
       splice --inspect FILE

Merge audio files into one WAV with a cue point at the start of each file.

Options:
  -o, --output PATH     Output file (default from config: ./merged_audio.wav)
  -c, --config PATH     Config file (default: {config_dir}/splice/config.yaml)
      --move FROM:TO    Move clip FROM before clip TO (0-based, repeatable)
      --remove INDEX    Remove clip INDEX (0-based, repeatable)
      --inspect FILE    Print the format and cue list of a WAV file
  -h, --help            Print this help";

/// Edits applied to the clip list, in command line order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipEdit {
    Move { from: usize, to: usize },
    Remove(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeArgs {
    pub files: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub edits: Vec<ClipEdit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Merge(MergeArgs),
    Inspect(PathBuf),
    Help,
}

/// Parse arguments (without the program name)
pub fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut merge = MergeArgs::default();
    let mut inspect = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-o" | "--output" => merge.output = Some(value(&mut args, &arg)?.into()),
            "-c" | "--config" => merge.config = Some(value(&mut args, &arg)?.into()),
            "--inspect" => inspect = Some(PathBuf::from(value(&mut args, &arg)?)),
            "--move" => {
                let spec = value(&mut args, &arg)?;
                let (from, to) = spec
                    .split_once(':')
                    .with_context(|| format!("--move expects FROM:TO, got '{}'", spec))?;
                merge.edits.push(ClipEdit::Move {
                    from: index(from)?,
                    to: index(to)?,
                });
            }
            "--remove" => {
                let spec = value(&mut args, &arg)?;
                merge.edits.push(ClipEdit::Remove(index(&spec)?));
            }
            "--" => merge.files.extend(args.by_ref().map(PathBuf::from)),
            flag if flag.starts_with('-') && flag.len() > 1 => bail!("Unknown option '{}'", flag),
            _ => merge.files.push(PathBuf::from(&arg)),
        }
    }

    if let Some(path) = inspect {
        return Ok(Command::Inspect(path));
    }
    if merge.files.is_empty() {
        bail!("No input files given");
    }
    Ok(Command::Merge(merge))
}

fn value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String> {
    args.next()
        .with_context(|| format!("{} requires a value", flag))
}

fn index(text: &str) -> Result<usize> {
    text.trim()
        .parse()
        .with_context(|| format!("'{}' is not a clip index", text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_files_and_output() {
        let cmd = parse(&["a.mp3", "-o", "out/set.wav", "b.wav"]).unwrap();
        assert_eq!(
            cmd,
            Command::Merge(MergeArgs {
                files: vec!["a.mp3".into(), "b.wav".into()],
                output: Some("out/set.wav".into()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_edits_keep_order() {
        let cmd = parse(&["a", "b", "c", "--move", "2:0", "--remove", "1"]).unwrap();
        let Command::Merge(args) = cmd else {
            panic!("expected merge command");
        };
        assert_eq!(
            args.edits,
            [ClipEdit::Move { from: 2, to: 0 }, ClipEdit::Remove(1)]
        );
    }

    #[test]
    fn test_inspect_and_help() {
        assert_eq!(parse(&["--inspect", "x.wav"]).unwrap(), Command::Inspect("x.wav".into()));
        assert_eq!(parse(&["a.wav", "--help"]).unwrap(), Command::Help);
    }

    #[test]
    fn test_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["-o"]).is_err());
        assert!(parse(&["--bogus", "a.wav"]).is_err());
        assert!(parse(&["a.wav", "--move", "1-2"]).is_err());
        assert!(parse(&["a.wav", "--remove", "x"]).is_err());
    }

    #[test]
    fn test_double_dash_takes_rest_as_files() {
        let cmd = parse(&["--", "-weird.wav"]).unwrap();
        let Command::Merge(args) = cmd else {
            panic!("expected merge command");
        };
        assert_eq!(args.files, [PathBuf::from("-weird.wav")]);
    }
}
