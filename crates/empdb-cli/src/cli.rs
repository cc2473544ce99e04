use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Command {
    Help,
    Run(RunArgs),
}

#[derive(Debug, Clone)]
pub struct RunArgs {
    pub config: PathBuf,
    pub database: Option<String>,
    pub init_schema: bool,
    pub resume: PathBuf,
    pub note: PathBuf,
    pub employee_id: i32,
    pub out_dir: PathBuf,
    pub assume_yes: bool,
    pub verbose: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            config: PathBuf::from("database.properties"),
            database: None,
            init_schema: false,
            resume: PathBuf::from("sample_resume.pdf"),
            note: PathBuf::from("big_note_sample.txt"),
            employee_id: 2,
            out_dir: PathBuf::from("."),
            assume_yes: false,
            verbose: false,
        }
    }
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1).map(|s| s.as_str());
    let mut run = RunArgs::default();

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help),
            "-v" | "--verbose" => run.verbose = true,
            "--init-schema" => run.init_schema = true,
            "--yes" => run.assume_yes = true,
            "--config" => run.config = PathBuf::from(value(&mut it, token)?),
            _ if token.starts_with("--config=") => {
                run.config = PathBuf::from(token.trim_start_matches("--config="));
            }
            "--database" => run.database = Some(value(&mut it, token)?.to_string()),
            _ if token.starts_with("--database=") => {
                run.database = Some(token.trim_start_matches("--database=").to_string());
            }
            "--resume" => run.resume = PathBuf::from(value(&mut it, token)?),
            _ if token.starts_with("--resume=") => {
                run.resume = PathBuf::from(token.trim_start_matches("--resume="));
            }
            "--note" => run.note = PathBuf::from(value(&mut it, token)?),
            _ if token.starts_with("--note=") => {
                run.note = PathBuf::from(token.trim_start_matches("--note="));
            }
            "--employee-id" => run.employee_id = parse_id(value(&mut it, token)?)?,
            _ if token.starts_with("--employee-id=") => {
                run.employee_id = parse_id(token.trim_start_matches("--employee-id="))?;
            }
            "--out-dir" => run.out_dir = PathBuf::from(value(&mut it, token)?),
            _ if token.starts_with("--out-dir=") => {
                run.out_dir = PathBuf::from(token.trim_start_matches("--out-dir="));
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Run(run))
}

fn value<'a>(it: &mut impl Iterator<Item = &'a str>, flag: &str) -> anyhow::Result<&'a str> {
    let Some(v) = it.next() else {
        anyhow::bail!("{flag} requires a value");
    };
    Ok(v)
}

fn parse_id(v: &str) -> anyhow::Result<i32> {
    v.parse()
        .map_err(|_| anyhow::anyhow!("--employee-id must be an integer, got {v:?}"))
}

pub fn print_help() {
    println!(
        "\
USAGE:
  empdb [OPTIONS]

Runs the employee walk-through against PostgreSQL: metadata, CRUD, stored
procedures, large objects and a confirmed transaction.

OPTIONS:
  --config <FILE>       Properties file with url/user/password (default: database.properties)
  --database <URL>      Database URL (overrides DATABASE_URL and the properties file)
  --init-schema         Create the employees table and routines, seeding demo rows
  --resume <FILE>       File stored as the employee's resume (default: sample_resume.pdf)
  --note <FILE>         File stored as the employee's big note (default: big_note_sample.txt)
  --employee-id <ID>    Employee receiving the resume and note (default: 2)
  --out-dir <DIR>       Directory for the copies read back (default: .)
  --yes                 Commit the salary transaction without prompting
  -v, --verbose         Debug logging (RUST_LOG overrides)
  -h, --help            Print help"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("empdb")
            .chain(list.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn no_arguments_runs_with_defaults() {
        let Command::Run(run) = parse_args(&args(&[])).unwrap() else {
            panic!("expected run");
        };
        assert_eq!(run.config, PathBuf::from("database.properties"));
        assert_eq!(run.database, None);
        assert_eq!(run.resume, PathBuf::from("sample_resume.pdf"));
        assert_eq!(run.note, PathBuf::from("big_note_sample.txt"));
        assert_eq!(run.employee_id, 2);
        assert_eq!(run.out_dir, PathBuf::from("."));
        assert!(!run.init_schema && !run.assume_yes && !run.verbose);
    }

    #[test]
    fn parses_every_option() {
        let cmd = parse_args(&args(&[
            "--config",
            "conf/db.properties",
            "--database=postgres://localhost/empdb",
            "--init-schema",
            "--resume",
            "cv.pdf",
            "--note=note.txt",
            "--employee-id",
            "7",
            "--out-dir",
            "target/copies",
            "--yes",
            "-v",
        ]))
        .unwrap();
        let Command::Run(run) = cmd else {
            panic!("expected run");
        };

        assert_eq!(run.config, PathBuf::from("conf/db.properties"));
        assert_eq!(run.database.as_deref(), Some("postgres://localhost/empdb"));
        assert!(run.init_schema);
        assert_eq!(run.resume, PathBuf::from("cv.pdf"));
        assert_eq!(run.note, PathBuf::from("note.txt"));
        assert_eq!(run.employee_id, 7);
        assert_eq!(run.out_dir, PathBuf::from("target/copies"));
        assert!(run.assume_yes);
        assert!(run.verbose);
    }

    #[test]
    fn help_wins_anywhere() {
        assert!(matches!(
            parse_args(&args(&["--yes", "--help"])).unwrap(),
            Command::Help
        ));
    }

    #[test]
    fn rejects_bad_input() {
        let err = parse_args(&args(&["--database"])).unwrap_err();
        assert_eq!(err.to_string(), "--database requires a value");

        let err = parse_args(&args(&["--employee-id", "two"])).unwrap_err();
        assert!(err.to_string().contains("must be an integer"));

        let err = parse_args(&args(&["--dry-run"])).unwrap_err();
        assert_eq!(err.to_string(), "unknown argument: --dry-run");
    }
}
