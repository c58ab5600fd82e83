use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use colored::Colorize;
use polyxyz::{Insertion, OverwritePolicy, PolyError, Polynomial, PolynomialStore, StoreError};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt, EnvFilter};

const MENU: &str = "
Menu:
  1. Add polynomial
  2. Remove polynomial
  3. Show polynomial
  4. List polynomials
  5. Add two polynomials
  6. Subtract two polynomials
  7. Multiply two polynomials
  8. Divide polynomial by a number
  9. Evaluate polynomial at a point
 10. Save polynomials to file
 11. Load polynomials from file
  0. Exit
Choose an action: ";

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Poly(#[from] PolyError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("invalid overwrite mode '{0}', expected ask, replace, keep or reject")]
    InvalidOverwriteMode(String),
    #[error("unknown menu choice '{0}'")]
    UnknownChoice(String),
    #[error("unexpected end of input")]
    EndOfInput,
}

/// How to resolve a name conflict when storing a polynomial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OverwriteMode {
    /// Ask the user for every conflict.
    Ask,
    Policy(OverwritePolicy),
}

impl std::str::FromStr for OverwriteMode {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ask" => Ok(OverwriteMode::Ask),
            "replace" => Ok(OverwriteMode::Policy(OverwritePolicy::Replace)),
            "keep" => Ok(OverwriteMode::Policy(OverwritePolicy::Keep)),
            "reject" => Ok(OverwriteMode::Policy(OverwritePolicy::Reject)),
            _ => Err(CliError::InvalidOverwriteMode(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone)]
struct CliConfig {
    /// The default file for saving and loading polynomials.
    store_path: PathBuf,
    overwrite: OverwriteMode,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            store_path: PathBuf::from("polynomials.bin"),
            overwrite: OverwriteMode::Ask,
        }
    }
}

impl CliConfig {
    /// Read the configuration from `POLYXYZ_STORE` and `POLYXYZ_OVERWRITE`,
    /// falling back to the defaults.
    fn from_env() -> Result<CliConfig, CliError> {
        let mut config = CliConfig::default();
        if let Ok(path) = env::var("POLYXYZ_STORE") {
            config.store_path = PathBuf::from(path);
        }
        if let Ok(mode) = env::var("POLYXYZ_OVERWRITE") {
            config.overwrite = mode.parse()?;
        }
        Ok(config)
    }
}

enum Flow {
    Continue,
    Exit,
}

/// An interactive session over a line-based input and an output.
struct Session<R: BufRead, W: Write> {
    input: R,
    output: W,
    store: PolynomialStore,
    config: CliConfig,
}

impl<R: BufRead, W: Write> Session<R, W> {
    fn new(input: R, output: W, config: CliConfig) -> Self {
        let policy = match config.overwrite {
            OverwriteMode::Ask => OverwritePolicy::Keep,
            OverwriteMode::Policy(p) => p,
        };

        Session {
            input,
            output,
            store: PolynomialStore::with_policy(policy),
            config,
        }
    }

    fn run(&mut self) -> Result<(), CliError> {
        loop {
            let choice = match self.prompt(MENU) {
                Ok(c) => c,
                Err(CliError::EndOfInput) => return Ok(()),
                Err(e) => return Err(e),
            };

            match self.dispatch(&choice) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) | Err(CliError::EndOfInput) => return Ok(()),
                Err(CliError::Io(e)) => return Err(CliError::Io(e)),
                Err(e) => writeln!(self.output, "{} {}", "Error:".red().bold(), e)?,
            }
        }
    }

    fn dispatch(&mut self, choice: &str) -> Result<Flow, CliError> {
        match choice {
            "1" => {
                let name = self.prompt("Polynomial name: ")?;
                let expr = self.prompt("Polynomial (for example 2x^2y - 3z + 5): ")?;
                let poly = Polynomial::parse(&expr)?;
                self.save(&name, poly)?;
            }
            "2" => {
                let name = self.prompt("Name of the polynomial to remove: ")?;
                self.store.remove(&name)?;
                writeln!(self.output, "Polynomial '{}' removed.", name)?;
            }
            "3" => {
                let name = self.prompt("Polynomial name: ")?;
                let poly = self.store.get(&name)?;
                writeln!(self.output, "{} = {}", name, poly)?;
            }
            "4" => {
                if self.store.is_empty() {
                    writeln!(self.output, "No polynomials stored.")?;
                } else {
                    writeln!(self.output, "Polynomials:")?;
                    for (name, poly) in self.store.iter() {
                        writeln!(self.output, "  {} = {}", name, poly)?;
                    }
                }
            }
            "5" | "6" | "7" => {
                let a = self.prompt("Name of the first polynomial: ")?;
                let b = self.prompt("Name of the second polynomial: ")?;
                let (a, b) = (self.store.get(&a)?, self.store.get(&b)?);
                let result = match choice {
                    "5" => a + b,
                    "6" => a - b,
                    _ => a.try_mul(b)?,
                };
                self.offer_save(result)?;
            }
            "8" => {
                let name = self.prompt("Polynomial name: ")?;
                let divisor = self.prompt("Divide by: ")?;
                let divisor = parse_number(&divisor)?;
                let result = self.store.get(&name)?.div_coeff(divisor)?;
                self.offer_save(result)?;
            }
            "9" => {
                let name = self.prompt("Polynomial name: ")?;
                let point = self.prompt("Point x y z: ")?;
                let coords = point
                    .split(|c: char| c.is_whitespace() || c == ',')
                    .filter(|s| !s.is_empty())
                    .map(parse_number)
                    .collect::<Result<Vec<_>, _>>()?;
                let &[x, y, z] = &coords[..] else {
                    return Err(CliError::InvalidNumber(point));
                };

                let value = self.store.get(&name)?.evaluate(x, y, z);
                writeln!(self.output, "{}({}, {}, {}) = {}", name, x, y, z, value)?;
            }
            "10" => {
                let path = self.prompt_path()?;
                let file = File::create(&path).map_err(StoreError::from)?;
                self.store.export(BufWriter::new(file))?;
                writeln!(
                    self.output,
                    "Saved {} polynomials to {}.",
                    self.store.len(),
                    path.display()
                )?;
            }
            "11" => {
                let path = self.prompt_path()?;
                let file = File::open(&path).map_err(StoreError::from)?;
                let n = self.store.import(BufReader::new(file))?;
                writeln!(
                    self.output,
                    "Loaded {} polynomials from {}.",
                    n,
                    path.display()
                )?;
            }
            "0" => return Ok(Flow::Exit),
            c => return Err(CliError::UnknownChoice(c.to_owned())),
        }

        Ok(Flow::Continue)
    }

    /// Print the prompt and read a trimmed line.
    fn prompt(&mut self, msg: &str) -> Result<String, CliError> {
        write!(self.output, "{}", msg)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(CliError::EndOfInput);
        }
        Ok(line.trim().to_owned())
    }

    fn confirm(&mut self, msg: &str) -> Result<bool, CliError> {
        let answer = self.prompt(msg)?;
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }

    fn prompt_path(&mut self) -> Result<PathBuf, CliError> {
        let msg = format!("File [{}]: ", self.config.store_path.display());
        let path = self.prompt(&msg)?;
        if path.is_empty() {
            Ok(self.config.store_path.clone())
        } else {
            Ok(PathBuf::from(path))
        }
    }

    fn offer_save(&mut self, result: Polynomial) -> Result<(), CliError> {
        writeln!(self.output, "{} {}", "Result:".bold(), result)?;
        if self.confirm("Save the result? (y/n): ")? {
            let name = self.prompt("Name for the result: ")?;
            self.save(&name, result)?;
        }
        Ok(())
    }

    fn save(&mut self, name: &str, poly: Polynomial) -> Result<(), CliError> {
        let policy = match self.config.overwrite {
            OverwriteMode::Policy(p) => p,
            OverwriteMode::Ask if self.store.contains(name) => {
                let msg = format!("Polynomial '{}' already exists. Overwrite? (y/n): ", name);
                if self.confirm(&msg)? {
                    OverwritePolicy::Replace
                } else {
                    OverwritePolicy::Keep
                }
            }
            OverwriteMode::Ask => OverwritePolicy::Keep,
        };

        match self.store.insert_with(name, poly, policy)? {
            Insertion::New | Insertion::Replaced(_) => {
                debug!("Stored '{}'", name);
                writeln!(self.output, "Polynomial '{}' saved.", name)?;
            }
            Insertion::Kept => writeln!(self.output, "Polynomial '{}' kept.", name)?,
        }
        Ok(())
    }
}

fn parse_number(s: &str) -> Result<f64, CliError> {
    s.trim()
        .parse()
        .map_err(|_| CliError::InvalidNumber(s.to_owned()))
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_env("POLYXYZ_LOG"))
        .init();

    let config = match CliConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(2);
        }
    };

    println!("polyxyz {}", env!("CARGO_PKG_VERSION"));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(stdin.lock(), stdout.lock(), config);
    if let Err(e) = session.run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use polyxyz::OverwritePolicy;

    use super::{CliConfig, OverwriteMode, Session};

    fn run(config: CliConfig, input: &str) -> String {
        colored::control::set_override(false);
        let mut out = vec![];
        let mut session = Session::new(Cursor::new(input.as_bytes()), &mut out, config);
        session.run().unwrap();
        drop(session);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn add_and_multiply() {
        let out = run(
            CliConfig::default(),
            "1\np\nx + y\n1\nq\nx - y\n7\np\nq\ny\nr\n3\nr\n0\n",
        );
        assert!(out.contains("Result: x^2-y^2"));
        assert!(out.contains("r = x^2-y^2"));
    }

    #[test]
    fn errors_do_not_end_the_session() {
        let out = run(
            CliConfig::default(),
            "3\nmissing\n1\np\nx\n8\np\n0\n42\n4\n",
        );
        assert!(out.contains("Error: polynomial 'missing' not found"));
        assert!(out.contains("Error: division by zero"));
        assert!(out.contains("Error: unknown menu choice '42'"));
        assert!(out.contains("  p = x"));
    }

    #[test]
    fn overwrite_prompt() {
        let out = run(
            CliConfig::default(),
            "1\np\nx\n1\np\ny\nn\n3\np\n1\np\nz\ny\n3\np\n",
        );
        assert!(out.contains("Polynomial 'p' kept."));
        assert!(out.contains("p = x\n"));
        assert!(out.contains("p = z\n"));
    }

    #[test]
    fn overwrite_policy_from_config() {
        let config = CliConfig {
            overwrite: OverwriteMode::Policy(OverwritePolicy::Reject),
            ..CliConfig::default()
        };
        let out = run(config, "1\np\nx\n1\np\ny\n");
        assert!(out.contains("Error: polynomial 'p' already exists"));
    }

    #[test]
    fn evaluate() {
        let out = run(CliConfig::default(), "1\np\nx^2 + yz\n9\np\n2, 3 4\n");
        assert!(out.contains("p(2, 3, 4) = 16"));
    }

    #[test]
    fn overwrite_mode_parsing() {
        assert_eq!("Ask".parse::<OverwriteMode>().unwrap(), OverwriteMode::Ask);
        assert_eq!(
            " keep ".parse::<OverwriteMode>().unwrap(),
            OverwriteMode::Policy(OverwritePolicy::Keep)
        );
        assert!("sometimes".parse::<OverwriteMode>().is_err());
    }
}
