use std::env;
use std::path::PathBuf;

pub const DEFAULT_EXTRUDERS: usize = 1;

pub struct Config {
    pub extruders: usize,
    pub zlift: Option<f32>,
    pub autoretract: bool,
    /// `None` reads the script from stdin.
    pub script: Option<PathBuf>,
}

impl Config {
    pub fn from_args() -> Self {
        Self::from_args_iter(env::args())
    }

    pub fn from_args_iter<I, S>(iter: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut extruders = env::var("FWRETRACT_EXTRUDERS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_EXTRUDERS);
        let mut zlift = env::var("FWRETRACT_ZLIFT")
            .ok()
            .and_then(|v| v.trim().parse().ok());
        let mut autoretract = env::var("FWRETRACT_AUTORETRACT")
            .ok()
            .and_then(parse_bool)
            .unwrap_or(false);
        let mut script: Option<PathBuf> = None;

        let mut args = iter.into_iter();
        let _ = args.next();
        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            match arg {
                "-h" | "--help" => {
                    print_usage();
                    std::process::exit(0);
                }
                "--extruders" => {
                    if let Some(n) = args.next().and_then(|v| v.as_ref().parse().ok()) {
                        extruders = n;
                    }
                }
                "--zlift" => {
                    if let Some(z) = args.next().and_then(|v| v.as_ref().parse().ok()) {
                        zlift = Some(z);
                    }
                }
                "--script" => {
                    if let Some(value) = args.next() {
                        script = Some(PathBuf::from(value.as_ref()));
                    }
                }
                "--autoretract" => {
                    autoretract = true;
                }
                _ if arg.starts_with("--extruders=") => {
                    if let Ok(n) = arg["--extruders=".len()..].parse() {
                        extruders = n;
                    }
                }
                _ if arg.starts_with("--zlift=") => {
                    if let Ok(z) = arg["--zlift=".len()..].parse() {
                        zlift = Some(z);
                    }
                }
                _ if arg.starts_with("--script=") => {
                    script = Some(PathBuf::from(&arg["--script=".len()..]));
                }
                _ => {}
            }
        }

        Self {
            extruders: extruders.max(1),
            zlift,
            autoretract,
            script,
        }
    }
}

fn print_usage() {
    println!(
        "fwretract_replay [--extruders N] [--zlift MM] [--autoretract] [--script PATH]\n\
         script lines: retract [swap] | recover [swap] | tool N | e DELTA | reset | status"
    );
}

fn parse_bool(value: String) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
