use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{ArgAction, Parser};
use humantime::parse_duration;
use toaster::presentation::PresentationScheme;

#[derive(Parser, Debug)]
#[command(author, version, about = "Toast notifications from showToast events", long_about = None)]
pub struct Cli {
    /// Chemin du fichier de configuration TOML.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Schéma de présentation (`classes` ou `inline`).
    #[arg(long, value_parser = parse_scheme)]
    pub scheme: Option<PresentationScheme>,

    /// Durée d'affichage d'un toast (ex. "5s").
    #[arg(long, value_parser = parse_duration)]
    pub display_for: Option<Duration>,

    /// Durée de l'animation de sortie (ex. "300ms").
    #[arg(long, value_parser = parse_duration)]
    pub fade_out: Option<Duration>,

    /// Utilise un layer JSON pour les logs (`--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Filtre de logs explicite (ex. "toaster=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

fn parse_scheme(raw: &str) -> Result<PresentationScheme, String> {
    PresentationScheme::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use std::time::Duration;
    use toaster::presentation::PresentationScheme;

    #[test]
    fn parses_overrides() {
        let cli = Cli::try_parse_from([
            "toaster",
            "--scheme",
            "inline",
            "--display-for",
            "2s",
            "--fade-out",
            "100ms",
        ]);
        let Ok(cli) = cli else {
            panic!("arguments should parse");
        };
        assert_eq!(cli.scheme, Some(PresentationScheme::Inline));
        assert_eq!(cli.display_for, Some(Duration::from_secs(2)));
        assert_eq!(cli.fade_out, Some(Duration::from_millis(100)));
    }

    #[test]
    fn rejects_unknown_scheme() {
        assert!(Cli::try_parse_from(["toaster", "--scheme", "fancy"]).is_err());
    }
}
