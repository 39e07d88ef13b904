use anyhow::{Result, anyhow, bail};
use comms::specs::{DatasetSelection, ModelKind};

pub const USAGE: &str =
    "Usage: ml-playground <titanic|lego|house> [target] [nn|rf|svm|knn] [--preset <path>] [--optimize]";

/// Command line options of a playground run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub dataset: DatasetSelection,
    pub target: Option<String>,
    pub model: Option<ModelKind>,
    pub preset: Option<String>,
    pub optimize: bool,
}

impl Args {
    /// Parses the arguments that follow the program name.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut positional = Vec::new();
        let mut preset = None;
        let mut optimize = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--optimize" => optimize = true,
                "--preset" => {
                    let path = args.next().ok_or_else(|| anyhow!("--preset needs a path"))?;
                    preset = Some(path);
                }
                flag if flag.starts_with("--") => bail!("unknown option: {flag}\n{USAGE}"),
                _ => positional.push(arg),
            }
        }

        if positional.len() > 3 {
            bail!("too many arguments\n{USAGE}");
        }
        let mut positional = positional.into_iter();

        let dataset = positional.next().ok_or_else(|| anyhow!(USAGE))?;
        let dataset = DatasetSelection::from_wire(&dataset)
            .ok_or_else(|| anyhow!("unknown dataset: {dataset}\n{USAGE}"))?;

        let target = positional.next();
        let model = positional
            .next()
            .map(|m| ModelKind::from_wire(&m).ok_or_else(|| anyhow!("unknown model: {m}\n{USAGE}")))
            .transpose()?;

        Ok(Self {
            dataset,
            target,
            model,
            preset,
            optimize,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args> {
        Args::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn dataset_only() {
        let args = parse(&["house"]).unwrap();
        assert_eq!(args.dataset, DatasetSelection::House);
        assert_eq!(args.target, None);
        assert_eq!(args.model, None);
        assert!(!args.optimize);
    }

    #[test]
    fn flags_anywhere() {
        let args = parse(&["--optimize", "titanic", "Survived", "--preset", "p.json", "svm"]).unwrap();
        assert_eq!(args.target.as_deref(), Some("Survived"));
        assert_eq!(args.model, Some(ModelKind::SupportVectorMachine));
        assert_eq!(args.preset.as_deref(), Some("p.json"));
        assert!(args.optimize);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["iris"]).is_err());
        assert!(parse(&["lego", "Pieces", "xgb"]).is_err());
        assert!(parse(&["lego", "--preset"]).is_err());
        assert!(parse(&["lego", "--verbose"]).is_err());
        assert!(parse(&["lego", "a", "rf", "b"]).is_err());
    }
}
