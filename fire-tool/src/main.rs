use anyhow::{ensure, Context, Result};
use clap::Parser;
use fire_dataset::{
    inspect_dataset, setup_dataset, AutosplitInit, DatasetConfig, SetupOutcome, Split,
};
use log::{error, warn};
use prettytable::{cell, row, Table};
use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Parser)]
enum Opts {
    /// Count images and labels of a dataset directory
    Check {
        /// dataset directory with images/ and labels/
        dataset_dir: PathBuf,
    },
    /// Copy a dataset directory to where training expects it
    Setup {
        /// source dataset directory
        source: PathBuf,
        /// target dataset directory
        target: PathBuf,
        /// overwrite a non-empty target without asking
        #[clap(long)]
        yes: bool,
    },
    /// Write autosplit_{train,val,test}.txt list files next to an images directory
    Autosplit {
        /// images directory
        images_dir: PathBuf,
        /// train, val and test fractions
        #[clap(long, number_of_values = 3, default_values = &["0.8", "0.1", "0.1"])]
        weights: Vec<f64>,
        /// include images without a label file
        #[clap(long)]
        all: bool,
        /// random seed
        #[clap(long, default_value = "0")]
        seed: u64,
    },
    /// Resolve every split of a dataset description file
    Verify {
        /// dataset description file
        config_file: PathBuf,
    },
    /// Interactive menu to train and validate
    QuickStart {
        /// dataset directory with images/ and labels/
        #[clap(long, default_value = "datasets/firedetn")]
        dataset_dir: PathBuf,
        /// training configuration file
        #[clap(long, default_value = "train.json5")]
        train_config: PathBuf,
        /// validation configuration file
        #[clap(long, default_value = "val.json5")]
        val_config: PathBuf,
    },
}

fn main() -> Result<()> {
    fire_config::init_logging();

    match Opts::parse() {
        Opts::Check { dataset_dir } => {
            check(dataset_dir)?;
        }
        Opts::Setup {
            source,
            target,
            yes,
        } => {
            setup(source, target, yes)?;
        }
        Opts::Autosplit {
            images_dir,
            weights,
            all,
            seed,
        } => {
            autosplit(images_dir, &weights, all, seed)?;
        }
        Opts::Verify { config_file } => {
            verify(config_file)?;
        }
        Opts::QuickStart {
            dataset_dir,
            train_config,
            val_config,
        } => {
            quick_start(dataset_dir, train_config, val_config)?;
        }
    }

    Ok(())
}

/// Print the dataset statistics. Returns whether the dataset is ready.
fn check(dataset_dir: impl AsRef<Path>) -> Result<bool> {
    let dataset_dir = dataset_dir.as_ref();

    let stats = match inspect_dataset(dataset_dir)? {
        Some(stats) => stats,
        None => {
            println!(
                "❌ dataset '{}' is incomplete, images/ and labels/ are required",
                dataset_dir.display()
            );
            return Ok(false);
        }
    };

    let mut table = Table::new();
    table.add_row(row!["dataset", dataset_dir.display()]);
    table.add_row(row!["images", stats.num_images]);
    table.add_row(row!["labels", stats.num_labels]);
    table.printstd();

    if stats.is_ready() {
        println!("✅ dataset is ready");
    } else {
        println!("❌ dataset has no images or no labels");
    }
    Ok(stats.is_ready())
}

fn setup(source: impl AsRef<Path>, target: impl AsRef<Path>, yes: bool) -> Result<()> {
    let outcome = setup_dataset(source, target, |target| {
        if yes {
            return Ok(true);
        }
        prompt_yes_no(&format!(
            "'{}' is not empty, overwrite it?",
            target.display()
        ))
    })?;

    match outcome {
        SetupOutcome::Copied(stats) => {
            println!(
                "✅ dataset copied: {} images, {} labels",
                stats.num_images, stats.num_labels
            );
        }
        SetupOutcome::Cancelled => {
            println!("setup cancelled");
        }
    }
    Ok(())
}

fn autosplit(images_dir: impl AsRef<Path>, weights: &[f64], all: bool, seed: u64) -> Result<()> {
    ensure!(weights.len() == 3, "expect train, val and test weights");
    let output = AutosplitInit {
        weights: [weights[0], weights[1], weights[2]],
        annotated_only: !all,
        seed,
    }
    .run(images_dir)?;

    if output.num_unlabeled > 0 {
        warn!("{} images without labels are skipped", output.num_unlabeled);
    }

    let mut table = Table::new();
    table.add_row(row!["split", "list file", "images"]);
    output.lists.iter().for_each(|(split, path, count)| {
        let mark = if path.is_file() { "✅" } else { "❌" };
        table.add_row(row![split, format!("{} {}", mark, path.display()), count]);
    });
    table.printstd();

    Ok(())
}

/// Image counts of one split entry of a dataset description.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SplitReport {
    split: Split,
    entry: String,
    num_images: usize,
    num_missing: usize,
}

/// Resolve every split present in `config`.
fn verify_splits(config: &DatasetConfig) -> Result<Vec<SplitReport>> {
    ensure!(
        config.root.is_dir(),
        "dataset root '{}' does not exist",
        config.root.display()
    );

    let mut reports = vec![];
    for split in Split::ALL {
        let entry = match config.split_entry(split) {
            Some(entry) => entry,
            None => continue,
        };
        let images = config.resolve(split)?;
        reports.push(SplitReport {
            split,
            entry: entry.to_owned(),
            num_images: images.len(),
            num_missing: images.missing().len(),
        });
    }
    Ok(reports)
}

fn verify(config_file: impl AsRef<Path>) -> Result<()> {
    let config = DatasetConfig::open(config_file)?;
    let reports = verify_splits(&config)?;

    let mut table = Table::new();
    table.add_row(row!["split", "entry", "images", "missing"]);
    reports.iter().for_each(|report| {
        table.add_row(row![
            report.split,
            report.entry,
            report.num_images,
            report.num_missing
        ]);
    });
    table.printstd();

    if let Some(num_classes) = config.num_classes() {
        println!("classes: {}", num_classes);
    }
    Ok(())
}

/// Entries of the quick start menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Train,
    Validate,
    TrainThenValidate,
    Exit,
}

impl MenuChoice {
    fn parse(answer: &str) -> Option<Self> {
        let choice = match answer.trim() {
            "1" => Self::Train,
            "2" => Self::Validate,
            "3" => Self::TrainThenValidate,
            "4" => Self::Exit,
            _ => return None,
        };
        Some(choice)
    }
}

/// Run the actions selected by a menu answer. Returns `None` for an
/// invalid answer. Validation is skipped when training fails.
fn dispatch<T, V>(answer: &str, train: T, validate: V) -> Result<Option<MenuChoice>>
where
    T: FnOnce() -> Result<()>,
    V: FnOnce() -> Result<()>,
{
    let choice = match MenuChoice::parse(answer) {
        Some(choice) => choice,
        None => return Ok(None),
    };

    match choice {
        MenuChoice::Train => train()?,
        MenuChoice::Validate => validate()?,
        MenuChoice::TrainThenValidate => {
            train()?;
            validate()?;
        }
        MenuChoice::Exit => {}
    }
    Ok(Some(choice))
}

fn quick_start(
    dataset_dir: impl AsRef<Path>,
    train_config: impl AsRef<Path>,
    val_config: impl AsRef<Path>,
) -> Result<()> {
    let dataset_dir = dataset_dir.as_ref();
    if !check(dataset_dir)? {
        println!(
            "run 'fire-tool setup <source> {}' first",
            dataset_dir.display()
        );
        return Ok(());
    }

    println!("1) train");
    println!("2) validate");
    println!("3) train, then validate");
    println!("4) exit");
    let answer = prompt("choose [1-4]:")?;

    let result = dispatch(
        &answer,
        || train(train_config.as_ref()),
        || validate(val_config.as_ref()),
    );
    match result {
        Ok(Some(_)) => {}
        Ok(None) => println!("invalid choice '{}'", answer),
        Err(err) => error!("{:?}", err),
    }
    Ok(())
}

fn train(config_file: &Path) -> Result<()> {
    let config = fire_train::config::Config::open(config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))?;
    fire_train::start(&config)
}

fn validate(config_file: &Path) -> Result<()> {
    let config = fire_val::config::Config::open(config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))?;
    fire_val::start(&config)?;
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{} ", message);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_owned())
}

fn prompt_yes_no(message: &str) -> Result<bool> {
    let answer = prompt(&format!("{} [y/N]", message))?;
    Ok(matches!(answer.as_str(), "y" | "Y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::{cell::RefCell, fs};

    type MenuRun = (Result<Option<MenuChoice>>, Vec<&'static str>);

    fn run_menu(answer: &str, train_fails: bool) -> MenuRun {
        let calls = RefCell::new(vec![]);
        let result = dispatch(
            answer,
            || {
                calls.borrow_mut().push("train");
                if train_fails {
                    bail!("training failed");
                }
                Ok(())
            },
            || {
                calls.borrow_mut().push("validate");
                Ok(())
            },
        );
        (result, calls.into_inner())
    }

    #[test]
    fn menu_choices() {
        let (result, calls) = run_menu("1", false);
        assert_eq!(result.unwrap(), Some(MenuChoice::Train));
        assert_eq!(calls, vec!["train"]);

        let (result, calls) = run_menu("2\n", false);
        assert_eq!(result.unwrap(), Some(MenuChoice::Validate));
        assert_eq!(calls, vec!["validate"]);

        let (result, calls) = run_menu(" 3 ", false);
        assert_eq!(result.unwrap(), Some(MenuChoice::TrainThenValidate));
        assert_eq!(calls, vec!["train", "validate"]);

        let (result, calls) = run_menu("4", false);
        assert_eq!(result.unwrap(), Some(MenuChoice::Exit));
        assert!(calls.is_empty());
    }

    #[test]
    fn invalid_menu_choice_runs_nothing() {
        ["", "0", "5", "train", "12"].iter().for_each(|answer| {
            let (result, calls) = run_menu(answer, false);
            assert_eq!(result.unwrap(), None);
            assert!(calls.is_empty());
        });
    }

    #[test]
    fn failed_training_skips_validation() {
        let (result, calls) = run_menu("3", true);
        assert!(result.is_err());
        assert_eq!(calls, vec!["train"]);
    }

    #[test]
    fn verify_resolves_present_splits() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let root = dir.path().join("firedetn");
        fs::create_dir_all(root.join("images/val"))?;
        ["a.jpg", "b.png"].iter().try_for_each(|name| {
            fs::write(root.join("images").join(name), b"")
        })?;
        fs::write(root.join("images/val/c.jpg"), b"")?;
        fs::write(
            root.join("autosplit_train.txt"),
            "./images/a.jpg\n./images/b.png\n./images/gone.jpg\n",
        )?;
        let config_file = dir.path().join("fire.yaml");
        fs::write(
            &config_file,
            "path: firedetn\ntrain: autosplit_train.txt\nval: images/val\nnames:\n  0: fire\n",
        )?;

        let config = DatasetConfig::open(&config_file)?;
        let reports = verify_splits(&config)?;
        assert_eq!(
            reports,
            vec![
                SplitReport {
                    split: Split::Train,
                    entry: "autosplit_train.txt".into(),
                    num_images: 2,
                    num_missing: 1,
                },
                SplitReport {
                    split: Split::Val,
                    entry: "images/val".into(),
                    num_images: 1,
                    num_missing: 0,
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn verify_rejects_missing_root() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config_file = dir.path().join("fire.yaml");
        fs::write(&config_file, "path: nowhere\ntrain: images\n")?;

        let config = DatasetConfig::open(&config_file)?;
        assert!(verify_splits(&config).is_err());
        Ok(())
    }
}
