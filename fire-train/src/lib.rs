//! The training program. Training itself is done by the detection
//! framework's command line, configured from a json5 file.

mod common;
pub mod config;

use crate::{common::*, config::Config};

/// Build the `yolo detect train` invocation of `config`.
pub fn train_command(config: &Config) -> YoloCommand {
    let Config {
        ref model,
        ref dataset,
        ref training,
        ..
    } = *config;

    let mut command = YoloCommand::new(&training.program, "detect", "train")
        .path_arg("model", &model.cfg_file)
        .path_arg("data", &dataset.config_file);
    if let Some(pretrained) = &model.pretrained {
        command = command.path_arg("pretrained", pretrained);
    }

    command = command
        .arg("epochs", training.epochs)
        .arg("imgsz", training.image_size)
        .arg("batch", training.batch_size)
        .arg("close_mosaic", training.close_mosaic)
        .arg("workers", training.workers)
        .arg("device", &training.device)
        .arg("optimizer", &training.optimizer)
        .arg("cache", if training.cache { "True" } else { "False" });

    if let Some(project) = &training.project {
        command = command.path_arg("project", project);
    }
    if let Some(name) = &training.name {
        command = command.arg("name", name);
    }

    command.raw_args(training.extra_args.iter().cloned())
}

/// Check the inputs and run the training command to completion.
pub fn start(config: &Config) -> Result<()> {
    let cfg_file = &config.model.cfg_file;
    if !cfg_file.is_file() {
        // the framework also accepts the names of its bundled models
        warn!(
            "model config file '{}' not found locally, passing it to the framework as is",
            cfg_file.display()
        );
    }

    let data_file = &config.dataset.config_file;
    let dataset = DatasetDescription::open(data_file)
        .with_context(|| format!("failed to load dataset config '{}'", data_file.display()))?;
    ensure!(
        dataset.root.is_dir(),
        "dataset root '{}' does not exist",
        dataset.root.display()
    );
    if let Some(num_classes) = dataset.num_classes() {
        info!("train on {} classes", num_classes);
    }

    train_command(config).run()?;
    info!("training finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(text: &str) -> Config {
        json5::from_str(text).unwrap()
    }

    #[test]
    fn default_train_command() {
        let config = config(
            r#"{
                version: "0.1.0",
                model: { cfg_file: "yolov8s.yaml" },
                dataset: { config_file: "fire.yaml" },
            }"#,
        );
        assert_eq!(
            train_command(&config).to_string(),
            "yolo detect train model=yolov8s.yaml data=fire.yaml epochs=100 imgsz=640 \
             batch=16 close_mosaic=10 workers=8 device=0 optimizer=SGD cache=False"
        );
    }

    #[test]
    fn optional_arguments() {
        let config = config(
            r#"{
                version: "0.1.0",
                model: { cfg_file: "yolov8s.yaml", pretrained: "yolov8n.pt" },
                dataset: { config_file: "fire.yaml" },
                training: {
                    program: "my-yolo",
                    cache: true,
                    project: "runs/fire",
                    name: "ircb",
                    extra_args: ["lr0=0.01"],
                },
            }"#,
        );
        let command = train_command(&config);
        let args = command.args();

        assert_eq!(command.program(), "my-yolo");
        assert_eq!(args[2], "model=yolov8s.yaml");
        assert_eq!(args[4], "pretrained=yolov8n.pt");
        assert!(args.contains(&"cache=True".to_owned()));
        assert_eq!(
            &args[args.len() - 3..],
            &["project=runs/fire", "name=ircb", "lr0=0.01"]
        );
    }

    #[test]
    fn missing_dataset_config_fails_early() {
        let config = config(
            r#"{
                version: "0.1.0",
                model: { cfg_file: "yolov8s.yaml" },
                dataset: { config_file: "surely/not/here.yaml" },
            }"#,
        );
        assert!(start(&config).is_err());
    }
}
