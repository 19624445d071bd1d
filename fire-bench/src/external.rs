//! Invocations of the external detection framework's command line.

use crate::common::*;

/// The framework's command line program.
pub const DEFAULT_PROGRAM: &str = "yolo";

/// A `<program> <task> <mode> key=value ...` command.
#[derive(Debug, Clone)]
pub struct YoloCommand {
    program: String,
    args: Vec<String>,
}

impl YoloCommand {
    pub fn new(program: impl Into<String>, task: &str, mode: &str) -> Self {
        Self {
            program: program.into(),
            args: vec![task.to_owned(), mode.to_owned()],
        }
    }

    /// Append a `key=value` argument.
    pub fn arg(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.args.push(format!("{}={}", key, value));
        self
    }

    /// Append a `key=path` argument.
    pub fn path_arg(self, key: &str, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().display().to_string();
        self.arg(key, path)
    }

    /// Append arguments verbatim.
    pub fn raw_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    /// Run with inherited standard streams.
    pub fn run(&self) -> Result<()> {
        info!("run {}", self);
        let status = self
            .command()
            .status()
            .with_context(|| format!("failed to start '{}'", self.program))?;
        check_status(self, status)
    }

    /// Run with standard output captured. Every output line is echoed and
    /// passed to `on_line`.
    pub fn run_with_lines<F>(&self, mut on_line: F) -> Result<()>
    where
        F: FnMut(&str),
    {
        info!("run {}", self);
        let mut child = self
            .command()
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to start '{}'", self.program))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| format_err!("failed to capture the output of '{}'", self.program))?;
        for line in BufReader::new(stdout).lines() {
            let line = line?;
            println!("{}", line);
            on_line(&line);
        }

        let status = child.wait()?;
        check_status(self, status)
    }
}

impl fmt::Display for YoloCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        self.args
            .iter()
            .try_for_each(|arg| write!(f, " {}", arg))
    }
}

fn check_status(command: &YoloCommand, status: ExitStatus) -> Result<()> {
    ensure!(status.success(), "'{}' failed with {}", command, status);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_test() {
        let command = YoloCommand::new("yolo", "detect", "val")
            .path_arg("model", "runs/detect/train10/weights/best.pt")
            .arg("imgsz", 640)
            .arg("batch", 16)
            .raw_args(vec!["iou=0.7"]);

        assert_eq!(
            command.args(),
            &[
                "detect",
                "val",
                "model=runs/detect/train10/weights/best.pt",
                "imgsz=640",
                "batch=16",
                "iou=0.7"
            ]
        );
        assert_eq!(
            command.to_string(),
            "yolo detect val model=runs/detect/train10/weights/best.pt imgsz=640 batch=16 iou=0.7"
        );
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_is_an_error() {
        let command = YoloCommand::new("false", "detect", "val");
        assert!(command.run().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn output_lines_are_forwarded() -> Result<()> {
        let mut lines = vec![];
        YoloCommand::new("echo", "detect", "val").run_with_lines(|line| lines.push(line.to_owned()))?;
        assert_eq!(lines, vec!["detect val"]);
        Ok(())
    }

    #[test]
    fn missing_program_is_an_error() {
        let command = YoloCommand::new("surely-not-an-installed-program", "detect", "val");
        assert!(command.run().is_err());
    }
}
