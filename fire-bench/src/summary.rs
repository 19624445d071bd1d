use crate::{common::*, metrics::AccuracyMetrics, timer::Throughput};
use prettytable::{cell, row, Table};

/// Everything measured in one validation run.
#[derive(Debug, Clone)]
pub struct Summary {
    pub weights: PathBuf,
    pub params_mb: f64,
    pub throughput: Throughput,
    pub accuracy: Option<AccuracyMetrics>,
}

/// Size and speed of the model.
pub fn performance_table(params_mb: f64, throughput: &Throughput) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Model Parameters", format!("{:.2} MB", params_mb)]);
    table.add_row(row!["FPS", format!("{:.2}", throughput.fps)]);
    if let Some(latency) = throughput.mean_latency {
        table.add_row(row![
            "Mean Latency",
            format!("{:.2} ms", latency.as_secs_f64() * 1000.0)
        ]);
    }
    table.add_row(row![
        "Timed Samples",
        format!("{} ({} skipped)", throughput.num_timed, throughput.num_skipped)
    ]);
    table
}

impl Summary {
    pub fn performance_table(&self) -> Table {
        performance_table(self.params_mb, &self.throughput)
    }

    /// Performance followed by the accuracy metrics, if any.
    pub fn final_table(&self) -> Table {
        let mut table = self.performance_table();
        table.add_row(row!["Weights", self.weights.display()]);

        if let Some(metrics) = &self.accuracy {
            table.add_row(row!["mAP50", format!("{:.3}", metrics.map50)]);
            table.add_row(row!["mAP50-95", format!("{:.3}", metrics.map50_95)]);
            table.add_row(row!["Precision", format!("{:.3}", metrics.precision)]);
            table.add_row(row!["Recall", format!("{:.3}", metrics.recall)]);
        }

        table
    }
}
