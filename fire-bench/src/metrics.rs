use crate::common::*;

static ALL_CLASSES_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*all\s+(\d+)\s+(\d+)\s+([0-9.]+)\s+([0-9.]+)\s+([0-9.]+)\s+([0-9.]+)\s*$")
        .unwrap()
});

/// Accuracy over all classes reported by the external validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    pub num_images: usize,
    pub num_instances: usize,
    pub precision: f64,
    pub recall: f64,
    pub map50: f64,
    pub map50_95: f64,
}

impl AccuracyMetrics {
    /// Parse the `all` row of the validator's summary table, e.g.
    ///
    /// ```text
    ///                    all        311        467      0.812      0.734      0.801      0.512
    /// ```
    pub fn parse_summary_row(line: &str) -> Option<Self> {
        let captures = ALL_CLASSES_ROW.captures(line)?;
        let field = |index: usize| captures.get(index).map(|capture| capture.as_str());

        Some(Self {
            num_images: field(1)?.parse().ok()?,
            num_instances: field(2)?.parse().ok()?,
            precision: field(3)?.parse().ok()?,
            recall: field(4)?.parse().ok()?,
            map50: field(5)?.parse().ok()?,
            map50_95: field(6)?.parse().ok()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_summary_row_test() {
        let line = "                   all        311        467      0.812      0.734      0.801      0.512";
        let metrics = AccuracyMetrics::parse_summary_row(line).unwrap();
        assert_eq!(
            metrics,
            AccuracyMetrics {
                num_images: 311,
                num_instances: 467,
                precision: 0.812,
                recall: 0.734,
                map50: 0.801,
                map50_95: 0.512,
            }
        );
    }

    #[test]
    fn other_rows_are_ignored() {
        [
            "                 Class     Images  Instances      Box(P          R      mAP50  mAP50-95)",
            "                  fire        311        402      0.850      0.760      0.830      0.540",
            "Speed: 0.2ms preprocess, 3.1ms inference, 0.0ms loss, 1.2ms postprocess per image",
            "",
        ]
        .iter()
        .for_each(|line| {
            assert!(AccuracyMetrics::parse_summary_row(line).is_none());
        });
    }
}
