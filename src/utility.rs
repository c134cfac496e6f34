use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for jobs that run long enough to warrant an ETA, such as
/// landmark table builds and benchmark query batches.
pub fn get_progressbar(job_name: &str, len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_message(job_name.to_string());
    let template = " {msg} {wide_bar} {pos}/{len} estimated remaining: {eta_precise}";
    if let Ok(style) = ProgressStyle::with_template(template) {
        bar.set_style(style);
    }
    bar
}

/// Rounds to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progressbar_carries_job_name() {
        let bar = get_progressbar("Building landmark table", 12);
        assert_eq!(bar.length(), Some(12));
        assert_eq!(bar.message(), "Building landmark table");
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(2.0, 3), 2.0);
    }
}
