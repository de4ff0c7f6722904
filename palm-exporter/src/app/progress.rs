use indicatif::{ProgressBar, ProgressStyle};

/// Build a progress bar tracking the records of one archive; hidden when output goes to the terminal
pub fn build_progress_bar_export(total_records: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total_records);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed}] [{bar:.blue}] {human_pos}/{human_len} ({per_sec}, ETA: {eta})",
    )
    .map(|style| style.progress_chars("#>-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_position(0);
    pb
}
