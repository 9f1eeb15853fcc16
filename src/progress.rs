use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over iterations; a spinner when the run has no iteration cap.
pub fn iteration_bar(total: Option<u64>, quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = match total {
        Some(n) => {
            let pb = ProgressBar::new(n);
            pb.set_style(
                ProgressStyle::with_template(
                    "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
                )?
                .progress_chars("=> "),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(ProgressStyle::with_template(
                "{spinner} {msg} {pos} [{elapsed_precise}, {per_sec}]",
            )?);
            pb
        }
    };
    pb.set_message("iterations");
    Ok(pb)
}
